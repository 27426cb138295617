//! TMDb API Data Transfer Objects
//!
//! These types match what TMDb v3 returns for the endpoints we call.
//! DO NOT use these types outside the tmdb module - convert to domain types.
//!
//! API Reference: https://developer.themoviedb.org/reference

use serde::{Deserialize, Serialize};

/// `/discover/movie` and `/search/movie` response page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieListResponse {
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<MovieResult>,
    pub total_results: Option<u32>,
}

/// Movie as listed in discover/search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieResult {
    pub id: u64,
    pub title: String,
    /// YYYY-MM-DD, sometimes empty
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// 0-10
    pub vote_average: Option<f64>,
}

/// `/movie/<id>?append_to_response=credits` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrewMember {
    pub name: String,
    pub job: Option<String>,
}

/// Error body returned by TMDb
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status_code: Option<u32>,
    pub status_message: String,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
