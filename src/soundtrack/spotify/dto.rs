//! Spotify Web API Data Transfer Objects
//!
//! Only the fields we read are declared; serde ignores the rest.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// Client-credentials token response from `accounts.spotify.com/api/token`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Error body returned by the accounts service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenError {
    pub error: String,
    pub error_description: Option<String>,
}

/// `/v1/search?type=track` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

/// Paged track results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackItem>,
    pub total: Option<u32>,
}

/// A track search result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackItem {
    /// Spotify track ID
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Artist as embedded in a track
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

/// Error body returned by the Web API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
