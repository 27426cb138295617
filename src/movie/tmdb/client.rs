//! TMDb HTTP client
//!
//! Handles communication with The Movie Database v3 API.
//! See: https://developer.themoviedb.org/reference

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::movie::domain::{Genre, MovieError, MovieInfo, MovieSummary, Poster};

/// Sized poster images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Random picks come from this many top results
const PICK_POOL: usize = 20;

/// Release window that gives the TV its vintage feel
const WINDOW_START: &str = "1970-01-01";
const WINDOW_END: &str = "1999-12-31";

/// TMDb API client
pub struct TmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client against a custom base URL (tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Pick a random, preferably vintage, movie of `genre`.
    ///
    /// Tries a windowed discover, then a keyword search, then an
    /// unwindowed discover. Failures at each step fall through to the next.
    pub async fn discover_by_genre(&self, genre: Genre) -> Result<MovieInfo, MovieError> {
        let mut candidates = self.find_candidates(genre).await;
        if candidates.is_empty() {
            return Err(MovieError::NoMovies(genre));
        }

        let pool = candidates.len().min(PICK_POOL);
        let picked = candidates.swap_remove(rand::random_range(0..pool));
        tracing::info!("TMDb picked '{}' ({}) for {}", picked.title, picked.id, genre);

        let details = match self.details(picked.id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("TMDb details for {} unavailable: {}", picked.id, e);
                None
            }
        };

        Ok(adapter::to_movie_info(picked, details, genre, &self.image_base_url))
    }

    async fn find_candidates(&self, genre: Genre) -> Vec<dto::MovieResult> {
        let genre_id = genre.tmdb_genre_id();
        let steps = [
            (
                "discover 1970-1999",
                format!(
                    "{}/discover/movie?api_key={}&with_genres={}&primary_release_date.gte={}&primary_release_date.lte={}&sort_by=popularity.desc&vote_count.gte=20&page=1",
                    self.base_url, self.api_key, genre_id, WINDOW_START, WINDOW_END
                ),
            ),
            (
                "keyword search",
                format!(
                    "{}/search/movie?api_key={}&query={}&primary_release_date.gte={}&primary_release_date.lte={}&page=1",
                    self.base_url,
                    self.api_key,
                    urlencoding::encode(genre.search_keyword()),
                    WINDOW_START,
                    WINDOW_END
                ),
            ),
            (
                "discover all years",
                format!(
                    "{}/discover/movie?api_key={}&with_genres={}&sort_by=popularity.desc&vote_count.gte=50&page=1",
                    self.base_url, self.api_key, genre_id
                ),
            ),
        ];

        for (label, url) in steps {
            match self.get_json::<dto::MovieListResponse>(&url).await {
                Ok(response) if !response.results.is_empty() => {
                    tracing::debug!("TMDb {}: {} results", label, response.results.len());
                    return response.results;
                }
                Ok(_) => tracing::debug!("TMDb {}: no results", label),
                Err(e) => tracing::warn!("TMDb {} failed: {}", label, e),
            }
        }

        Vec::new()
    }

    /// Free-text movie search, first page.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, MovieError> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}&language=en-US&page=1",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        );
        let response = self.get_json::<dto::MovieListResponse>(&url).await?;

        Ok(response
            .results
            .into_iter()
            .map(|r| adapter::to_summary(r, &self.image_base_url))
            .collect())
    }

    /// Hosted poster for a movie, best match on release year.
    pub async fn poster_for(&self, title: &str, year: &str) -> Option<Poster> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}&year={}&language=en-US&page=1",
            self.base_url,
            self.api_key,
            urlencoding::encode(title),
            urlencoding::encode(year)
        );
        let response = match self.get_json::<dto::MovieListResponse>(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("TMDb poster lookup for '{}' failed: {}", title, e);
                return None;
            }
        };

        let path = adapter::best_match(&response.results, year)?.poster_path.as_ref()?;
        Some(Poster::Url(format!("{}{}", self.image_base_url, path)))
    }

    async fn details(&self, id: u64) -> Result<dto::MovieDetails, MovieError> {
        let url = format!(
            "{}/movie/{}?api_key={}&append_to_response=credits",
            self.base_url, id, self.api_key
        );
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MovieError> {
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MovieError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(MovieError::Api(error.status_message));
            }
            return Err(MovieError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MovieError::Parse(e.to_string()))
    }
}
