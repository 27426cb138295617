//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{adapter, dto};
use crate::soundtrack::domain::{Release, SoundtrackError};

/// Default spacing between requests
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "RetroView/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/retroview)"
);

impl MusicBrainzClient {
    /// Create a new client
    pub fn new() -> Self {
        Self::with_base_url("https://musicbrainz.org/ws/2")
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            request_interval: DEFAULT_REQUEST_INTERVAL,
            last_request: Mutex::new(None),
        }
    }

    /// Override the spacing between consecutive requests
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    /// Find the soundtrack release for a movie title.
    ///
    /// Searches release groups for `"<title> soundtrack"`, takes the first
    /// release of the chosen group and fetches its track list.
    /// Returns `Ok(None)` when any step comes back empty.
    pub async fn find_soundtrack(&self, movie_title: &str) -> Result<Option<Release>, SoundtrackError> {
        let query = format!("{} soundtrack", movie_title);
        let url = format!(
            "{}/release-group/?query={}&type=soundtrack&limit=5&fmt=json",
            self.base_url,
            urlencoding::encode(&query)
        );
        let Some(search) = self.get_json::<dto::ReleaseGroupSearchResponse>(&url).await? else {
            return Ok(None);
        };
        tracing::debug!("MusicBrainz release-groups found: {}", search.release_groups.len());

        let Some(group) = adapter::pick_release_group(&search.release_groups) else {
            return Ok(None);
        };

        let url = format!(
            "{}/release/?release-group={}&limit=1&fmt=json&inc=recordings",
            self.base_url, group.id
        );
        let Some(browse) = self.get_json::<dto::ReleaseBrowseResponse>(&url).await? else {
            return Ok(None);
        };
        let Some(summary) = browse.releases.first() else {
            return Ok(None);
        };

        let url = format!(
            "{}/release/{}?inc=recordings+artist-credits&fmt=json",
            self.base_url, summary.id
        );
        let release = self.get_json::<dto::ReleaseResponse>(&url).await?;
        Ok(release.map(adapter::to_release))
    }

    /// Send a GET and parse the JSON body. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, SoundtrackError> {
        self.pace().await;

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SoundtrackError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        // MusicBrainz answers 503 when the per-IP rate limit is exceeded
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return Err(SoundtrackError::RateLimited(None));
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(SoundtrackError::Api(error.error));
            }
            return Err(SoundtrackError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| SoundtrackError::Parse(e.to_string()))
    }

    /// Wait until `request_interval` has passed since the previous request.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_interval {
                tokio::time::sleep(self.request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for MusicBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}
