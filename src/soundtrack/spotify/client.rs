//! Spotify HTTP client
//!
//! Uses the client-credentials flow: no user login, search only.
//! The access token is cached until shortly before it expires.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::{dto, embed_url};
use crate::soundtrack::domain::{SearchHit, SoundtrackError};

/// Refresh tokens this long before Spotify says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    api_base: String,
    accounts_base: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    /// Create a new client
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base: "https://api.spotify.com/v1".to_string(),
            accounts_base: "https://accounts.spotify.com".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        }
    }

    /// Create a client for testing with custom base URLs
    #[cfg(test)]
    pub fn with_base_urls(api_base: impl Into<String>, accounts_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            accounts_base: accounts_base.into(),
            ..Self::new("test-id", "test-secret")
        }
    }

    /// Search for a track and return the best match.
    ///
    /// An expired token (401) is refreshed once before giving up.
    pub async fn search_track(&self, query: &str) -> Result<Option<SearchHit>, SoundtrackError> {
        let url = format!(
            "{}/search?q={}&type=track&limit=1",
            self.api_base,
            urlencoding::encode(query)
        );

        for attempt in 0..2 {
            let token = self.access_token().await?;
            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| SoundtrackError::Network(e.to_string()))?;

            let status = response.status();

            if status == reqwest::StatusCode::UNAUTHORIZED && attempt == 0 {
                tracing::debug!("Spotify token rejected, refreshing");
                self.token.lock().await.take();
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SoundtrackError::RateLimited(retry_after(&response)));
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(SoundtrackError::Auth("Spotify rejected a fresh access token".to_string()));
            }

            if !status.is_success() {
                if let Ok(error) = response.json::<dto::ApiError>().await {
                    return Err(SoundtrackError::Api(error.error.message));
                }
                return Err(SoundtrackError::Network(format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }

            let search = response
                .json::<dto::SearchResponse>()
                .await
                .map_err(|e| SoundtrackError::Parse(e.to_string()))?;
            return Ok(to_search_hit(search));
        }

        Err(SoundtrackError::Auth("Spotify token refresh loop".to_string()))
    }

    /// Return a valid access token, fetching a new one if needed.
    async fn access_token(&self) -> Result<String, SoundtrackError> {
        let mut token = self.token.lock().await;
        if let Some(ref current) = *token
            && Instant::now() < current.expires_at
        {
            return Ok(current.value.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.access_token.clone();
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *token = Some(AccessToken {
            value: fresh.access_token,
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!("Obtained Spotify access token");
        Ok(value)
    }

    async fn request_token(&self) -> Result<dto::TokenResponse, SoundtrackError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(SoundtrackError::NotConfigured("Spotify client credentials".to_string()));
        }

        let response = self
            .http_client
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| SoundtrackError::Network(format!("token request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SoundtrackError::RateLimited(retry_after(&response)));
        }
        if !status.is_success() {
            let reason = match response.json::<dto::TokenError>().await {
                Ok(error) => error.error_description.unwrap_or(error.error),
                Err(_) => format!("HTTP {}", status),
            };
            return Err(token_failure(status, reason));
        }

        response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| SoundtrackError::Parse(format!("invalid token response: {}", e)))
    }
}

/// Seconds from a `Retry-After` header, if present.
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Only a rejection of the credentials themselves ends the lookup.
fn token_failure(status: reqwest::StatusCode, reason: String) -> SoundtrackError {
    if status.is_client_error() {
        SoundtrackError::Auth(reason)
    } else {
        SoundtrackError::Network(format!("token request failed: {}", reason))
    }
}

/// Convert a search response to the first hit, if any.
fn to_search_hit(response: dto::SearchResponse) -> Option<SearchHit> {
    let item = response.tracks?.items.into_iter().next()?;
    Some(SearchHit {
        reference: embed_url(&item.id),
        artist: item.artists.into_iter().next().map(|a| a.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SpotifyClient::new("id", "secret");
        assert_eq!(client.api_base, "https://api.spotify.com/v1");
        assert_eq!(client.accounts_base, "https://accounts.spotify.com");
    }

    #[test]
    fn test_to_search_hit() {
        let response = dto::SearchResponse {
            tracks: Some(dto::TrackPage {
                items: vec![dto::TrackItem {
                    id: "abc".to_string(),
                    name: "Main Title".to_string(),
                    artists: vec![dto::ArtistRef {
                        id: None,
                        name: "Composer".to_string(),
                    }],
                }],
                total: Some(1),
            }),
        };
        let hit = to_search_hit(response).unwrap();
        assert_eq!(hit.reference, embed_url("abc"));
        assert_eq!(hit.artist.as_deref(), Some("Composer"));
    }

    #[test]
    fn test_to_search_hit_empty() {
        assert!(to_search_hit(dto::SearchResponse { tracks: None }).is_none());
        let empty = dto::SearchResponse {
            tracks: Some(dto::TrackPage {
                items: vec![],
                total: Some(0),
            }),
        };
        assert!(to_search_hit(empty).is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_fatal() {
        let client = SpotifyClient::new("", "");
        let err = client.search_track("anything").await.unwrap_err();
        assert!(matches!(err, SoundtrackError::NotConfigured(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_unreachable_accounts_service_is_transient() {
        let client = SpotifyClient::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");
        let err = client.search_track("anything").await.unwrap_err();
        assert!(matches!(err, SoundtrackError::Network(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_token_failure_classification() {
        use reqwest::StatusCode;

        let rejected = token_failure(StatusCode::BAD_REQUEST, "invalid_client".to_string());
        assert!(matches!(rejected, SoundtrackError::Auth(ref r) if r == "invalid_client"));
        assert!(token_failure(StatusCode::UNAUTHORIZED, "bad secret".to_string()).is_fatal());

        let outage = token_failure(StatusCode::SERVICE_UNAVAILABLE, "HTTP 503".to_string());
        assert!(matches!(outage, SoundtrackError::Network(_)));
        assert!(!outage.is_fatal());
    }
}
