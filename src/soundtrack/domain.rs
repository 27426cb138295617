//! Internal domain models for soundtrack resolution.
//!
//! These types are OUR types - they don't change when external APIs change.
//! MusicBrainz and Spotify responses get converted into these via adapters.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Artist name used when neither the release nor the search hit credits anyone.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Title used for legacy references whose locator carries no track id.
pub const UNKNOWN_TRACK: &str = "Unknown Track";

/// A playable soundtrack entry.
///
/// Serialized as [`StoredTrack::Full`]; either stored shape reads back as a
/// `Track`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredTrack", into = "StoredTrack")]
pub struct Track {
    /// Track title as listed on the release
    pub title: String,
    /// Credited artist (may be [`UNKNOWN_ARTIST`])
    pub artist: String,
    /// Opaque locator used to embed or stream the track
    pub reference: String,
}

/// Serialized shape of a track.
///
/// Older entries stored only the embed URL. Both shapes are accepted and
/// normalized to [`Track`] once, on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTrack {
    Legacy(String),
    Full {
        url: String,
        title: String,
        artist: String,
    },
}

impl From<StoredTrack> for Track {
    fn from(stored: StoredTrack) -> Self {
        match stored {
            StoredTrack::Full { url, title, artist } => Track {
                title,
                artist,
                reference: url,
            },
            StoredTrack::Legacy(url) => {
                let title = legacy_track_id(&url)
                    .map(|id| format!("Track {}", id))
                    .unwrap_or_else(|| UNKNOWN_TRACK.to_string());
                Track {
                    title,
                    artist: UNKNOWN_ARTIST.to_string(),
                    reference: url,
                }
            }
        }
    }
}

impl From<Track> for StoredTrack {
    fn from(track: Track) -> Self {
        StoredTrack::Full {
            url: track.reference,
            title: track.title,
            artist: track.artist,
        }
    }
}

/// Parse a saved track list (JSON array of either stored shape).
pub fn parse_track_list(json: &str) -> Result<Vec<Track>, SoundtrackError> {
    serde_json::from_str(json).map_err(|e| SoundtrackError::Parse(e.to_string()))
}

/// Extract `<id>` from a locator shaped like `.../track/<id>?...`.
fn legacy_track_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/track/")?;
    let id = rest.split(['?', '#', '/']).next()?;
    (!id.is_empty()).then_some(id)
}

/// The movie whose soundtrack is being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
    pub id: String,
    pub title: String,
}

impl Subject {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Cache key derived from a [`Subject`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl From<&Subject> for CacheKey {
    fn from(subject: &Subject) -> Self {
        CacheKey(format!("{}_{}", subject.id, subject.title))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical soundtrack release as known to the metadata service.
#[derive(Debug, Clone, Default)]
pub struct Release {
    pub id: String,
    pub title: String,
    /// Release-level artist credit, used when a track has none
    pub artist: Option<String>,
    /// Ordered track list (all media, in disc order)
    pub tracks: Vec<ReleaseTrack>,
}

/// One entry of a release's track list.
#[derive(Debug, Clone, Default)]
pub struct ReleaseTrack {
    /// `None` when the release lists a slot without a usable title
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Best match returned by the track search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Playable locator
    pub reference: String,
    /// First artist credited by the search service
    pub artist: Option<String>,
}

/// Errors that can occur while resolving a soundtrack
#[derive(Debug, Clone, thiserror::Error)]
pub enum SoundtrackError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited - try again later")]
    RateLimited(Option<Duration>),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Service not configured: {0}")]
    NotConfigured(String),
}

impl SoundtrackError {
    /// Errors after which no further search request can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::NotConfigured(_))
    }
}
