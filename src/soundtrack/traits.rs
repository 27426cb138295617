//! Trait definitions for the external services the resolver talks to.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the MusicBrainz and Spotify clients, while tests
//! substitute the mocks below.

use async_trait::async_trait;

use super::domain::{Release, SearchHit, SoundtrackError};

/// Metadata lookup service: resolves a movie title to a soundtrack release.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Find the canonical soundtrack release for a movie title.
    ///
    /// `Ok(None)` means the service answered and knows no such release.
    async fn find_soundtrack(&self, movie_title: &str) -> Result<Option<Release>, SoundtrackError>;
}

/// Track search service: resolves a free-text query to a playable track.
#[async_trait]
pub trait TrackSearchApi: Send + Sync {
    /// Run one search query and return the best match, if any.
    async fn search_track(&self, query: &str) -> Result<Option<SearchHit>, SoundtrackError>;
}

#[async_trait]
impl MetadataApi for super::musicbrainz::MusicBrainzClient {
    async fn find_soundtrack(&self, movie_title: &str) -> Result<Option<Release>, SoundtrackError> {
        self.find_soundtrack(movie_title).await
    }
}

#[async_trait]
impl TrackSearchApi for super::spotify::SpotifyClient {
    async fn search_track(&self, query: &str) -> Result<Option<SearchHit>, SoundtrackError> {
        self.search_track(query).await
    }
}
