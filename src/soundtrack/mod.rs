//! Soundtrack module - finds playable tracks for a movie's soundtrack.
//!
//! # Architecture
//!
//! Same separation as the rest of the external-service code:
//! - **Domain models** (`domain.rs`) - our types, independent of any API
//! - **API DTOs** (`musicbrainz/dto.rs`, `spotify/dto.rs`) - exact response shapes
//! - **Adapters/Clients** - HTTP plumbing, converting DTOs to domain models
//! - **Traits** (`traits.rs`) - seams for dependency injection and mocks
//! - **Cache** - shared in-memory TTL cache
//! - **Resolver** - the lookup pipeline tying it together
//!
//! # Usage
//!
//! ```ignore
//! use soundtrack::{MusicBrainzClient, SpotifyClient, SoundtrackCache, SoundtrackResolver, Subject};
//!
//! let cache = Arc::new(SoundtrackCache::default());
//! let resolver = SoundtrackResolver::new(
//!     MusicBrainzClient::new(),
//!     SpotifyClient::new(client_id, client_secret),
//!     cache,
//!     ResolverOptions::default(),
//! );
//!
//! let tracks = resolver
//!     .resolve(&Subject::new("42", "Dust & Glory"), |so_far| println!("{} tracks", so_far.len()))
//!     .await?;
//! ```

pub mod cache;
pub mod domain;
pub mod musicbrainz;
pub mod query;
pub mod resolver;
pub mod spotify;
pub mod traits;

pub use cache::{CacheEntry, SoundtrackCache};
pub use domain::{
    CacheKey, Release, ReleaseTrack, SearchHit, SoundtrackError, StoredTrack, Subject, Track,
    UNKNOWN_ARTIST, parse_track_list,
};
pub use musicbrainz::MusicBrainzClient;
pub use resolver::{ResolverOptions, SoundtrackResolver};
pub use spotify::SpotifyClient;
pub use traits::{MetadataApi, TrackSearchApi};
