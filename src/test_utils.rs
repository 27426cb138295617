//! Test utilities and fixtures for retroview tests.
//!
//! Small factories for the soundtrack and movie domain types so tests can
//! focus on behaviour instead of struct literals.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{release, release_track};
//!
//! let release = release("Score", Some("Composer"), vec![release_track("Main Title", None)]);
//! ```

use crate::movie::{Genre, MovieInfo};
use crate::soundtrack::{Release, ReleaseTrack, Track};

/// A resolved track numbered `n`.
pub fn track(n: usize) -> Track {
    Track {
        title: format!("Track {}", n),
        artist: "Test Artist".to_string(),
        reference: format!("https://open.spotify.com/embed/track/test{}", n),
    }
}

/// A release track entry.
pub fn release_track(title: &str, artist: Option<&str>) -> ReleaseTrack {
    ReleaseTrack {
        title: Some(title.to_string()),
        artist: artist.map(str::to_string),
    }
}

/// A release with the given title, release-level artist and tracks.
pub fn release(title: &str, artist: Option<&str>, tracks: Vec<ReleaseTrack>) -> Release {
    Release {
        id: "test-release".to_string(),
        title: title.to_string(),
        artist: artist.map(str::to_string),
        tracks,
    }
}

/// A movie with sensible defaults.
pub fn movie(title: &str, genre: Genre) -> MovieInfo {
    MovieInfo {
        id: format!("test-{}", title.to_lowercase().replace(' ', "-")),
        title: title.to_string(),
        year: "1982".to_string(),
        director: "Test Director".to_string(),
        plot: "Something happens.".to_string(),
        tagline: "It happens.".to_string(),
        rating: "4.0/5".to_string(),
        genre,
        poster: None,
        poster_prompt: None,
        tmdb_id: None,
    }
}
