//! Spotify Web API integration
//!
//! Resolves free-text track queries to embeddable track players.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod client;

pub use client::SpotifyClient;

/// Embeddable player URL for a Spotify track ID.
pub fn embed_url(track_id: &str) -> String {
    format!(
        "https://open.spotify.com/embed/track/{}?utm_source=generator&theme=0&view=list&t=0&autoplay=true",
        track_id
    )
}

/// Spotify search page for a movie's soundtrack, for manual lookup.
pub fn manual_search_url(movie_title: &str) -> String {
    format!(
        "https://open.spotify.com/search/{}",
        urlencoding::encode(&format!("{} soundtrack main theme", movie_title))
    )
}
