//! MusicBrainz API integration
//!
//! Finds the soundtrack release for a movie and its ordered track list.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_REQUEST_INTERVAL, MusicBrainzClient};
