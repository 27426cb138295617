//! The Movie Database (TMDb) integration
//!
//! - `dto`: TMDb response shapes
//! - `adapter`: conversion into `MovieInfo`
//! - `client`: HTTP client with the discover fallbacks

pub mod dto;

mod adapter;
mod client;

pub use client::{IMAGE_BASE_URL, TmdbClient};
