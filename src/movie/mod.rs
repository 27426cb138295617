//! Movie module - picks a movie for an inserted genre disc.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - `Genre`, `MovieInfo`, `Poster`
//! - **API DTOs** (`tmdb/dto.rs`, `gemini/dto.rs`) - exact wire shapes
//! - **Clients** - TMDb for real movies, Gemini for invented ones and posters
//! - **Catalogue** - one canned movie per genre, always available
//! - **Service** - source selection and poster decoration

pub mod catalog;
pub mod domain;
pub mod gemini;
pub mod service;
pub mod tmdb;
pub mod traits;

pub use domain::{Absent, Genre, MovieError, MovieInfo, MovieSummary, Poster};
pub use gemini::GeminiClient;
pub use service::MovieService;
pub use tmdb::TmdbClient;
pub use traits::{FlavorTextApi, MovieDatabaseApi};
