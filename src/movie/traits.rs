//! Seams for the movie services, so `MovieService` can be tested without
//! network access.

use async_trait::async_trait;

use super::domain::{Absent, Genre, MovieError, MovieInfo, Poster};
use super::gemini::GeminiClient;
use super::tmdb::TmdbClient;

/// Public movie database.
#[async_trait]
pub trait MovieDatabaseApi: Send + Sync {
    /// A real movie of `genre`.
    async fn discover_by_genre(&self, genre: Genre) -> Result<MovieInfo, MovieError>;

    /// Hosted poster for a title, if the database has one.
    async fn poster_for(&self, title: &str, year: &str) -> Option<Poster>;
}

/// Generative text and image service.
#[async_trait]
pub trait FlavorTextApi: Send + Sync {
    /// An invented movie of `genre`, carrying a poster prompt.
    async fn generate_movie_info(&self, genre: Genre) -> Result<MovieInfo, MovieError>;

    async fn generate_poster(&self, prompt: &str) -> Result<Poster, Absent>;
}

#[async_trait]
impl MovieDatabaseApi for TmdbClient {
    async fn discover_by_genre(&self, genre: Genre) -> Result<MovieInfo, MovieError> {
        self.discover_by_genre(genre).await
    }

    async fn poster_for(&self, title: &str, year: &str) -> Option<Poster> {
        self.poster_for(title, year).await
    }
}

#[async_trait]
impl FlavorTextApi for GeminiClient {
    async fn generate_movie_info(&self, genre: Genre) -> Result<MovieInfo, MovieError> {
        self.generate_movie_info(genre).await
    }

    async fn generate_poster(&self, prompt: &str) -> Result<Poster, Absent> {
        self.generate_poster(prompt).await
    }
}
