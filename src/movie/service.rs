//! Movie selection for an inserted disc.
//!
//! Source order: the movie database when configured, then the generator
//! (falling back to the catalogue if it fails), then the catalogue. Missing
//! API keys just skip a source. The caller always gets a movie.

use std::sync::Arc;

use super::catalog;
use super::domain::{Genre, MovieInfo, Poster};
use super::gemini::GeminiClient;
use super::tmdb::TmdbClient;
use super::traits::{FlavorTextApi, MovieDatabaseApi};

/// Picks and decorates movies for discs
#[derive(Clone)]
pub struct MovieService {
    database: Option<Arc<dyn MovieDatabaseApi>>,
    generator: Option<Arc<dyn FlavorTextApi>>,
    generate_posters: bool,
}

impl Default for MovieService {
    fn default() -> Self {
        Self {
            database: None,
            generator: None,
            generate_posters: true,
        }
    }
}

impl MovieService {
    /// Service with no remote sources: catalogue only
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from optional API keys. Empty keys count as missing.
    pub fn from_keys(tmdb_api_key: Option<&str>, gemini_api_key: Option<&str>) -> Self {
        let mut service = Self::new();
        if let Some(key) = tmdb_api_key.filter(|k| !k.is_empty()) {
            service = service.with_database(Arc::new(TmdbClient::new(key)));
        }
        if let Some(key) = gemini_api_key.filter(|k| !k.is_empty()) {
            service = service.with_generator(Arc::new(GeminiClient::new(key)));
        }
        service
    }

    pub fn with_database(mut self, database: Arc<dyn MovieDatabaseApi>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn FlavorTextApi>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Whether movies without a hosted poster get a generated one
    pub fn generate_posters(mut self, enabled: bool) -> Self {
        self.generate_posters = enabled;
        self
    }

    pub fn has_database(&self) -> bool {
        self.database.is_some()
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// A movie for `genre`, with a poster when one can be had.
    pub async fn movie_for_genre(&self, genre: Genre) -> MovieInfo {
        if let Some(database) = &self.database {
            match database.discover_by_genre(genre).await {
                Ok(movie) => return movie,
                Err(e) => tracing::warn!("Movie database failed for {}: {}", genre, e),
            }
        }

        let movie = match &self.generator {
            Some(generator) => match generator.generate_movie_info(genre).await {
                Ok(movie) => movie,
                Err(e) => {
                    tracing::warn!("Movie generation failed for {}, using catalogue: {}", genre, e);
                    catalog::movie_for(genre)
                }
            },
            None => catalog::movie_for(genre),
        };

        self.with_generated_poster(movie).await
    }

    /// Fill in a missing poster for a movie picked earlier (watch list).
    ///
    /// Hosted posters are looked up first, then a generated one is tried.
    pub async fn ensure_poster(&self, movie: MovieInfo) -> MovieInfo {
        if movie.poster.is_some() {
            return movie;
        }

        if let Some(database) = &self.database
            && let Some(poster) = database.poster_for(&movie.title, &movie.year).await
        {
            return MovieInfo {
                poster: Some(poster),
                ..movie
            };
        }

        self.with_generated_poster(movie).await
    }

    /// Best-effort poster from the movie's prompt.
    async fn with_generated_poster(&self, mut movie: MovieInfo) -> MovieInfo {
        if movie.poster.is_some() || !self.generate_posters {
            return movie;
        }
        let (Some(generator), Some(prompt)) = (&self.generator, movie.poster_prompt.as_deref()) else {
            return movie;
        };

        let poster = generator.generate_poster(prompt).await.ok();
        if poster.is_none() {
            tracing::debug!("No poster for '{}'", movie.title);
        }
        movie.poster = poster;
        movie
    }

    /// Generate a poster directly from a prompt.
    pub async fn generate_poster(&self, prompt: &str) -> Option<Poster> {
        self.generator.as_ref()?.generate_poster(prompt).await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::domain::MovieError;
    use crate::movie::traits::mocks::{MockFlavorText, MockMovieDatabase};
    use crate::test_utils::movie;

    fn inline_poster() -> Poster {
        Poster::Inline {
            mime_type: "image/png".to_string(),
            data_base64: "AAAA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_catalogue_when_nothing_configured() {
        let service = MovieService::new();
        let result = service.movie_for_genre(Genre::Western).await;
        assert_eq!(result.title, "Dust & Glory");
        assert!(result.poster.is_none());
    }

    #[tokio::test]
    async fn test_database_wins() {
        let database = Arc::new(MockMovieDatabase::with_movie(movie("Blade Runner", Genre::SciFi)));
        let generator = Arc::new(MockFlavorText::with_movie(movie("Neon Ronin", Genre::SciFi)));
        let service = MovieService::new()
            .with_database(database.clone())
            .with_generator(generator.clone());

        let result = service.movie_for_genre(Genre::SciFi).await;
        assert_eq!(result.title, "Blade Runner");
        assert_eq!(database.calls(), 1);
        assert_eq!(generator.poster_calls(), 0);
    }

    #[tokio::test]
    async fn test_database_failure_falls_back_to_generator() {
        let database = Arc::new(MockMovieDatabase::failing(MovieError::NoMovies(Genre::Noir)));
        let mut generated = movie("Neon Ronin", Genre::SciFi);
        generated.poster_prompt = Some("rain-soaked poster".to_string());
        let generator =
            Arc::new(MockFlavorText::with_movie(generated).with_poster(inline_poster()));
        let service = MovieService::new()
            .with_database(database)
            .with_generator(generator.clone());

        let result = service.movie_for_genre(Genre::Noir).await;
        assert_eq!(result.title, "Neon Ronin");
        assert_eq!(result.genre, Genre::Noir);
        assert_eq!(result.poster, Some(inline_poster()));
        assert_eq!(generator.poster_calls(), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_catalogue() {
        let generator = Arc::new(MockFlavorText::failing(MovieError::EmptyResponse));
        let service = MovieService::new().with_generator(generator.clone());

        let result = service.movie_for_genre(Genre::Horror).await;
        assert_eq!(result.title, "The Whispering Walls");
        // Catalogue movies carry a prompt, so a poster is still attempted
        assert_eq!(generator.poster_calls(), 1);
        assert!(result.poster.is_none());
    }

    #[tokio::test]
    async fn test_ensure_poster_prefers_hosted() {
        let hosted = Poster::Url("https://image.tmdb.org/t/p/w500/x.jpg".to_string());
        let database = Arc::new(
            MockMovieDatabase::failing(MovieError::EmptyResponse).with_poster(hosted.clone()),
        );
        let generator = Arc::new(MockFlavorText::failing(MovieError::EmptyResponse));
        let service = MovieService::new()
            .with_database(database)
            .with_generator(generator.clone());

        let result = service.ensure_poster(movie("Blade Runner", Genre::SciFi)).await;
        assert_eq!(result.poster, Some(hosted));
        assert_eq!(generator.poster_calls(), 0);
    }

    #[tokio::test]
    async fn test_ensure_poster_keeps_existing() {
        let generator = Arc::new(MockFlavorText::failing(MovieError::EmptyResponse));
        let service = MovieService::new().with_generator(generator.clone());
        let mut saved = movie("Blade Runner", Genre::SciFi);
        saved.poster = Some(inline_poster());

        let result = service.ensure_poster(saved).await;
        assert_eq!(result.poster, Some(inline_poster()));
        assert_eq!(generator.poster_calls(), 0);
    }

    #[tokio::test]
    async fn test_poster_generation_can_be_disabled() {
        let generator = Arc::new(MockFlavorText::failing(MovieError::EmptyResponse));
        let service = MovieService::new()
            .with_generator(generator.clone())
            .generate_posters(false);

        let result = service.movie_for_genre(Genre::KungFu).await;
        assert_eq!(result.title, "Dragon's Path");
        assert_eq!(generator.poster_calls(), 0);
    }

    #[test]
    fn test_from_keys_ignores_empty() {
        let service = MovieService::from_keys(Some(""), None);
        assert!(!service.has_database());
        assert!(!service.has_generator());

        let service = MovieService::from_keys(Some("tmdb"), Some("gemini"));
        assert!(service.has_database());
        assert!(service.has_generator());
    }
}
