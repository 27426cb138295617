//! Internal domain models for movie discovery.
//!
//! TMDb and Gemini responses are converted into these types.

use std::fmt;
use std::str::FromStr;

/// A disc's genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    SciFi,
    Noir,
    Western,
    Horror,
    RomCom,
    KungFu,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::SciFi,
        Genre::Noir,
        Genre::Western,
        Genre::Horror,
        Genre::RomCom,
        Genre::KungFu,
    ];

    /// Label printed on the disc
    pub fn display_name(self) -> &'static str {
        match self {
            Genre::SciFi => "Sci-Fi",
            Genre::Noir => "Noir",
            Genre::Western => "Western",
            Genre::Horror => "Horror",
            Genre::RomCom => "Rom-Com",
            Genre::KungFu => "Kung Fu",
        }
    }

    /// Lowercase identifier, used in generated movie ids
    pub fn slug(self) -> &'static str {
        match self {
            Genre::SciFi => "sci-fi",
            Genre::Noir => "noir",
            Genre::Western => "western",
            Genre::Horror => "horror",
            Genre::RomCom => "rom-com",
            Genre::KungFu => "kung-fu",
        }
    }

    /// Closest TMDb genre id
    pub fn tmdb_genre_id(self) -> u32 {
        match self {
            Genre::SciFi => 878,
            Genre::Noir => 10402,
            Genre::Western => 37,
            Genre::Horror => 27,
            Genre::RomCom => 10749,
            // Action; TMDb has no martial-arts genre
            Genre::KungFu => 28,
        }
    }

    /// Keyword for the free-text search fallback
    pub fn search_keyword(self) -> &'static str {
        match self {
            Genre::SciFi => "science fiction",
            Genre::Noir => "film noir",
            Genre::Western => "western",
            Genre::Horror => "horror",
            Genre::RomCom => "romantic comedy",
            Genre::KungFu => "martial arts",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Genre {
    type Err = MovieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "scifi" | "sciencefiction" => Ok(Genre::SciFi),
            "noir" | "filmnoir" => Ok(Genre::Noir),
            "western" => Ok(Genre::Western),
            "horror" => Ok(Genre::Horror),
            "romcom" | "romance" => Ok(Genre::RomCom),
            "kungfu" | "martialarts" => Ok(Genre::KungFu),
            _ => Err(MovieError::UnknownGenre(s.to_string())),
        }
    }
}

/// Movie poster image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Hosted image (TMDb)
    Url(String),
    /// Generated image, base64 encoded
    Inline { mime_type: String, data_base64: String },
}

impl Poster {
    /// Something an `<img src>` or terminal link can use.
    pub fn to_src(&self) -> String {
        match self {
            Poster::Url(url) => url.clone(),
            Poster::Inline { mime_type, data_base64 } => {
                format!("data:{};base64,{}", mime_type, data_base64)
            }
        }
    }
}

/// Poster generation produced nothing. Not an error: show a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absent;

/// What the TV shows for a disc
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInfo {
    /// Stable identifier, also half of the soundtrack cache key
    pub id: String,
    pub title: String,
    pub year: String,
    pub director: String,
    pub plot: String,
    pub tagline: String,
    /// e.g. "4.5/5"
    pub rating: String,
    pub genre: Genre,
    pub poster: Option<Poster>,
    /// Prompt for generating a poster when none is hosted
    pub poster_prompt: Option<String>,
    /// Set when the movie came from TMDb
    pub tmdb_id: Option<u64>,
}

/// A movie database search hit
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub tmdb_id: u64,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<Poster>,
}

/// Id for movies that don't come from TMDb: derived from genre and title so
/// the same movie always maps to the same soundtrack cache entry.
pub fn generated_id(genre: Genre, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    format!("{}-{}", genre.slug(), slug.trim_matches('-'))
}

/// Errors from the movie services
#[derive(Debug, Clone, thiserror::Error)]
pub enum MovieError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No movies found for genre: {0}")]
    NoMovies(Genre),

    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    #[error("Generator returned no content")]
    EmptyResponse,
}
