//! Adapter layer: Convert TMDb DTOs to domain models

use super::dto;
use crate::movie::domain::{Genre, MovieInfo, MovieSummary, Poster};

/// Convert a listed movie, enriched with its details when available.
pub fn to_movie_info(
    listed: dto::MovieResult,
    details: Option<dto::MovieDetails>,
    genre: Genre,
    image_base_url: &str,
) -> MovieInfo {
    let director = details
        .as_ref()
        .and_then(|d| d.credits.as_ref())
        .and_then(|c| c.crew.iter().find(|m| m.job.as_deref() == Some("Director")))
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "Unknown Director".to_string());

    let tagline = details
        .as_ref()
        .and_then(|d| d.tagline.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("A {} classic", genre));

    // Details win over the listing where both are present
    let (title, release_date, overview, poster_path, vote_average) = match details {
        Some(d) => (
            d.title,
            d.release_date.or(listed.release_date),
            d.overview.or(listed.overview),
            d.poster_path.or(listed.poster_path),
            d.vote_average.or(listed.vote_average),
        ),
        None => (
            listed.title,
            listed.release_date,
            listed.overview,
            listed.poster_path,
            listed.vote_average,
        ),
    };

    MovieInfo {
        id: listed.id.to_string(),
        title,
        year: release_year(release_date.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        director,
        plot: overview
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| "No description available.".to_string()),
        tagline,
        rating: format_rating(vote_average),
        genre,
        poster: poster_path.map(|p| Poster::Url(format!("{}{}", image_base_url, p))),
        poster_prompt: None,
        tmdb_id: Some(listed.id),
    }
}

/// Convert a search result without fetching details.
pub fn to_summary(listed: dto::MovieResult, image_base_url: &str) -> MovieSummary {
    MovieSummary {
        tmdb_id: listed.id,
        year: release_year(listed.release_date.as_deref()),
        poster: listed
            .poster_path
            .map(|p| Poster::Url(format!("{}{}", image_base_url, p))),
        title: listed.title,
    }
}

/// Year part of a `YYYY-MM-DD` date.
pub fn release_year(date: Option<&str>) -> Option<String> {
    let year = date?.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then(|| year.to_string())
}

/// TMDb's 0-10 vote average as a five-star rating.
fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{:.1}/5", v / 2.0),
        _ => "N/A".to_string(),
    }
}

/// Pick the result matching `year`, otherwise the first one.
pub fn best_match<'a>(results: &'a [dto::MovieResult], year: &str) -> Option<&'a dto::MovieResult> {
    results
        .iter()
        .find(|r| release_year(r.release_date.as_deref()).as_deref() == Some(year))
        .or_else(|| results.first())
}
