//! Gemini HTTP client
//!
//! Generates fictional movie entries and vintage posters.
//! See: https://ai.google.dev/api/generate-content

use serde_json::json;

use super::dto;
use crate::movie::domain::{Absent, Genre, MovieError, MovieInfo, Poster, generated_id};

pub const TEXT_MODEL: &str = "gemini-2.5-flash";
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

const POSTER_ASPECT_RATIO: &str = "3:4";

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://generativelanguage.googleapis.com/v1beta")
    }

    /// Create a client against a custom base URL (tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Invent a cult-classic movie of `genre`.
    pub async fn generate_movie_info(&self, genre: Genre) -> Result<MovieInfo, MovieError> {
        let request = dto::GenerateRequest {
            contents: vec![text_content(movie_prompt(genre))],
            generation_config: Some(dto::GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(movie_schema()),
                ..Default::default()
            }),
        };

        let response = self.generate(TEXT_MODEL, &request).await?;
        let text = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(MovieError::EmptyResponse)?;

        let generated: dto::GeneratedMovie =
            serde_json::from_str(&text).map_err(|e| MovieError::Parse(e.to_string()))?;
        tracing::info!("Generated '{}' ({}) for {}", generated.title, generated.year, genre);

        Ok(MovieInfo {
            id: generated_id(genre, &generated.title),
            title: generated.title,
            year: generated.year,
            director: generated.director,
            plot: generated.plot,
            tagline: generated.tagline,
            rating: generated.rating,
            genre,
            poster: None,
            poster_prompt: Some(generated.poster_prompt),
            tmdb_id: None,
        })
    }

    /// Paint a poster for `prompt`.
    ///
    /// Never fails loudly: any error, or a response without image data,
    /// is `Absent` and the caller shows a placeholder.
    pub async fn generate_poster(&self, prompt: &str) -> Result<Poster, Absent> {
        let request = dto::GenerateRequest {
            contents: vec![text_content(prompt.to_string())],
            generation_config: Some(dto::GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(dto::ImageConfig {
                    aspect_ratio: POSTER_ASPECT_RATIO.to_string(),
                }),
                ..Default::default()
            }),
        };

        let response = match self.generate(IMAGE_MODEL, &request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Poster generation failed: {}", e);
                return Err(Absent);
            }
        };

        let inline = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.inline_data)
            .find(|d| !d.data.is_empty());

        match inline {
            Some(data) => Ok(Poster::Inline {
                mime_type: data.mime_type.unwrap_or_else(|| "image/png".to_string()),
                data_base64: data.data,
            }),
            None => {
                tracing::warn!("Poster generation returned no image data");
                Err(Absent)
            }
        }
    }

    async fn generate(
        &self,
        model: &str,
        request: &dto::GenerateRequest,
    ) -> Result<dto::GenerateResponse, MovieError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| MovieError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(MovieError::Api(error.error.message));
            }
            return Err(MovieError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::GenerateResponse>()
            .await
            .map_err(|e| MovieError::Parse(e.to_string()))
    }
}

fn text_content(text: String) -> dto::Content {
    dto::Content {
        role: Some("user".to_string()),
        parts: vec![dto::Part {
            text: Some(text),
            inline_data: None,
        }],
    }
}

fn movie_prompt(genre: Genre) -> String {
    format!(
        "Create a fictional, cult-classic vintage movie entry from the 1970s, 80s, or 90s \
         based on the genre: \"{genre}\". Be creative, funny, or dramatic.\n\
         Return a JSON object with the following fields:\n\
         - title: The name of the movie (make it sound vintage).\n\
         - year: A year between 1970 and 1999.\n\
         - director: A fictional director name.\n\
         - plot: A short, engaging 2-3 sentence plot summary.\n\
         - tagline: A cheesy or dramatic tagline.\n\
         - rating: A star rating (e.g., \"4.5/5\").\n\
         - posterPrompt: A highly descriptive visual prompt to generate a vintage movie \
         poster for this film, including style details like \"painted style, 80s movie \
         poster, distressed texture\"."
    )
}

fn movie_schema() -> serde_json::Value {
    let fields = [
        "title",
        "year",
        "director",
        "plot",
        "tagline",
        "rating",
        "posterPrompt",
    ];
    let properties: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}
