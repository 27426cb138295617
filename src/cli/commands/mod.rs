//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `soundtrack`: soundtrack lookups and saved track lists
//! - `movie`: movie selection, search and posters
//! - `tv`: the disc-inserting TV session
//! - `settings`: config file management

mod movie;
mod settings;
mod soundtrack;
mod tv;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::movie::{Genre, MovieService, Poster};
use crate::soundtrack::{MusicBrainzClient, SoundtrackCache, SoundtrackResolver, SpotifyClient};

pub use movie::{cmd_genres, cmd_movie, cmd_poster, cmd_search};
pub use settings::cmd_config;
pub use soundtrack::{cmd_play, cmd_soundtrack};
pub use tv::cmd_tv;

/// RetroView CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// API credentials. Flags and env vars override the config file.
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// Spotify client id (or set SPOTIFY_CLIENT_ID env var)
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,
    /// Spotify client secret (or set SPOTIFY_CLIENT_SECRET env var)
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
    /// TMDb API key (or set TMDB_API_KEY env var)
    #[arg(long, global = true, env = "TMDB_API_KEY", hide_env_values = true)]
    pub tmdb_api_key: Option<String>,
    /// Gemini API key (or set GEMINI_API_KEY env var)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a movie's soundtrack into playable tracks
    Soundtrack {
        /// Movie id (cache key half)
        id: String,
        /// Movie title
        title: String,
        /// Print every incremental update as tracks resolve
        #[arg(long)]
        watch: bool,
        /// Print the final track list as JSON (loadable with `play`)
        #[arg(long)]
        json: bool,
    },
    /// Load a saved JSON track list and select a track
    Play {
        /// Track list file; entries may be full objects or bare embed URLs
        file: PathBuf,
        /// Track to start at (1-based)
        #[arg(long, default_value_t = 1)]
        track: usize,
    },
    /// Pick a movie for a genre disc
    Movie {
        /// Genre: sci-fi, noir, western, horror, rom-com, kung-fu
        genre: Genre,
        /// Look up or generate a poster and print its location
        #[arg(long)]
        poster: bool,
    },
    /// Search the movie database
    Search {
        /// Free-text query
        query: String,
    },
    /// Generate a poster image from a prompt
    Poster {
        /// Image prompt
        prompt: String,
    },
    /// List the available genre discs
    Genres,
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Insert discs one after another and play each soundtrack
    Tv {
        /// Genres to insert, in order
        #[arg(required = true)]
        genres: Vec<Genre>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = effective_config(config::load(), &cli.credentials);

    match &cli.command {
        Commands::Soundtrack {
            id,
            title,
            watch,
            json,
        } => cmd_soundtrack(&rt, &config, id, title, *watch, *json),
        Commands::Play { file, track } => cmd_play(file, *track),
        Commands::Movie { genre, poster } => cmd_movie(&rt, &config, *genre, *poster),
        Commands::Search { query } => cmd_search(&rt, &config, query),
        Commands::Poster { prompt } => cmd_poster(&rt, &config, prompt),
        Commands::Genres => cmd_genres(),
        Commands::Config { init } => cmd_config(&rt, &config, *init),
        Commands::Tv { genres } => cmd_tv(&rt, &config, genres),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Merge credentials given on the command line or environment over the file.
pub(crate) fn effective_config(mut config: Config, args: &CredentialArgs) -> Config {
    let creds = &mut config.credentials;
    let overrides = [
        (&mut creds.spotify_client_id, &args.spotify_client_id),
        (&mut creds.spotify_client_secret, &args.spotify_client_secret),
        (&mut creds.tmdb_api_key, &args.tmdb_api_key),
        (&mut creds.gemini_api_key, &args.gemini_api_key),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
            *slot = Some(value.clone());
        }
    }
    config
}

/// Resolver backed by MusicBrainz and Spotify with a fresh cache.
pub(crate) fn build_resolver(
    config: &Config,
) -> Result<Arc<SoundtrackResolver<MusicBrainzClient, SpotifyClient>>> {
    let creds = &config.credentials;
    let (Some(id), Some(secret)) = (
        creds.spotify_client_id.as_deref().filter(|v| !v.is_empty()),
        creds.spotify_client_secret.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(Error::not_configured("Spotify client credentials"));
    };

    let settings = &config.soundtrack;
    let metadata = MusicBrainzClient::new().with_request_interval(settings.musicbrainz_interval());
    let cache = Arc::new(SoundtrackCache::new(settings.cache_ttl()));

    Ok(Arc::new(SoundtrackResolver::new(
        metadata,
        SpotifyClient::new(id, secret),
        cache,
        settings.resolver_options(),
    )))
}

/// Movie service from whichever keys are configured.
pub(crate) fn build_movie_service(config: &Config) -> MovieService {
    let creds = &config.credentials;
    MovieService::from_keys(creds.tmdb_api_key.as_deref(), creds.gemini_api_key.as_deref())
        .generate_posters(config.movies.generate_posters)
}

/// Print a missing-credential error with a hint and exit.
pub(crate) fn exit_not_configured(err: &Error, hint: &str) -> ! {
    eprintln!("Error: {}.", err);
    eprintln!("{}", hint);
    std::process::exit(1);
}

/// Short human description of a poster. Inline images are summarized.
pub(crate) fn describe_poster(poster: &Poster) -> String {
    match poster {
        Poster::Url(url) => url.clone(),
        Poster::Inline {
            mime_type,
            data_base64,
        } => format!("generated {} ({} KB base64)", mime_type, data_base64.len() / 1024),
    }
}
