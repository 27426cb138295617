//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\retroview\config.toml
//! - macOS: ~/Library/Application Support/retroview/config.toml
//! - Linux: ~/.config/retroview/config.toml
//!
//! API keys may also come from the environment; the CLI merges those over
//! whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::soundtrack::ResolverOptions;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Soundtrack lookup tuning
    pub soundtrack: SoundtrackConfig,

    /// Movie selection settings
    pub movies: MoviesConfig,
}

/// API credentials. Missing keys disable the matching service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// The Movie Database v3 key
    pub tmdb_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

/// Soundtrack resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundtrackConfig {
    /// How long resolved soundtracks stay cached
    pub cache_ttl_hours: u64,

    /// Tracks beyond this position in a release are not looked up
    pub max_tracks: usize,

    /// Chance per lookup of sweeping expired cache entries (0.0 - 1.0)
    pub sweep_probability: f64,

    /// Retries after a rate-limit response
    pub max_retries: u32,

    /// First backoff delay when no Retry-After is given
    pub backoff_base_ms: u64,

    /// Spacing between MusicBrainz requests
    pub musicbrainz_interval_ms: u64,
}

impl Default for SoundtrackConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 24,
            max_tracks: 200,
            sweep_probability: 0.1,
            max_retries: 3,
            backoff_base_ms: 500,
            musicbrainz_interval_ms: 1100,
        }
    }
}

impl SoundtrackConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600))
    }

    pub fn musicbrainz_interval(&self) -> Duration {
        Duration::from_millis(self.musicbrainz_interval_ms)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_tracks: self.max_tracks,
            sweep_probability: self.sweep_probability.clamp(0.0, 1.0),
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
        }
    }
}

/// Movie selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoviesConfig {
    /// Try to generate posters for movies without a hosted one
    pub generate_posters: bool,
}

impl Default for MoviesConfig {
    fn default() -> Self {
        Self {
            generate_posters: true,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("retroview"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the standard location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration without blocking the runtime
pub async fn save_async(config: Config) -> Result<PathBuf, ConfigError> {
    tokio::task::spawn_blocking(move || save(&config))
        .await
        .map_err(|e| ConfigError::TaskJoin(e.to_string()))?
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

// ============================================================================
// Tests
// ============================================================================
