//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`SoundtrackError`], [`MovieError`], [`ConfigError`]); this module
//! aggregates them. CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Example
//!
//! ```ignore
//! use retroview::error::{Result, ResultExt};
//!
//! async fn lookup(resolver: &Resolver, subject: &Subject) -> Result<Vec<Track>> {
//!     let tracks = resolver.resolve(subject, |_| {}).await?; // auto-converts
//!     Ok(tracks)
//! }
//! ```

use crate::config::ConfigError;
use crate::movie::MovieError;
use crate::soundtrack::SoundtrackError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Soundtrack lookup error
    #[error("Soundtrack error: {0}")]
    Soundtrack(#[from] SoundtrackError),

    /// Movie selection error
    #[error("Movie error: {0}")]
    Movie(#[from] MovieError),

    /// Config file error
    #[error("Config file error: {0}")]
    ConfigFile(#[from] ConfigError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential is missing
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a missing-credential error.
    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, SoundtrackError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Soundtrack(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, MovieError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Movie(e).context(ctx))
    }
}
