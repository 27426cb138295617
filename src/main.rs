//! RetroView - a retro TV that plays movies from genre discs.
//!
//! Insert a disc, get a movie (from TMDb, Gemini, or the built-in
//! catalogue), and listen to its soundtrack resolved through MusicBrainz
//! and Spotify.

pub mod cli;
pub mod config;
pub mod error;
pub mod movie;
pub mod session;
pub mod soundtrack;
#[cfg(test)]
pub mod test_utils;
pub mod tv;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("retroview=info".parse()?))
        .init();

    cli::run_command(&args)
}
