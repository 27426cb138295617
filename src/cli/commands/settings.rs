//! Config file command.

use tokio::runtime::Runtime;

use crate::config::{self, Config};

/// Print the effective config; optionally write a default file
pub fn cmd_config(rt: &Runtime, config: &Config, init: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    match &path {
        Some(p) => println!("Config file: {}", p.display()),
        None => println!("Config file: (no config directory on this system)"),
    }

    if init {
        if path.as_ref().is_some_and(|p| p.exists()) {
            println!("✗ Config file already exists, leaving it alone");
        } else {
            let written = rt.block_on(config::save_async(Config::default()))?;
            println!("✓ Wrote default config to {}", written.display());
        }
    }

    println!();
    println!("{}", toml::to_string_pretty(&masked(config))?);
    Ok(())
}

/// Copy of `config` with secrets blanked for display.
fn masked(config: &Config) -> Config {
    let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
    let mut shown = config.clone();
    let creds = &config.credentials;
    shown.credentials.spotify_client_id = mask(&creds.spotify_client_id);
    shown.credentials.spotify_client_secret = mask(&creds.spotify_client_secret);
    shown.credentials.tmdb_api_key = mask(&creds.tmdb_api_key);
    shown.credentials.gemini_api_key = mask(&creds.gemini_api_key);
    shown
}
