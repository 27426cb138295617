//! Soundtrack lookup and saved track list commands.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::session::ResolutionSession;
use crate::soundtrack::{Subject, Track, parse_track_list, spotify};

use super::{build_resolver, exit_not_configured};

/// Resolve a soundtrack and print the tracks
pub fn cmd_soundtrack(
    rt: &Runtime,
    config: &Config,
    id: &str,
    title: &str,
    watch: bool,
    json: bool,
) -> anyhow::Result<()> {
    let resolver = match build_resolver(config) {
        Ok(resolver) => resolver,
        Err(e) => exit_not_configured(
            &e,
            "Create an app at https://developer.spotify.com/dashboard, then set \
             SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET",
        ),
    };
    let subject = Subject::new(id, title);

    rt.block_on(async {
        if !json {
            println!("Looking up soundtrack for {:?}...", title);
        }

        let tracks = resolver
            .resolve(&subject, |so_far| {
                if watch && !json && let Some(latest) = so_far.last() {
                    println!("  + [{}] {}", so_far.len(), describe_track(latest));
                }
            })
            .await
            .with_context(format!("resolving soundtrack for {:?}", title))?;

        if json {
            println!("{}", serde_json::to_string_pretty(&tracks)?);
            return anyhow::Ok(());
        }

        println!();
        if tracks.is_empty() {
            println!("✗ No soundtrack tracks found");
            println!("  Try searching manually: {}", spotify::manual_search_url(title));
        } else {
            println!("✓ {} tracks", tracks.len());
            for (i, track) in tracks.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, describe_track(track));
                println!("       {}", track.reference);
            }
        }
        anyhow::Ok(())
    })
}

/// Load a saved track list and show it with `track` (1-based) selected
pub fn cmd_play(file: &Path, track: usize) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .map_err(Error::from)
        .with_context(format!("reading {}", file.display()))?;
    let tracks = parse_track_list(&json).with_context(format!("parsing {}", file.display()))?;

    let name = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let session = load_session(Subject::new(name.clone(), name), &tracks, track);

    match session.current() {
        Some(current) => {
            println!("✓ {} tracks loaded", session.len());
            for (i, t) in session.tracks().iter().enumerate() {
                let marker = if i == session.cursor() { "▶" } else { " " };
                println!("  {} {:>3}. {}", marker, i + 1, describe_track(t));
            }
            println!();
            println!("Now playing: {}", current.reference);
        }
        None => println!("✗ Track list is empty"),
    }
    Ok(())
}

/// Session holding `tracks`, with the 1-based `track` selected when it exists.
fn load_session(subject: Subject, tracks: &[Track], track: usize) -> ResolutionSession {
    let mut session = ResolutionSession::new(subject);
    session.apply_update(tracks);
    if let Some(index) = track.checked_sub(1)
        && session.select(index).is_none()
    {
        tracing::warn!("Track {} not in list of {}, starting at 1", track, session.len());
    }
    session
}

fn describe_track(track: &Track) -> String {
    format!("{} - {}", track.artist, track.title)
}
