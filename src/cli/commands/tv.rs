//! TV session command: insert discs and play their soundtracks.

use futures::StreamExt;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::movie::Genre;
use crate::soundtrack::spotify;
use crate::tv::RetroTv;

use super::movie::print_movie;
use super::{build_movie_service, build_resolver, exit_not_configured};

/// Insert each disc in turn, wait for its soundtrack, then show the watch list
pub fn cmd_tv(rt: &Runtime, config: &Config, genres: &[Genre]) -> anyhow::Result<()> {
    let resolver = match build_resolver(config) {
        Ok(resolver) => resolver,
        Err(e) => exit_not_configured(&e, "The TV needs Spotify credentials to play soundtracks"),
    };
    let mut tv = RetroTv::new(build_movie_service(config), resolver);

    rt.block_on(async {
        tv.power_on();

        for &genre in genres {
            println!("═══ Inserting {} disc ═══", genre);
            let mut updates = tv.insert_disc(genre).await;

            let Some(movie) = tv.now_playing().cloned() else {
                continue;
            };
            print_movie(&movie);
            println!();

            while let Some(tracks) = updates.next().await {
                if tv.apply_update(&movie.id, &tracks)
                    && let Some(latest) = tracks.last()
                {
                    println!("  ♪ {} - {}", latest.artist, latest.title);
                }
            }

            match tv.session().and_then(|s| s.current()) {
                Some(track) => println!("✓ Now playing: {} ({})", track.title, track.reference),
                None => {
                    println!("✗ No soundtrack found");
                    println!("  Try searching manually: {}", spotify::manual_search_url(&movie.title));
                }
            }

            tv.add_to_watch_list(movie);
            println!();
        }

        println!("Watch list:");
        for (i, movie) in tv.watch_list().iter().enumerate() {
            println!("  {}. {} ({}) - {}", i + 1, movie.title, movie.year, movie.genre);
        }

        tv.power_off();
    });
    Ok(())
}
