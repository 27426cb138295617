//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if MusicBrainz changes their response format,
//! only this file and dto.rs need to change.

use super::dto;
use crate::soundtrack::domain::{Release, ReleaseTrack};

/// Convert a release lookup into a domain release.
///
/// Tracks from every medium are concatenated in disc order. Slots without a
/// recording keep their position but carry no title, so they are skipped
/// during resolution.
pub fn to_release(response: dto::ReleaseResponse) -> Release {
    let artist = build_artist_string(&response.artist_credit);

    let tracks = response
        .media
        .into_iter()
        .flat_map(|medium| medium.tracks)
        .map(to_release_track)
        .collect();

    Release {
        id: response.id,
        title: response.title,
        artist,
        tracks,
    }
}

fn to_release_track(track: dto::Track) -> ReleaseTrack {
    let Some(recording) = track.recording else {
        return ReleaseTrack::default();
    };

    ReleaseTrack {
        title: track.title.or(recording.title),
        artist: build_artist_string(&recording.artist_credit),
    }
}

/// Build a combined artist string from artist credits
fn build_artist_string(credits: &[dto::ArtistCredit]) -> Option<String> {
    if credits.is_empty() {
        return None;
    }

    let mut result = String::new();
    for credit in credits {
        // Use credited name if available, otherwise official name
        let name = credit.name.as_ref().unwrap_or(&credit.artist.name);
        result.push_str(name);

        // Add join phrase if present (e.g., " & ", " feat. ")
        if let Some(ref join) = credit.joinphrase {
            result.push_str(join);
        }
    }

    Some(result)
}

/// Pick the release group to use from search results.
///
/// Prefers groups MusicBrainz tags as soundtracks, otherwise the top hit.
pub fn pick_release_group(groups: &[dto::ReleaseGroup]) -> Option<&dto::ReleaseGroup> {
    groups
        .iter()
        .find(|rg| rg.secondary_types.iter().any(|t| t == "Soundtrack"))
        .or_else(|| groups.first())
}
