//! MusicBrainz API Data Transfer Objects
//!
//! These types match EXACTLY what the MusicBrainz API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the musicbrainz module - convert to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! Three endpoints are used to get from a movie title to a track list:
//! release-group search, release browse by release group, release lookup.

use serde::{Deserialize, Serialize};

/// `/release-group?query=...` search response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseGroupSearchResponse {
    /// Total hits reported by the search
    pub count: Option<u32>,
    #[serde(default)]
    pub release_groups: Vec<ReleaseGroup>,
}

/// Release group (e.g., one soundtrack across all editions)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseGroup {
    /// MusicBrainz release group ID
    pub id: String,
    pub title: String,
    /// Search relevance (0-100)
    pub score: Option<u32>,
    /// Primary type (Album, Single, EP, etc.)
    pub primary_type: Option<String>,
    /// Secondary types (Soundtrack, Compilation, Live, etc.)
    #[serde(default)]
    pub secondary_types: Vec<String>,
}

/// `/release?release-group=...` browse response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseBrowseResponse {
    pub release_count: Option<u32>,
    #[serde(default)]
    pub releases: Vec<ReleaseSummary>,
}

/// Release as listed by the browse endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseSummary {
    pub id: String,
    pub title: String,
    /// Release status (Official, Bootleg, etc.)
    pub status: Option<String>,
}

/// `/release/<id>?inc=recordings+artist-credits` lookup response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseResponse {
    pub id: String,
    pub title: String,
    /// Release-level artist credits
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
    /// Media (discs) in this release
    #[serde(default)]
    pub media: Vec<Medium>,
}

/// Artist credit (can be multiple for collaborations)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    /// The artist
    pub artist: Artist,
    /// How this artist is credited (may differ from official name)
    pub name: Option<String>,
    /// Join phrase (e.g., " & ", " feat. ")
    pub joinphrase: Option<String>,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Artist {
    /// MusicBrainz artist ID
    pub id: String,
    /// Official artist name
    pub name: String,
    /// Sort name (e.g., "Morricone, Ennio")
    pub sort_name: Option<String>,
}

/// Medium (disc) within a release
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Medium {
    /// Position in release (disc number)
    pub position: Option<u32>,
    /// Format (CD, Vinyl, Digital, etc.)
    pub format: Option<String>,
    /// Number of tracks
    pub track_count: Option<u32>,
    /// Tracks on this medium
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Track on a medium
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    /// Track position on medium
    pub position: Option<u32>,
    /// Track title (may differ from recording title)
    pub title: Option<String>,
    /// The recording behind this track (present with `inc=recordings`)
    pub recording: Option<Recording>,
}

/// Recording referenced by a track
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Recording {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
}

/// Error response from MusicBrainz API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
    pub help: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_release_group_search() {
        let json = r#"{
            "created": "2025-01-01T00:00:00.000Z",
            "count": 2,
            "offset": 0,
            "release-groups": [{
                "id": "rg-1",
                "score": 100,
                "title": "Dust & Glory (Original Motion Picture Soundtrack)",
                "primary-type": "Album",
                "secondary-types": ["Soundtrack"]
            }]
        }"#;

        let response: ReleaseGroupSearchResponse =
            serde_json::from_str(json).expect("Should parse release group search");

        assert_eq!(response.count, Some(2));
        assert_eq!(response.release_groups.len(), 1);
        let rg = &response.release_groups[0];
        assert_eq!(rg.id, "rg-1");
        assert_eq!(rg.score, Some(100));
        assert_eq!(rg.secondary_types, vec!["Soundtrack".to_string()]);
    }

    #[test]
    fn test_parse_empty_search() {
        let json = r#"{"count": 0, "offset": 0, "release-groups": []}"#;
        let response: ReleaseGroupSearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.release_groups.is_empty());
    }

    #[test]
    fn test_parse_release_browse() {
        let json = r#"{
            "release-count": 3,
            "release-offset": 0,
            "releases": [{"id": "rel-1", "title": "Dust & Glory", "status": "Official"}]
        }"#;

        let response: ReleaseBrowseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.release_count, Some(3));
        assert_eq!(response.releases[0].id, "rel-1");
    }

    #[test]
    fn test_parse_release_with_recordings() {
        let json = r#"{
            "id": "rel-1",
            "title": "Dust & Glory",
            "artist-credit": [{
                "artist": {"id": "art-1", "name": "Clint Rivers", "sort-name": "Rivers, Clint"},
                "name": "Clint Rivers",
                "joinphrase": ""
            }],
            "media": [{
                "position": 1,
                "format": "CD",
                "track-count": 2,
                "tracks": [
                    {
                        "id": "t-1",
                        "position": 1,
                        "title": "Opening",
                        "recording": {
                            "id": "rec-1",
                            "title": "Opening",
                            "artist-credit": [{"artist": {"id": "art-2", "name": "The Drifters"}}]
                        }
                    },
                    {"id": "t-2", "position": 2, "title": "Showdown", "recording": {"id": "rec-2"}}
                ]
            }]
        }"#;

        let release: ReleaseResponse =
            serde_json::from_str(json).expect("Should parse release with recordings");

        assert_eq!(release.artist_credit[0].artist.name, "Clint Rivers");
        let tracks = &release.media[0].tracks;
        assert_eq!(tracks.len(), 2);
        let recording = tracks[0].recording.as_ref().unwrap();
        assert_eq!(recording.artist_credit[0].artist.name, "The Drifters");
        assert!(tracks[1].recording.as_ref().unwrap().artist_credit.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{
            "error": "Not Found",
            "help": "For usage, please see: https://musicbrainz.org/doc/MusicBrainz_API"
        }"#;

        let error: ApiError = serde_json::from_str(json).expect("Should parse error");
        assert_eq!(error.error, "Not Found");
        assert!(error.help.is_some());
    }
}
