//! Search query formulation for the track search service.
//!
//! Queries are tried most specific first and the first match wins, so the
//! order of [`formulations`] is part of the resolver's behaviour.

/// Build the prioritized list of search queries for one track.
///
/// 1. `track:"<title>" artist:"<artist>" album:"<album>"`
/// 2. `track:"<title>" artist:"<artist>"`
/// 3. `track:"<title>"`
///
/// Variants whose fields are missing are left out.
pub fn formulations(title: &str, artist: Option<&str>, album: Option<&str>) -> Vec<String> {
    let title = field(title);
    let artist = artist.map(field).filter(|a| !a.is_empty());
    let album = album.map(field).filter(|a| !a.is_empty());

    let mut queries = Vec::with_capacity(3);
    if let Some(ref artist) = artist {
        if let Some(ref album) = album {
            queries.push(format!(
                "track:\"{}\" artist:\"{}\" album:\"{}\"",
                title, artist, album
            ));
        }
        queries.push(format!("track:\"{}\" artist:\"{}\"", title, artist));
    }
    queries.push(format!("track:\"{}\"", title));
    queries
}

/// Strip characters that would break a quoted field filter.
fn field(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_formulation_order() {
        let queries = formulations("Main Title", Some("Ennio Morricone"), Some("Dust & Glory OST"));
        assert_eq!(
            queries,
            vec![
                r#"track:"Main Title" artist:"Ennio Morricone" album:"Dust & Glory OST""#,
                r#"track:"Main Title" artist:"Ennio Morricone""#,
                r#"track:"Main Title""#,
            ]
        );
    }

    #[test]
    fn test_without_artist_only_title_query() {
        let queries = formulations("Main Title", None, Some("Album"));
        assert_eq!(queries, vec![r#"track:"Main Title""#]);
    }

    #[test]
    fn test_without_album_skips_album_query() {
        let queries = formulations("Main Title", Some("Composer"), None);
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("artist:"));
    }

    #[test]
    fn test_quotes_are_stripped() {
        let queries = formulations("The \"Big\" One", Some(" "), None);
        assert_eq!(queries, vec![r#"track:"The Big One""#]);
    }
}
