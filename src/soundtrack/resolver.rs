//! Soundtrack resolver - turns a movie into an ordered list of playable tracks.
//!
//! Pipeline for one lookup:
//! 1. Serve a fresh cache entry (including a known-empty one) and stop
//! 2. Ask the metadata service for the movie's soundtrack release
//! 3. Resolve the release's tracks one at a time against the search service,
//!    trying query formulations from most to least specific
//! 4. Deliver the cumulative list after every resolved track
//! 5. Write the final list to the cache
//!
//! Tracks are resolved strictly in release order, never concurrently, so
//! updates arrive in track order and the search service sees one request at
//! a time. Concurrent lookups for the same subject are not deduplicated; the
//! last cache write wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::channel::mpsc;

use super::cache::SoundtrackCache;
use super::domain::{
    CacheKey, Release, ReleaseTrack, SearchHit, SoundtrackError, Subject, Track, UNKNOWN_ARTIST,
};
use super::query;
use super::traits::{MetadataApi, TrackSearchApi};

/// Longest wait between rate-limited retries
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Tuning knobs for the resolver
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Only the first `max_tracks` entries of a release are attempted
    pub max_tracks: usize,
    /// Chance that a lookup sweeps expired cache entries first (0.0 - 1.0)
    pub sweep_probability: f64,
    /// Retries per request after a rate-limit response
    pub max_retries: u32,
    /// First backoff delay when the service gives no `Retry-After`; doubles per retry
    pub backoff_base: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_tracks: 200,
            sweep_probability: 0.1,
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

/// Resolves soundtracks through a metadata service and a track search service.
pub struct SoundtrackResolver<M, S> {
    metadata: M,
    search: S,
    cache: Arc<SoundtrackCache>,
    options: ResolverOptions,
}

impl<M: MetadataApi, S: TrackSearchApi> SoundtrackResolver<M, S> {
    pub fn new(metadata: M, search: S, cache: Arc<SoundtrackCache>, options: ResolverOptions) -> Self {
        Self {
            metadata,
            search,
            cache,
            options,
        }
    }

    /// The shared cache this resolver reads and writes.
    pub fn cache(&self) -> &Arc<SoundtrackCache> {
        &self.cache
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve the soundtrack for `subject`.
    ///
    /// `on_update` receives the cumulative track list each time it grows (or
    /// once, for a cache hit). The returned list is the final one.
    ///
    /// A release that does not exist yields `Ok` with no tracks and is cached.
    /// A metadata service failure yields `Err` and nothing is cached.
    pub async fn resolve<F>(&self, subject: &Subject, mut on_update: F) -> Result<Vec<Track>, SoundtrackError>
    where
        F: FnMut(&[Track]) + Send,
    {
        self.maybe_sweep();

        let key = CacheKey::from(subject);
        if let Some(tracks) = self.cache.get(&key) {
            tracing::info!("Using cached soundtrack for {:?} ({} tracks)", subject.title, tracks.len());
            on_update(&tracks);
            return Ok(tracks);
        }

        tracing::info!("Searching soundtrack for {:?}", subject.title);
        let metadata = &self.metadata;
        let title = subject.title.as_str();
        let release = match self
            .with_backoff(move || metadata.find_soundtrack(title))
            .await
        {
            Ok(Some(release)) => release,
            Ok(None) => {
                tracing::info!("No soundtrack release found for {:?}", subject.title);
                self.cache.put(key, Vec::new());
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::error!("Soundtrack metadata lookup failed for {:?}: {}", subject.title, e);
                return Err(e);
            }
        };

        let total = release.tracks.len();
        if total > self.options.max_tracks {
            tracing::warn!(
                "Soundtrack {:?} has {} tracks, processing first {}",
                release.title,
                total,
                self.options.max_tracks
            );
        }

        let mut resolved: Vec<Track> = Vec::new();
        for (index, candidate) in release.tracks.iter().take(self.options.max_tracks).enumerate() {
            match self.resolve_track(&release, candidate).await {
                Ok(Some(track)) => {
                    tracing::debug!("Resolved track {} of {}: {:?}", index + 1, total, track.title);
                    resolved.push(track);
                    self.cache.put(key.clone(), resolved.clone());
                    on_update(&resolved);
                }
                Ok(None) => {
                    tracing::debug!("No playable match for track {} of {}, skipping", index + 1, total);
                }
                Err(e) if resolved.is_empty() => {
                    tracing::error!("Track search unavailable for {:?}: {}", subject.title, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        "Track search failed after {} tracks for {:?}, keeping partial result: {}",
                        resolved.len(),
                        subject.title,
                        e
                    );
                    self.cache.put(key, resolved.clone());
                    return Ok(resolved);
                }
            }
        }

        tracing::info!(
            "Resolved {} of {} soundtrack tracks for {:?}",
            resolved.len(),
            total.min(self.options.max_tracks),
            subject.title
        );
        self.cache.put(key, resolved.clone());
        Ok(resolved)
    }

    /// Resolve a single release track. `Ok(None)` means every query missed.
    ///
    /// Only fatal search errors are returned; anything else counts as a miss
    /// for that query.
    async fn resolve_track(&self, release: &Release, candidate: &ReleaseTrack) -> Result<Option<Track>, SoundtrackError> {
        let Some(title) = candidate.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let artist = candidate.artist.as_deref().or(release.artist.as_deref());

        for query in query::formulations(title, artist, Some(&release.title)) {
            match self.search(&query).await {
                Ok(Some(hit)) => {
                    tracing::debug!("Matched {:?} using query {}", title, query);
                    let artist = artist
                        .map(str::to_string)
                        .or(hit.artist)
                        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
                    return Ok(Some(Track {
                        title: title.to_string(),
                        artist,
                        reference: hit.reference,
                    }));
                }
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => tracing::debug!("Search query {} failed: {}", query, e),
            }
        }

        Ok(None)
    }

    async fn search(&self, query: &str) -> Result<Option<SearchHit>, SoundtrackError> {
        let search = &self.search;
        self.with_backoff(move || search.search_track(query)).await
    }

    /// Run `request`, sleeping and retrying while the service rate-limits us.
    async fn with_backoff<T, F, Fut>(&self, mut request: F) -> Result<T, SoundtrackError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SoundtrackError>>,
    {
        let mut attempt = 0;
        loop {
            match request().await {
                Err(SoundtrackError::RateLimited(retry_after)) if attempt < self.options.max_retries => {
                    let delay = retry_after.unwrap_or_else(|| backoff_delay(self.options.backoff_base, attempt));
                    tracing::warn!("Rate limited, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn maybe_sweep(&self) {
        let p = self.options.sweep_probability.clamp(0.0, 1.0);
        if p > 0.0 && rand::random_bool(p) {
            self.cache.sweep();
        }
    }
}

/// Exponential delay for `attempt`, capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_BACKOFF)
}

impl<M, S> SoundtrackResolver<M, S>
where
    M: MetadataApi + 'static,
    S: TrackSearchApi + 'static,
{
    /// Resolve on the tokio runtime and stream the cumulative updates.
    ///
    /// Dropping the receiver does not stop the lookup; it runs to completion
    /// and still writes the cache.
    pub fn spawn(self: &Arc<Self>, subject: Subject) -> mpsc::UnboundedReceiver<Vec<Track>> {
        let (tx, rx) = mpsc::unbounded();
        let resolver = Arc::clone(self);
        tokio::spawn(async move {
            let deliver = |tracks: &[Track]| {
                // Receiver gone means nobody is watching anymore
                let _ = tx.unbounded_send(tracks.to_vec());
            };
            if let Err(e) = resolver.resolve(&subject, deliver).await {
                tracing::warn!("Background soundtrack lookup for {:?} failed: {}", subject.title, e);
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soundtrack::cache::CacheEntry;
    use crate::soundtrack::traits::mocks::{MockMetadata, MockSearch};
    use crate::test_utils::{release, release_track};
    use chrono::{TimeDelta, Utc};
    use futures::StreamExt;

    fn options() -> ResolverOptions {
        ResolverOptions {
            sweep_probability: 0.0,
            backoff_base: Duration::ZERO,
            ..Default::default()
        }
    }

    fn resolver(
        metadata: MockMetadata,
        search: MockSearch,
    ) -> SoundtrackResolver<MockMetadata, MockSearch> {
        SoundtrackResolver::new(metadata, search, Arc::new(SoundtrackCache::default()), options())
    }

    fn q_album(title: &str) -> String {
        format!(r#"track:"{}" artist:"Composer" album:"Dust & Glory OST""#, title)
    }

    fn q_title(title: &str) -> String {
        format!(r#"track:"{}""#, title)
    }

    fn dust_and_glory() -> Release {
        release(
            "Dust & Glory OST",
            Some("Composer"),
            vec![
                release_track("Opening", None),
                release_track("Showdown", None),
                release_track("Sunset", None),
            ],
        )
    }

    #[tokio::test]
    async fn test_incremental_delivery_with_fallback_query() {
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .hit(q_title("Showdown"), "ref-2")
            .hit(q_album("Sunset"), "ref-3");
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        let mut updates: Vec<Vec<String>> = Vec::new();
        let tracks = resolver
            .resolve(&subject, |t| updates.push(t.iter().map(|t| t.reference.clone()).collect()))
            .await
            .unwrap();

        assert_eq!(
            updates,
            vec![
                vec!["ref-1"],
                vec!["ref-1", "ref-2"],
                vec!["ref-1", "ref-2", "ref-3"],
            ]
        );
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[1].title, "Showdown");
        assert_eq!(tracks[1].artist, "Composer");

        // Track 2 needed all three formulations; the others matched first try
        let queries = resolver.search.queries();
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[3], q_title("Showdown"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let search = MockSearch::new().hit(q_album("Opening"), "ref-1");
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        let first = resolver.resolve(&subject, |_| {}).await.unwrap();
        let queries_after_first = resolver.search.queries().len();

        let mut deliveries = 0;
        let second = resolver.resolve(&subject, |_| deliveries += 1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(deliveries, 1);
        assert_eq!(resolver.metadata.calls(), 1);
        assert_eq!(resolver.search.queries().len(), queries_after_first);
    }

    #[tokio::test]
    async fn test_missing_release_is_cached_as_empty() {
        let resolver = resolver(MockMetadata::no_release(), MockSearch::new());
        let subject = Subject::new("7", "Obscure Film");

        assert!(resolver.resolve(&subject, |_| {}).await.unwrap().is_empty());
        assert!(resolver.resolve(&subject, |_| {}).await.unwrap().is_empty());

        assert_eq!(resolver.metadata.calls(), 1);
        assert!(resolver.search.queries().is_empty());
        assert_eq!(resolver.cache().get(&CacheKey::from(&subject)), Some(vec![]));
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let search = MockSearch::new().hit(q_album("Opening"), "fresh");
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        resolver.cache().insert_entry(
            CacheKey::from(&subject),
            CacheEntry {
                tracks: vec![crate::test_utils::track(9)],
                created_at: Utc::now() - TimeDelta::hours(25),
            },
        );

        let tracks = resolver.resolve(&subject, |_| {}).await.unwrap();
        assert_eq!(resolver.metadata.calls(), 1);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].reference, "fresh");
    }

    #[tokio::test]
    async fn test_metadata_failure_is_not_cached() {
        let resolver = resolver(
            MockMetadata::with_error(SoundtrackError::Network("connection reset".into())),
            MockSearch::new(),
        );
        let subject = Subject::new("1", "Anything");

        let result = resolver.resolve(&subject, |_| {}).await;
        assert!(matches!(result, Err(SoundtrackError::Network(_))));
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_tracks_are_skipped() {
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .hit(q_album("Sunset"), "ref-3");
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);

        let tracks = resolver.resolve(&Subject::new("42", "Dust & Glory"), |_| {}).await.unwrap();
        let refs: Vec<_> = tracks.iter().map(|t| t.reference.as_str()).collect();
        assert_eq!(refs, vec!["ref-1", "ref-3"]);
    }

    #[tokio::test]
    async fn test_search_errors_fall_through_to_next_query() {
        let search = MockSearch::new()
            .error(q_album("Opening"), SoundtrackError::Network("timeout".into()))
            .hit(r#"track:"Opening" artist:"Composer""#, "ref-1");
        let release = release("Dust & Glory OST", Some("Composer"), vec![release_track("Opening", None)]);
        let resolver = resolver(MockMetadata::with_release(release), search);

        let tracks = resolver.resolve(&Subject::new("42", "Dust & Glory"), |_| {}).await.unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_query_is_retried() {
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .rate_limited(q_album("Opening"), 2);
        let release = release("Dust & Glory OST", Some("Composer"), vec![release_track("Opening", None)]);
        let resolver = resolver(MockMetadata::with_release(release), search);

        let tracks = resolver.resolve(&Subject::new("42", "Dust & Glory"), |_| {}).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(resolver.search.queries().len(), 3);
    }

    #[test]
    fn test_backoff_delay_doubles_then_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), base);
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
        assert_eq!(backoff_delay(base, 32), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, u32::MAX), MAX_BACKOFF);
        assert_eq!(backoff_delay(Duration::ZERO, 40), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_many_retries_do_not_overflow_backoff() {
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .rate_limited(q_album("Opening"), 40);
        let release = release("Dust & Glory OST", Some("Composer"), vec![release_track("Opening", None)]);
        let resolver = SoundtrackResolver::new(
            MockMetadata::with_release(release),
            search,
            Arc::new(SoundtrackCache::default()),
            ResolverOptions {
                max_retries: 40,
                ..options()
            },
        );

        let tracks = resolver.resolve(&Subject::new("42", "Dust & Glory"), |_| {}).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(resolver.search.queries().len(), 41);
    }

    #[tokio::test]
    async fn test_lookup_sweeps_expired_entries() {
        let search = MockSearch::new().hit(q_album("Opening"), "ref-1");
        let resolver = SoundtrackResolver::new(
            MockMetadata::with_release(dust_and_glory()),
            search,
            Arc::new(SoundtrackCache::default()),
            ResolverOptions {
                sweep_probability: 1.0,
                ..options()
            },
        );
        let stale = CacheKey::from(&Subject::new("9", "Forgotten Film"));
        resolver.cache().insert_entry(
            stale.clone(),
            CacheEntry {
                tracks: vec![crate::test_utils::track(1)],
                created_at: Utc::now() - TimeDelta::hours(25),
            },
        );
        assert_eq!(resolver.cache().len(), 1);

        resolver.resolve(&Subject::new("42", "Dust & Glory"), |_| {}).await.unwrap();

        assert!(!resolver.cache().purge(&stale));
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_failure_keeps_partial_result() {
        // Opening matches on the first query, then the token is revoked
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .hit(q_album("Showdown"), "ref-2")
            .fail_after(1);
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        let tracks = resolver.resolve(&subject, |_| {}).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(resolver.cache().get(&CacheKey::from(&subject)).map(|t| t.len()), Some(1));
    }

    #[tokio::test]
    async fn test_fatal_failure_before_any_track_is_an_error() {
        let search = MockSearch::new().fail_after(0);
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        assert!(matches!(
            resolver.resolve(&subject, |_| {}).await,
            Err(SoundtrackError::Auth(_))
        ));
        assert!(resolver.cache().get(&CacheKey::from(&subject)).is_none());
    }

    #[tokio::test]
    async fn test_track_cap() {
        let tracks: Vec<_> = (0..5).map(|i| release_track(&format!("Cue {}", i), None)).collect();
        let mut search = MockSearch::new();
        for i in 0..5 {
            search = search.hit(q_title(&format!("Cue {}", i)), &format!("ref-{}", i));
        }
        let resolver = SoundtrackResolver::new(
            MockMetadata::with_release(release("Score", None, tracks)),
            search,
            Arc::new(SoundtrackCache::default()),
            ResolverOptions {
                max_tracks: 3,
                ..options()
            },
        );

        let resolved = resolver.resolve(&Subject::new("1", "Score"), |_| {}).await.unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[2].reference, "ref-2");
    }

    #[tokio::test]
    async fn test_artist_falls_back_to_search_hit_then_unknown() {
        let search = MockSearch::new()
            .hit_with_artist(q_title("Known"), "ref-1", "Search Artist")
            .hit(q_title("Nobody"), "ref-2");
        let release = release(
            "Score",
            None,
            vec![release_track("Known", None), release_track("Nobody", None)],
        );
        let resolver = resolver(MockMetadata::with_release(release), search);

        let tracks = resolver.resolve(&Subject::new("1", "Score"), |_| {}).await.unwrap();
        assert_eq!(tracks[0].artist, "Search Artist");
        assert_eq!(tracks[1].artist, UNKNOWN_ARTIST);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_are_not_deduplicated() {
        let search = MockSearch::new().hit(q_album("Opening"), "ref-1");
        let resolver = resolver(MockMetadata::with_release(dust_and_glory()), search);
        let subject = Subject::new("42", "Dust & Glory");

        let (a, b) = tokio::join!(
            resolver.resolve(&subject, |_| {}),
            resolver.resolve(&subject, |_| {})
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(resolver.metadata.calls(), 2);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_streams_updates() {
        let search = MockSearch::new()
            .hit(q_album("Opening"), "ref-1")
            .hit(q_album("Showdown"), "ref-2");
        let resolver = Arc::new(resolver(MockMetadata::with_release(dust_and_glory()), search));

        let updates: Vec<Vec<Track>> = resolver.spawn(Subject::new("42", "Dust & Glory")).collect().await;
        let lengths: Vec<_> = updates.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_dropped_receiver_still_writes_cache() {
        let search = MockSearch::new().hit(q_album("Opening"), "ref-1");
        let resolver = Arc::new(resolver(MockMetadata::with_release(dust_and_glory()), search));
        let subject = Subject::new("42", "Dust & Glory");

        drop(resolver.spawn(subject.clone()));

        for _ in 0..100 {
            if resolver.metadata.calls() == 1 && resolver.search.queries().len() == 7 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        // Let the final cache write land
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(resolver.cache().get(&CacheKey::from(&subject)).map(|t| t.len()), Some(1));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Output keeps release order and drops exactly the unmatched tracks.
            #[test]
            fn output_preserves_release_order(matches in proptest::collection::vec(any::<bool>(), 0..20)) {
                let titles: Vec<String> = (0..matches.len()).map(|i| format!("Cue {}", i)).collect();
                let mut search = MockSearch::new();
                for (title, matched) in titles.iter().zip(&matches) {
                    if *matched {
                        search = search.hit(q_title(title), title);
                    }
                }
                let release = release("Score", None, titles.iter().map(|t| release_track(t, None)).collect());
                let resolver = resolver(MockMetadata::with_release(release), search);

                let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
                let tracks = rt.block_on(resolver.resolve(&Subject::new("p", "Score"), |_| {})).unwrap();

                let expected: Vec<&String> = titles.iter().zip(&matches).filter(|(_, m)| **m).map(|(t, _)| t).collect();
                let actual: Vec<&String> = tracks.iter().map(|t| &t.reference).collect();
                prop_assert_eq!(actual, expected);
                if matches.iter().any(|m| !m) {
                    prop_assert!(tracks.len() < matches.len());
                }
            }
        }
    }
}
