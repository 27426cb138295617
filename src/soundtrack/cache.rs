//! In-memory soundtrack cache with a fixed time-to-live.
//!
//! Keyed by [`CacheKey`]. Expired entries are treated as absent: they are
//! purged on read and before a write, and an opportunistic [`sweep`] removes
//! the rest. Entries with no tracks are valid and mean "no soundtrack found".
//!
//! [`sweep`]: SoundtrackCache::sweep

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use super::domain::{CacheKey, Track};

/// Default time-to-live for cached soundtracks.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cached track list and when it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub tracks: Vec<Track>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Entry stamped with the current time.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            created_at: Utc::now(),
        }
    }

    /// Whether the entry is older than `ttl` at `now`.
    pub fn is_expired(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) > ttl
    }
}

/// Process-wide soundtrack cache.
///
/// Shared through an `Arc`; the lock is only held for map operations.
pub struct SoundtrackCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: TimeDelta,
}

impl SoundtrackCache {
    /// Create an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Time-to-live applied to every entry.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Get the tracks for `key` if a fresh entry exists.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<Track>> {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => Some(entry.tracks.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::debug!("Purged expired soundtrack cache entry {}", key);
                None
            }
            None => None,
        }
    }

    /// Store `tracks` for `key` with a fresh timestamp.
    pub fn put(&self, key: CacheKey, tracks: Vec<Track>) {
        self.insert_entry(key, CacheEntry::new(tracks));
    }

    /// Store a prepared entry, purging an expired one first.
    pub fn insert_entry(&self, key: CacheKey, entry: CacheEntry) {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        if entries
            .get(&key)
            .is_some_and(|existing| existing.is_expired(self.ttl, now))
        {
            entries.remove(&key);
        }
        entries.insert(key, entry);
    }

    /// Remove the entry for `key`. Returns whether one was present.
    pub fn purge(&self, key: &CacheKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl, now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Swept {} expired soundtrack cache entries", removed);
        }
        removed
    }

    /// Number of stored entries, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for SoundtrackCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
