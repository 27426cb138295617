//! Resolution session - the player's view of one soundtrack lookup.
//!
//! Holds the track list as it grows and a cursor for the selected track.
//! A session belongs to whoever opened it; opening a new one replaces it.

use crate::soundtrack::{Subject, Track};

/// Playback state for one in-flight or finished soundtrack lookup
#[derive(Debug, Clone)]
pub struct ResolutionSession {
    subject: Subject,
    tracks: Vec<Track>,
    cursor: usize,
}

impl ResolutionSession {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            tracks: Vec::new(),
            cursor: 0,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the selected track.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply a cumulative update from the resolver.
    ///
    /// The list only grows: updates that are shorter than, or don't start
    /// with, the current list are ignored. Returns whether it was applied.
    pub fn apply_update(&mut self, update: &[Track]) -> bool {
        if update.len() < self.tracks.len() || !update.starts_with(&self.tracks) {
            tracing::debug!(
                "Ignoring non-monotonic soundtrack update ({} -> {} tracks)",
                self.tracks.len(),
                update.len()
            );
            return false;
        }
        self.tracks.extend_from_slice(&update[self.tracks.len()..]);
        true
    }

    /// The selected track, once at least one has resolved.
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.tracks.len()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Move to the next track. Stays put at the end of the list.
    pub fn next(&mut self) -> Option<&Track> {
        if !self.has_next() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Move to the previous track. Stays put at the start.
    pub fn previous(&mut self) -> Option<&Track> {
        if !self.has_previous() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Jump to `index` if it exists.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.cursor = index;
        self.current()
    }
}
