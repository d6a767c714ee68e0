//! Play queue
//!
//! A FIFO of track references that takes precedence over playlist order
//! when choosing the next track. Entries are not validated on insert; stale
//! ones are skipped when they reach the front.

use crate::track_ref::TrackRef;
use std::collections::VecDeque;

/// Ordered list of tracks to play next
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// Front = next to play
    entries: VecDeque<TrackRef>,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append references at the back, in order
    ///
    /// Duplicates are allowed. Returns how many were added.
    pub fn enqueue(&mut self, refs: impl IntoIterator<Item = TrackRef>) -> usize {
        let before = self.entries.len();
        self.entries.extend(refs);
        self.entries.len() - before
    }

    /// Remove every occurrence of each of `refs`
    ///
    /// Returns the number of entries removed.
    pub fn dequeue_remove(&mut self, refs: &[TrackRef]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !refs.contains(entry));
        before - self.entries.len()
    }

    /// Remove the first occurrence of `r`; later duplicates stay
    pub fn remove_first(&mut self, r: &TrackRef) -> bool {
        match self.entries.iter().position(|entry| entry == r) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Head of the queue, without removing it
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Use [`front`](Self::front) when that
    /// is a possibility.
    pub fn peek_next(&self) -> TrackRef {
        assert!(!self.entries.is_empty(), "peek_next called on an empty play queue");
        self.entries[0]
    }

    /// Head of the queue, if any
    pub fn front(&self) -> Option<TrackRef> {
        self.entries.front().copied()
    }

    /// Remove and return the head
    pub fn pop_next(&mut self) -> Option<TrackRef> {
        self.entries.pop_front()
    }

    /// Keep only the entries `keep` accepts
    ///
    /// Returns the number removed.
    pub fn prune(&mut self, mut keep: impl FnMut(&TrackRef) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| keep(entry));
        before - self.entries.len()
    }

    pub fn contains(&self, r: &TrackRef) -> bool {
        self.entries.contains(r)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
