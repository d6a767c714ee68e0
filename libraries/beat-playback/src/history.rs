//! Playback history
//!
//! Bounded record of tracks that were playing before the current one, used
//! to step backwards while shuffling.

use crate::track_ref::TrackRef;
use std::collections::VecDeque;

/// Playback history with bounded size
///
/// Oldest entries are discarded once `max_size` is reached.
#[derive(Debug, Clone)]
pub struct History {
    /// Most recent = back
    tracks: VecDeque<TrackRef>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a track; consecutive duplicates are collapsed
    pub fn push(&mut self, track: TrackRef) {
        if self.max_size == 0 || self.tracks.back() == Some(&track) {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
    }

    /// Pop entries until one satisfies `accept`
    ///
    /// Rejected entries are discarded along the way.
    pub fn pop_until(&mut self, mut accept: impl FnMut(&TrackRef) -> bool) -> Option<TrackRef> {
        while let Some(track) = self.tracks.pop_back() {
            if accept(&track) {
                return Some(track);
            }
        }
        None
    }

    /// Whether any entry satisfies `accept`
    pub fn any(&self, accept: impl FnMut(&TrackRef) -> bool) -> bool {
        self.tracks.iter().any(accept)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
