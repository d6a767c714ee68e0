//! Shuffle pass over a playlist
//!
//! Shuffle picks uniformly among the rows of the current playlist that have
//! not played yet in this pass, so every row plays once before any repeats.
//! Switching playlists starts a fresh pass.

use crate::playlist::Playlist;
use crate::track_ref::TrackRef;
use beat_core::{PlaylistId, RowId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Tracks which rows of one playlist have played in the current pass
#[derive(Debug, Clone)]
pub struct ShufflePass {
    playlist: Option<PlaylistId>,
    played: HashSet<RowId>,
    rng: StdRng,
}

impl ShufflePass {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic picks, for tests
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            playlist: None,
            played: HashSet::new(),
            rng,
        }
    }

    /// Forget everything played so far
    pub fn start_new_pass(&mut self) {
        self.played.clear();
    }

    /// Record that `track` started playing
    pub fn mark_played(&mut self, track: &TrackRef) {
        self.follow(track.playlist());
        self.played.insert(track.row());
    }

    pub fn is_played(&self, track: &TrackRef) -> bool {
        self.playlist == Some(track.playlist()) && self.played.contains(&track.row())
    }

    /// Pick a random unplayed row of `playlist`, never `current`
    ///
    /// Returns `None` once the pass is exhausted. Selects the pick as the
    /// playlist's active row.
    pub fn pick_next(
        &mut self,
        playlist: &mut Playlist,
        current: Option<TrackRef>,
    ) -> Option<TrackRef> {
        self.follow(playlist.id());
        let candidates = self.candidates(playlist, current);
        let pick = *candidates.choose(&mut self.rng)?;

        tracing::debug!(
            "Shuffle picked {} ({} candidates)",
            pick,
            candidates.len()
        );
        playlist.set_active(&pick);
        Some(pick)
    }

    /// Whether [`pick_next`](Self::pick_next) would find something
    pub fn has_remaining(&self, playlist: &Playlist, current: Option<TrackRef>) -> bool {
        if self.playlist != Some(playlist.id()) {
            return playlist.iter().any(|(r, _)| Some(r) != current);
        }
        !self.candidates(playlist, current).is_empty()
    }

    fn candidates(&self, playlist: &Playlist, current: Option<TrackRef>) -> Vec<TrackRef> {
        playlist
            .iter()
            .map(|(r, _)| r)
            .filter(|r| Some(*r) != current && !self.played.contains(&r.row()))
            .collect()
    }

    /// Reset when shuffling moves to another playlist
    fn follow(&mut self, playlist: PlaylistId) {
        if self.playlist != Some(playlist) {
            self.playlist = Some(playlist);
            self.played.clear();
        }
    }
}

impl Default for ShufflePass {
    fn default() -> Self {
        Self::new()
    }
}
