//! Stable handles to playlist rows

use beat_core::{PlaylistId, RowId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable reference to one row in one playlist
///
/// A reference names a row, not a position: it keeps resolving to the same
/// row across insertions, removals and reorders elsewhere in the playlist.
/// Once its row is deleted (or its playlist dropped) it is permanently
/// invalid, since row ids are never reused. Validity is answered by the
/// owning [`Playlist`](crate::Playlist) or [`Playlists`](crate::Playlists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackRef {
    playlist: PlaylistId,
    row: RowId,
}

impl TrackRef {
    pub fn new(playlist: PlaylistId, row: RowId) -> Self {
        Self { playlist, row }
    }

    /// Playlist this reference points into
    pub fn playlist(&self) -> PlaylistId {
        self.playlist
    }

    /// Row within that playlist
    pub fn row(&self) -> RowId {
        self.row
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.playlist, self.row)
    }
}
