//! Playback events
//!
//! Queued by the controller as things happen and drained by whoever drives
//! it (window, remote-control bridge, tray). Payloads are plain data so they
//! can cross a thread or process boundary.

use crate::track_ref::TrackRef;
use crate::types::PlaybackState;
use beat_core::{format_duration, UNKNOWN_TAG};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Reported playback state moved
    StateChanged {
        old: PlaybackState,
        new: PlaybackState,
    },

    /// The active track changed
    SongChanged(SongInfo),

    /// Entries were added to or removed from the play queue
    QueueChanged { length: usize },

    /// Periodic position report
    PositionChanged {
        position: Duration,
        duration: Option<Duration>,
    },

    VolumeChanged { level: u8, muted: bool },

    /// Something the user should hear about (missing file, engine failure)
    Error { message: String },
}

/// Snapshot of the active track for display and remote control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub track: Option<TrackRef>,

    /// Index of the row in its playlist
    pub row_index: Option<usize>,

    pub path: Option<PathBuf>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub art_path: Option<PathBuf>,
    pub length: Option<Duration>,
    pub state: PlaybackState,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl SongInfo {
    /// Info for "nothing active"
    pub fn empty(state: PlaybackState) -> Self {
        Self {
            track: None,
            row_index: None,
            path: None,
            title: UNKNOWN_TAG.to_string(),
            artist: UNKNOWN_TAG.to_string(),
            album: UNKNOWN_TAG.to_string(),
            art_path: None,
            length: None,
            state,
            can_go_next: false,
            can_go_previous: false,
        }
    }

    /// Length as `m:ss`, empty when unknown
    pub fn length_str(&self) -> String {
        self.length.map(format_duration).unwrap_or_default()
    }
}
