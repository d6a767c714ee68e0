//! Playback commands
//!
//! Transport requests from outside the controller's thread (media keys,
//! remote control, tray menu) as plain values, applied with
//! [`PlaybackController::dispatch`](crate::PlaybackController::dispatch).

use crate::track_ref::TrackRef;
use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackCommand {
    /// Start or resume; does nothing while already playing
    Play,
    /// Toggle between playing and paused
    PlayPause,
    Pause,
    Stop,
    Next,
    Previous,
    /// Jump to a specific row
    PlayRef(TrackRef),
    Enqueue(Vec<TrackRef>),
    Dequeue(Vec<TrackRef>),
    SetRepeat(RepeatMode),
    SetShuffle(bool),
    /// Volume level 0-100
    SetVolume(u8),
    SetMuted(bool),
    /// Seek to a fraction (0.0 to 1.0) of the current track
    SeekPercent(f64),
}
