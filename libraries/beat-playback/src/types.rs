//! Core types for playback management

use crate::engine::EngineState;
use serde::{Deserialize, Serialize};

/// Playback state as seen by collaborators
///
/// The engine's `Ready` state is folded into `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing playing
    Stopped,

    /// Paused mid-track
    Paused,

    /// Currently playing
    Playing,
}

impl From<EngineState> for PlaybackState {
    fn from(state: EngineState) -> Self {
        match state {
            EngineState::Playing => PlaybackState::Playing,
            EngineState::Paused => PlaybackState::Paused,
            EngineState::Ready | EngineState::Stopped => PlaybackState::Stopped,
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the end of the playlist
    #[default]
    None,

    /// Wrap from the last row back to the first
    Playlist,

    /// Restart the current track when it ends
    Song,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: None)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 80,
            shuffle: false,
            repeat: RepeatMode::None,
        }
    }
}
