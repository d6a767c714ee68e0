//! Error types for playback management

use crate::track_ref::TrackRef;
use beat_core::PlaylistId;
use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Reference does not resolve to a row (deleted, or never existed)
    #[error("Track not found: {0}")]
    TrackNotFound(TrackRef),

    /// No playlist with this id in the session
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// The row's file is gone from disk
    #[error("File missing: {0:?}")]
    FileMissing(PathBuf),

    /// Media engine refused a command (missing codec, unreadable stream, ...)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Settings could not be loaded or stored
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
