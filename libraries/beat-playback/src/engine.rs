//! Media engine adapter
//!
//! The decoding/output pipeline is a black box behind [`MediaBackend`]. It
//! accepts a location and a target state, answers position and duration
//! queries, and reports what actually happened as [`EngineEvent`]s on a
//! channel. [`MediaEngine`] wraps a backend with the transport operations
//! the controller needs.

use crate::error::{PlaybackError, Result};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pipeline state as the backend reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Stopped,
    /// Location set and prerolled, not yet running
    Ready,
    Paused,
    Playing,
}

/// Why the backend gave up on a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineErrorKind {
    /// No decoder for this format
    MissingPlugin,
    /// File unreadable or gone
    Resource,
    /// Stream is corrupt
    Decode,
    Other,
}

/// Notifications from the backend
///
/// Delivered asynchronously; the controller drains them on its own thread
/// and only then updates what it reports as the playback state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    StateChanged { old: EngineState, new: EngineState },

    /// Current stream played to its end
    EndOfStream,

    /// Stream started decoding; duration if the container declares one
    StreamStarted { duration: Option<Duration> },

    /// Periodic position report while playing
    Tick { position: Duration },

    Error {
        kind: EngineErrorKind,
        message: String,
    },
}

pub type EngineEventSender = Sender<EngineEvent>;
pub type EngineEventReceiver = Receiver<EngineEvent>;

/// Channel pair a backend reports on
pub fn engine_channel() -> (EngineEventSender, EngineEventReceiver) {
    crossbeam_channel::unbounded()
}

/// Decoding/output pipeline
///
/// Implementations hold an [`EngineEventSender`] and report every state
/// transition they complete on it.
pub trait MediaBackend: Send {
    /// Point the pipeline at a file; only valid while stopped
    fn set_location(&mut self, path: &Path) -> Result<()>;

    /// Currently loaded file
    fn location(&self) -> Option<&Path>;

    /// Request a state transition
    ///
    /// Success means the request was accepted, not that it has completed.
    fn set_state(&mut self, state: EngineState) -> Result<()>;

    /// Current playback position, if the pipeline can answer
    fn position(&self) -> Option<Duration>;

    /// Stream duration, if known
    fn duration(&self) -> Option<Duration>;

    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Linear output gain, 0.0 to 1.0
    fn set_volume(&mut self, gain: f32);
}

/// Output volume, 0-100 with mute
///
/// Maps the level onto -60 dB..0 dB so equal steps sound equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: u8,
    muted: bool,
}

impl Volume {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain for the backend; 0.0 when muted or at level 0
    pub fn gain(&self) -> f32 {
        if self.muted || self.level == 0 {
            return 0.0;
        }
        let db = (self.level as f32 - 100.0) * 0.6;
        10.0_f32.powf(db / 20.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}

/// Transport operations over a [`MediaBackend`]
///
/// Keeps a synchronous view of the state it last requested so that
/// commands issued back to back behave sensibly before the backend's
/// events arrive.
pub struct MediaEngine {
    backend: Box<dyn MediaBackend>,
    state: EngineState,
    duration: Option<Duration>,
    volume: Volume,
}

impl MediaEngine {
    pub fn new(mut backend: Box<dyn MediaBackend>, volume: Volume) -> Self {
        backend.set_volume(volume.gain());
        Self {
            backend,
            state: EngineState::Stopped,
            duration: None,
            volume,
        }
    }

    /// Last requested (or reported) state
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn location(&self) -> Option<PathBuf> {
        self.backend.location().map(Path::to_path_buf)
    }

    /// Start playing `path`
    ///
    /// Reloads only when `path` differs from the current location, so
    /// replaying the loaded file just resumes it. Any failure leaves the
    /// pipeline stopped.
    pub fn play(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            self.force_stop();
            return Err(PlaybackError::FileMissing(path.to_path_buf()));
        }

        if self.backend.location() != Some(path) {
            tracing::debug!("Loading {:?}", path);
            self.request(EngineState::Stopped)?;
            if let Err(e) = self.backend.set_location(path) {
                self.force_stop();
                return Err(e);
            }
            self.duration = None;
        }

        self.request(EngineState::Playing)
    }

    /// Pause if playing
    pub fn pause(&mut self) -> Result<()> {
        if self.state != EngineState::Playing {
            return Ok(());
        }
        self.request(EngineState::Paused)
    }

    /// Resume if paused
    pub fn unpause(&mut self) -> Result<()> {
        if self.state != EngineState::Paused {
            return Ok(());
        }
        self.request(EngineState::Playing)
    }

    /// Stop; the location stays loaded
    pub fn stop(&mut self) {
        if let Err(e) = self.request(EngineState::Stopped) {
            tracing::warn!("Backend refused to stop: {}", e);
        }
    }

    /// Position in the current stream; `None` while stopped
    pub fn position(&self) -> Option<Duration> {
        if self.state == EngineState::Stopped {
            return None;
        }
        self.backend.position()
    }

    /// Duration of the current stream; `None` while stopped
    pub fn duration(&self) -> Option<Duration> {
        if self.state == EngineState::Stopped {
            return None;
        }
        self.duration.or_else(|| self.backend.duration())
    }

    /// Seek within the current stream
    ///
    /// Positions past the end are clamped to the duration when it is known.
    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        if self.state == EngineState::Stopped {
            return Err(PlaybackError::Engine("cannot seek while stopped".to_string()));
        }
        let target = match self.duration() {
            Some(duration) => position.min(duration),
            None => position,
        };
        self.backend.seek(target)
    }

    /// Seek to a fraction (0.0 to 1.0) of the stream
    pub fn seek_percent(&mut self, fraction: f64) -> Result<()> {
        let duration = self
            .duration()
            .ok_or_else(|| PlaybackError::Engine("duration unknown".to_string()))?;
        self.seek_to(duration.mul_f64(fraction.clamp(0.0, 1.0)))
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn set_volume(&mut self, level: u8) {
        self.volume.level = level.min(100);
        self.push_volume();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.volume.muted = muted;
        self.push_volume();
    }

    /// Fold a backend event into the cached view
    pub fn observe(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::StateChanged { new, .. } => self.state = *new,
            EngineEvent::StreamStarted { duration } => self.duration = *duration,
            EngineEvent::Error { kind, message } => {
                tracing::error!("Engine error ({:?}): {}", kind, message);
                self.force_stop();
            }
            EngineEvent::EndOfStream | EngineEvent::Tick { .. } => {}
        }
    }

    fn request(&mut self, state: EngineState) -> Result<()> {
        match self.backend.set_state(state) {
            Ok(()) => {
                self.state = state;
                Ok(())
            }
            Err(e) => {
                self.force_stop();
                Err(e)
            }
        }
    }

    fn force_stop(&mut self) {
        if let Err(e) = self.backend.set_state(EngineState::Stopped) {
            tracing::error!("Failed to force backend to stop: {}", e);
        }
        self.state = EngineState::Stopped;
    }

    fn push_volume(&mut self) {
        self.backend.set_volume(self.volume.gain());
    }
}

/// Backend that accepts every request and records nothing
#[cfg(test)]
pub(crate) struct NullBackend {
    location: Option<PathBuf>,
    pub(crate) fail_playing: bool,
}

#[cfg(test)]
impl NullBackend {
    pub(crate) fn new() -> Self {
        Self {
            location: None,
            fail_playing: false,
        }
    }
}

#[cfg(test)]
impl MediaBackend for NullBackend {
    fn set_location(&mut self, path: &Path) -> Result<()> {
        self.location = Some(path.to_path_buf());
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn set_state(&mut self, state: EngineState) -> Result<()> {
        if self.fail_playing && state == EngineState::Playing {
            return Err(PlaybackError::Engine("no decoder".to_string()));
        }
        Ok(())
    }

    fn position(&self) -> Option<Duration> {
        Some(Duration::from_secs(1))
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(100))
    }

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _gain: f32) {}
}
