//! Beat - Playback Orchestration
//!
//! Decides what plays next in the Beat audio player. This crate provides:
//! - Playlists with stable row references that survive edits
//! - A "play next" queue layered over playlist order
//! - Transport control (play/pause/stop/next/previous) with shuffle and repeat
//! - An adapter over an external media engine, driven by its events
//! - Player settings loaded from TOML and the environment
//!
//! # Architecture
//!
//! Audio decoding and output are not done here. The pipeline is plugged in
//! through the [`MediaBackend`] trait and reports back over a channel of
//! [`EngineEvent`]s. The [`PlaybackController`] reacts to those events on the
//! caller's thread via [`PlaybackController::process_events`], and reports
//! what happened as [`PlaybackEvent`]s from
//! [`PlaybackController::drain_events`].
//!
//! # Example: Playlists and references
//!
//! ```rust
//! use beat_core::TrackRow;
//! use beat_playback::{PlayQueue, Playlists};
//!
//! let mut playlists = Playlists::new();
//! let id = playlists.create("Evening");
//! let playlist = playlists.get_mut(id).unwrap();
//!
//! let refs = playlist.add_rows(
//!     vec![TrackRow::new("/music/a.flac"), TrackRow::new("/music/c.flac")],
//!     None,
//!     true,
//! );
//!
//! // Inserting before "c" does not disturb the existing references
//! playlist.add_rows(vec![TrackRow::new("/music/b.flac")], Some(refs[1]), false);
//! assert_eq!(playlist.position(&refs[1]), Some(2));
//!
//! let mut queue = PlayQueue::new();
//! queue.enqueue([refs[1]]);
//! assert_eq!(queue.peek_next(), refs[1]);
//! ```
//!
//! # Example: Plugging in a media engine
//!
//! ```rust,no_run
//! use beat_playback::{
//!     engine_channel, EngineEvent, EngineEventSender, EngineState, MediaBackend,
//!     PlaybackConfig, PlaybackController, Playlists, Result,
//! };
//! use std::path::{Path, PathBuf};
//! use std::time::Duration;
//!
//! struct MyBackend {
//!     events: EngineEventSender,
//!     location: Option<PathBuf>,
//!     state: EngineState,
//! }
//!
//! impl MediaBackend for MyBackend {
//!     fn set_location(&mut self, path: &Path) -> Result<()> {
//!         self.location = Some(path.to_path_buf());
//!         Ok(())
//!     }
//!     fn location(&self) -> Option<&Path> {
//!         self.location.as_deref()
//!     }
//!     fn set_state(&mut self, state: EngineState) -> Result<()> {
//!         let old = std::mem::replace(&mut self.state, state);
//!         let _ = self.events.send(EngineEvent::StateChanged { old, new: state });
//!         Ok(())
//!     }
//!     fn position(&self) -> Option<Duration> { None }
//!     fn duration(&self) -> Option<Duration> { None }
//!     fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     fn set_volume(&mut self, _gain: f32) {}
//! }
//!
//! let (tx, rx) = engine_channel();
//! let backend = MyBackend { events: tx, location: None, state: EngineState::Stopped };
//! let mut controller = PlaybackController::new(Box::new(backend), rx, PlaybackConfig::default());
//!
//! let mut playlists = Playlists::new();
//! let id = playlists.create("Default");
//!
//! controller.play(&mut playlists, Some(id));
//! controller.process_events(&mut playlists);
//! for event in controller.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod commands;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod playlist;
pub mod playlists;
pub mod queue;
pub mod settings;
pub mod shuffle;
pub mod track_ref;
pub mod types;

pub use commands::PlaybackCommand;
pub use controller::PlaybackController;
pub use engine::{
    engine_channel, EngineErrorKind, EngineEvent, EngineEventReceiver, EngineEventSender,
    EngineState, MediaBackend, MediaEngine, Volume,
};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, SongInfo};
pub use history::History;
pub use playlist::Playlist;
pub use playlists::Playlists;
pub use queue::PlayQueue;
pub use settings::PlayerSettings;
pub use shuffle::ShufflePass;
pub use track_ref::TrackRef;
pub use types::{PlaybackConfig, PlaybackState, RepeatMode};
