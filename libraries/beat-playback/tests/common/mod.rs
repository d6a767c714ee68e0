//! Shared test harness: a scripted media backend and a session wrapper
#![allow(dead_code)]

use beat_core::{PlaylistId, TrackMetadata, TrackRow};
use beat_playback::{
    engine_channel, EngineEvent, EngineEventSender, EngineState, MediaBackend, PlaybackConfig,
    PlaybackController, PlaybackError, PlaybackEvent, Playlists, TrackRef,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const TRACK_LENGTH: Duration = Duration::from_secs(180);

/// What the mock backend has been asked to do
#[derive(Debug, Default)]
pub struct MockLog {
    pub loads: Vec<PathBuf>,
    pub requests: Vec<EngineState>,
    pub position: Duration,
    pub gain: f32,
    pub seeks: Vec<Duration>,
    pub refuse_playing: bool,
}

/// Backend that completes every transition immediately
///
/// Each accepted state change is reported on the event channel right away,
/// as a real pipeline would report it a little later.
pub struct MockBackend {
    events: EngineEventSender,
    location: Option<PathBuf>,
    state: EngineState,
    log: Arc<Mutex<MockLog>>,
}

impl MockBackend {
    pub fn new(events: EngineEventSender) -> (Self, Arc<Mutex<MockLog>>) {
        let log = Arc::new(Mutex::new(MockLog::default()));
        let backend = Self {
            events,
            location: None,
            state: EngineState::Stopped,
            log: Arc::clone(&log),
        };
        (backend, log)
    }
}

impl MediaBackend for MockBackend {
    fn set_location(&mut self, path: &Path) -> beat_playback::Result<()> {
        assert_eq!(
            self.state,
            EngineState::Stopped,
            "location changed while the pipeline was running"
        );
        self.location = Some(path.to_path_buf());
        self.log.lock().unwrap().loads.push(path.to_path_buf());
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn set_state(&mut self, state: EngineState) -> beat_playback::Result<()> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(state);
        if state == EngineState::Playing && log.refuse_playing {
            return Err(PlaybackError::Engine("no decoder for stream".to_string()));
        }
        if state == EngineState::Stopped {
            log.position = Duration::ZERO;
        }
        drop(log);

        let old = std::mem::replace(&mut self.state, state);
        if old != state {
            let _ = self.events.send(EngineEvent::StateChanged { old, new: state });
            if old == EngineState::Stopped && state == EngineState::Playing {
                let _ = self.events.send(EngineEvent::StreamStarted {
                    duration: Some(TRACK_LENGTH),
                });
            }
        }
        Ok(())
    }

    fn position(&self) -> Option<Duration> {
        Some(self.log.lock().unwrap().position)
    }

    fn duration(&self) -> Option<Duration> {
        Some(TRACK_LENGTH)
    }

    fn seek(&mut self, position: Duration) -> beat_playback::Result<()> {
        let mut log = self.log.lock().unwrap();
        log.position = position;
        log.seeks.push(position);
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        self.log.lock().unwrap().gain = gain;
    }
}

/// One playlist of real (empty) files wired to a controller
pub struct Session {
    pub controller: PlaybackController,
    pub playlists: Playlists,
    pub playlist: PlaylistId,
    pub refs: Vec<TrackRef>,
    pub engine: EngineEventSender,
    pub log: Arc<Mutex<MockLog>>,
    pub dir: TempDir,
}

impl Session {
    /// Playlist with one file per name; titles are the names
    pub fn new(names: &[&str]) -> Self {
        Self::with_config(names, PlaybackConfig::default())
    }

    pub fn with_config(names: &[&str], config: PlaybackConfig) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<TrackRow> = names.iter().map(|name| create_test_row(&dir, name)).collect();

        let mut playlists = Playlists::new();
        let playlist = playlists.create("Session");
        let refs = playlists
            .get_mut(playlist)
            .unwrap()
            .add_rows(rows, None, true);

        let (tx, rx) = engine_channel();
        let (backend, log) = MockBackend::new(tx.clone());
        let controller =
            PlaybackController::new(Box::new(backend), rx, config).with_shuffle_seed(42);

        Self {
            controller,
            playlists,
            playlist,
            refs,
            engine: tx,
            log,
            dir,
        }
    }

    /// Handle everything the backend has reported
    pub fn pump(&mut self) -> usize {
        self.controller.process_events(&mut self.playlists)
    }

    pub fn play(&mut self) -> bool {
        let started = self.controller.play(&mut self.playlists, Some(self.playlist));
        self.pump();
        started
    }

    pub fn play_ref(&mut self, index: usize) -> bool {
        let r = self.refs[index];
        let started = self.controller.play_ref(&mut self.playlists, r);
        self.pump();
        started
    }

    pub fn next(&mut self) -> bool {
        let moved = self.controller.play_next(&mut self.playlists);
        self.pump();
        moved
    }

    pub fn prev(&mut self) -> bool {
        let moved = self.controller.play_prev(&mut self.playlists);
        self.pump();
        moved
    }

    pub fn stop(&mut self) {
        self.controller.stop();
        self.pump();
    }

    /// Simulate the current stream running out
    pub fn end_of_stream(&mut self) {
        self.engine.send(EngineEvent::EndOfStream).unwrap();
        self.pump();
    }

    pub fn remove(&mut self, index: usize) {
        let r = self.refs[index];
        self.playlists
            .get_mut(self.playlist)
            .unwrap()
            .remove_refs(&[r]);
    }

    /// Index into `refs` of the active track
    pub fn active_index(&self) -> Option<usize> {
        let active = self.controller.active_ref()?;
        self.refs.iter().position(|r| *r == active)
    }

    pub fn song_changes(&mut self) -> Vec<String> {
        self.controller
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::SongChanged(info) => Some(info.title),
                _ => None,
            })
            .collect()
    }
}

/// Route controller logs to the test output (`RUST_LOG=beat_playback=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn create_test_row(dir: &TempDir, name: &str) -> TrackRow {
    let path = dir.path().join(format!("{}.mp3", name));
    std::fs::write(&path, b"").unwrap();
    TrackRow::with_metadata(
        path,
        TrackMetadata {
            title: Some(name.to_string()),
            artist: Some("Test Artist".to_string()),
            album: Some("Test Album".to_string()),
            duration_ms: Some(TRACK_LENGTH.as_millis() as u64),
            art_path: None,
        },
    )
}
