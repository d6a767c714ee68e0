//! Playback controller
//!
//! Decides what plays next and drives the [`MediaEngine`] accordingly. The
//! controller owns the play queue, the active reference and the
//! shuffle/repeat modes; playlists are borrowed per call so the caller
//! decides which one a command applies to.
//!
//! The state reported by [`PlaybackController::state`] mirrors the engine
//! and only moves when engine events are processed, never as a side effect
//! of issuing a command.

use crate::commands::PlaybackCommand;
use crate::engine::{
    EngineEvent, EngineEventReceiver, EngineState, MediaBackend, MediaEngine, Volume,
};
use crate::error::PlaybackError;
use crate::events::{PlaybackEvent, SongInfo};
use crate::history::History;
use crate::playlists::Playlists;
use crate::queue::PlayQueue;
use crate::shuffle::ShufflePass;
use crate::track_ref::TrackRef;
use crate::types::{PlaybackConfig, PlaybackState, RepeatMode};
use beat_core::PlaylistId;
use std::time::Duration;

/// Playback state machine for one session
pub struct PlaybackController {
    engine: MediaEngine,
    engine_events: EngineEventReceiver,

    queue: PlayQueue,

    /// Tracks played before the active one, for shuffle-aware "previous"
    history: History,
    shuffle_pass: ShufflePass,

    /// Track playing, or last played
    active: Option<TrackRef>,

    state: PlaybackState,
    repeat: RepeatMode,
    shuffle: bool,

    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller driving `backend`
    ///
    /// `engine_events` must be the receiving end of the channel `backend`
    /// reports on.
    pub fn new(
        backend: Box<dyn MediaBackend>,
        engine_events: EngineEventReceiver,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            engine: MediaEngine::new(backend, Volume::new(config.volume)),
            engine_events,
            queue: PlayQueue::new(),
            history: History::new(config.history_size),
            shuffle_pass: ShufflePass::new(),
            active: None,
            state: PlaybackState::Stopped,
            repeat: config.repeat,
            shuffle: config.shuffle,
            pending_events: Vec::new(),
        }
    }

    /// Use a seeded shuffle so picks are reproducible
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_pass = ShufflePass::with_seed(seed);
        self
    }

    // ===== Transport =====

    /// Toggle or start playback
    ///
    /// Playing pauses and paused resumes. From stopped, the target is the
    /// queue head, then the active row of `current`, then its first row.
    /// Returns false when nothing could be started.
    ///
    /// A stop that was requested but not yet reported counts as stopped.
    pub fn play(&mut self, playlists: &mut Playlists, current: Option<PlaylistId>) -> bool {
        let state = if self.engine.state() == EngineState::Stopped {
            PlaybackState::Stopped
        } else {
            self.state
        };
        match state {
            PlaybackState::Playing => {
                self.pause();
                true
            }
            PlaybackState::Paused => match self.engine.unpause() {
                Ok(()) => true,
                Err(e) => {
                    self.report_error(&e);
                    false
                }
            },
            PlaybackState::Stopped => self.start_from_stopped(playlists, current),
        }
    }

    fn start_from_stopped(&mut self, playlists: &mut Playlists, current: Option<PlaylistId>) -> bool {
        if let Some(head) = self.take_queue_head(playlists) {
            return self.start(playlists, head, true);
        }

        let Some(id) = current else {
            tracing::debug!("No playlist given, nothing to play");
            return false;
        };
        let Some(playlist) = playlists.get_mut(id) else {
            tracing::warn!("Cannot play from unknown playlist {}", id);
            return false;
        };

        let target = playlist
            .active_ref()
            .or_else(|| playlist.get_first_and_select());
        match target {
            Some(target) => self.play_ref(playlists, target),
            None => {
                tracing::debug!("Playlist {} is empty", id);
                false
            }
        }
    }

    /// Play a specific row
    ///
    /// Consumes the first queue occurrence of `r`. An invalid reference or a
    /// missing file leaves playback stopped and returns false.
    pub fn play_ref(&mut self, playlists: &mut Playlists, r: TrackRef) -> bool {
        if self.queue.remove_first(&r) {
            self.emit_queue_changed();
        }
        self.start(playlists, r, true)
    }

    /// Pause; only acts while playing
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Err(e) = self.engine.pause() {
            self.report_error(&e);
        }
    }

    /// Stop, keeping the active reference
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Advance
    ///
    /// A queued track always wins. Otherwise, only while playing, moves to
    /// the next row of the active playlist (or a shuffle pick), wrapping
    /// under [`RepeatMode::Playlist`] and stopping at the end otherwise.
    pub fn play_next(&mut self, playlists: &mut Playlists) -> bool {
        if let Some(head) = self.take_queue_head(playlists) {
            return self.start(playlists, head, true);
        }
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.advance(playlists)
    }

    /// Step back, only while playing
    ///
    /// Ignores the queue and never wraps. Under shuffle, retraces history.
    pub fn play_prev(&mut self, playlists: &mut Playlists) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        match self.prev_target(playlists) {
            Some(target) => self.start(playlists, target, false),
            None => false,
        }
    }

    pub fn seek_to(&mut self, position: Duration) -> bool {
        match self.engine.seek_to(position) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Seek ignored: {}", e);
                false
            }
        }
    }

    /// Seek to a fraction (0.0 to 1.0) of the current track
    pub fn seek_percent(&mut self, fraction: f64) -> bool {
        match self.engine.seek_percent(fraction) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Seek ignored: {}", e);
                false
            }
        }
    }

    // ===== Queue =====

    /// Queue references to play next, in order
    pub fn enqueue(&mut self, refs: impl IntoIterator<Item = TrackRef>) {
        if self.queue.enqueue(refs) > 0 {
            self.emit_queue_changed();
        }
    }

    /// Remove every queued occurrence of `refs`
    pub fn dequeue(&mut self, refs: &[TrackRef]) {
        if self.queue.dequeue_remove(refs) > 0 {
            self.emit_queue_changed();
        }
    }

    /// Drop queue entries whose rows no longer exist
    pub fn prune_queue(&mut self, playlists: &Playlists) -> usize {
        let removed = self.queue.prune(|r| playlists.is_valid(r));
        if removed > 0 {
            self.emit_queue_changed();
        }
        removed
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    // ===== Modes =====

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        tracing::debug!("Repeat mode: {:?}", mode);
        self.repeat = mode;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Toggle shuffle; enabling it starts a fresh pass
    pub fn set_shuffle(&mut self, enabled: bool) {
        if enabled && !self.shuffle {
            self.shuffle_pass.start_new_pass();
            if let Some(active) = self.active {
                self.shuffle_pass.mark_played(&active);
            }
        }
        self.shuffle = enabled;
    }

    pub fn volume(&self) -> Volume {
        self.engine.volume()
    }

    pub fn set_volume(&mut self, level: u8) {
        self.engine.set_volume(level);
        self.emit_volume_changed();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.engine.set_muted(muted);
        self.emit_volume_changed();
    }

    // ===== Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Track playing or last played; may have gone stale
    pub fn active_ref(&self) -> Option<TrackRef> {
        self.active
    }

    /// `None` while stopped
    pub fn position(&self) -> Option<Duration> {
        self.engine.position()
    }

    /// `None` while stopped
    pub fn duration(&self) -> Option<Duration> {
        self.engine.duration()
    }

    pub fn engine(&self) -> &MediaEngine {
        &self.engine
    }

    /// Whether [`play_next`](Self::play_next) has somewhere to go
    pub fn has_next(&self, playlists: &Playlists) -> bool {
        if self.queue.iter().any(|r| playlists.is_valid(r)) {
            return true;
        }
        let Some((active, playlist)) = self.active_in(playlists) else {
            return false;
        };
        if self.repeat == RepeatMode::Playlist && !playlist.is_empty() {
            return true;
        }
        if self.shuffle {
            self.shuffle_pass.has_remaining(playlist, Some(active))
        } else {
            playlist.get_next_ref(&active).is_some()
        }
    }

    /// Whether [`play_prev`](Self::play_prev) has somewhere to go
    pub fn has_prev(&self, playlists: &Playlists) -> bool {
        let Some((active, playlist)) = self.active_in(playlists) else {
            return false;
        };
        if self.shuffle
            && self
                .history
                .any(|r| r.playlist() == active.playlist() && playlists.is_valid(r))
        {
            return true;
        }
        playlist.get_prev_ref(&active).is_some()
    }

    /// Snapshot of the active track
    pub fn song_info(&self, playlists: &Playlists) -> SongInfo {
        let mut info = SongInfo::empty(self.state);
        info.can_go_next = self.has_next(playlists);
        info.can_go_previous = self.has_prev(playlists);

        let Some((active, playlist)) = self.active_in(playlists) else {
            return info;
        };
        let Some(row) = playlist.row(&active) else {
            return info;
        };

        info.track = Some(active);
        info.row_index = playlist.position(&active);
        info.path = Some(row.path().to_path_buf());
        info.title = row.title().to_string();
        info.artist = row.artist().to_string();
        info.album = row.album().to_string();
        info.art_path = row.art_path().map(|p| p.to_path_buf());
        // The engine only knows the length of the file it has loaded
        let loaded = self.engine.location();
        info.length = row.duration().or_else(|| {
            if loaded.as_deref() == Some(row.path()) {
                self.engine.duration()
            } else {
                None
            }
        });
        info
    }

    // ===== Commands =====

    /// Apply a command from outside the control thread
    pub fn dispatch(
        &mut self,
        command: PlaybackCommand,
        playlists: &mut Playlists,
        current: Option<PlaylistId>,
    ) -> bool {
        tracing::trace!("Dispatching {:?}", command);
        match command {
            PlaybackCommand::Play => {
                self.state == PlaybackState::Playing || self.play(playlists, current)
            }
            PlaybackCommand::PlayPause => self.play(playlists, current),
            PlaybackCommand::Pause => {
                self.pause();
                true
            }
            PlaybackCommand::Stop => {
                self.stop();
                true
            }
            PlaybackCommand::Next => self.play_next(playlists),
            PlaybackCommand::Previous => self.play_prev(playlists),
            PlaybackCommand::PlayRef(r) => self.play_ref(playlists, r),
            PlaybackCommand::Enqueue(refs) => {
                self.enqueue(refs);
                true
            }
            PlaybackCommand::Dequeue(refs) => {
                self.dequeue(&refs);
                true
            }
            PlaybackCommand::SetRepeat(mode) => {
                self.set_repeat(mode);
                true
            }
            PlaybackCommand::SetShuffle(enabled) => {
                self.set_shuffle(enabled);
                true
            }
            PlaybackCommand::SetVolume(level) => {
                self.set_volume(level);
                true
            }
            PlaybackCommand::SetMuted(muted) => {
                self.set_muted(muted);
                true
            }
            PlaybackCommand::SeekPercent(fraction) => self.seek_percent(fraction),
        }
    }

    // ===== Engine events =====

    /// Handle every engine event received so far, in arrival order
    ///
    /// Returns the number handled. Events caused by handling (for example
    /// the next track starting after end of stream) are handled in the same
    /// call if the backend has already reported them.
    pub fn process_events(&mut self, playlists: &mut Playlists) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.engine_events.try_recv() {
            self.handle_engine_event(playlists, event);
            handled += 1;
        }
        handled
    }

    fn handle_engine_event(&mut self, playlists: &mut Playlists, event: EngineEvent) {
        self.engine.observe(&event);

        match event {
            EngineEvent::StateChanged { old, new } => {
                tracing::trace!("Engine state {:?} -> {:?}", old, new);
                self.set_state(PlaybackState::from(new));
            }
            EngineEvent::EndOfStream => {
                tracing::debug!("End of stream");
                self.handle_end_of_stream(playlists);
            }
            EngineEvent::StreamStarted { duration } => {
                tracing::trace!("Stream started, duration {:?}", duration);
            }
            EngineEvent::Tick { position } => {
                self.pending_events.push(PlaybackEvent::PositionChanged {
                    position,
                    duration: self.engine.duration(),
                });
            }
            EngineEvent::Error { message, .. } => {
                self.pending_events.push(PlaybackEvent::Error { message });
                self.set_state(PlaybackState::Stopped);
            }
        }
    }

    fn handle_end_of_stream(&mut self, playlists: &mut Playlists) {
        // Whatever plays next starts from a stopped pipeline, even the same file
        self.engine.stop();

        if self.repeat == RepeatMode::Song {
            if let Some(active) = self.active.filter(|r| playlists.is_valid(r)) {
                self.start(playlists, active, false);
                return;
            }
        }

        if let Some(head) = self.take_queue_head(playlists) {
            self.start(playlists, head, true);
            return;
        }
        self.advance(playlists);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Move past the active track in playlist order, or stop
    fn advance(&mut self, playlists: &mut Playlists) -> bool {
        match self.next_target(playlists) {
            Some(target) => self.start(playlists, target, true),
            None => {
                tracing::info!("Reached end of playlist, stopping");
                self.stop();
                false
            }
        }
    }

    fn next_target(&mut self, playlists: &mut Playlists) -> Option<TrackRef> {
        let active = self.active?;
        let playlist = playlists.get_mut(active.playlist())?;
        if !playlist.contains(&active) {
            tracing::debug!("Active track {} no longer exists", active);
            return None;
        }

        let next = if self.shuffle {
            self.shuffle_pass.pick_next(playlist, Some(active))
        } else {
            playlist.get_next_ref(&active)
        };
        if next.is_some() {
            return next;
        }

        if self.repeat != RepeatMode::Playlist {
            return None;
        }
        tracing::debug!("Wrapping playlist {}", playlist.id());
        if self.shuffle {
            self.shuffle_pass.start_new_pass();
            if let Some(pick) = self.shuffle_pass.pick_next(playlist, Some(active)) {
                return Some(pick);
            }
        }
        playlist.get_first_and_select()
    }

    fn prev_target(&mut self, playlists: &Playlists) -> Option<TrackRef> {
        let (active, playlist) = self.active_in(playlists)?;
        if self.shuffle {
            let from_history = self
                .history
                .pop_until(|r| r.playlist() == active.playlist() && playlists.is_valid(r));
            if from_history.is_some() {
                return from_history;
            }
        }
        playlist.get_prev_ref(&active)
    }

    /// Pop queue entries until a valid one turns up
    fn take_queue_head(&mut self, playlists: &Playlists) -> Option<TrackRef> {
        let mut popped = false;
        let mut found = None;
        while let Some(head) = self.queue.pop_next() {
            popped = true;
            if playlists.is_valid(&head) {
                found = Some(head);
                break;
            }
            tracing::debug!("Skipping stale queue entry {}", head);
        }
        if popped {
            self.emit_queue_changed();
        }
        found
    }

    /// Make `target` active and hand its file to the engine
    fn start(&mut self, playlists: &mut Playlists, target: TrackRef, record_history: bool) -> bool {
        let path = match playlists.resolve_path(&target) {
            Ok(path) => path.to_path_buf(),
            Err(e) => {
                tracing::debug!("Not playing: {}", e);
                self.engine.stop();
                return false;
            }
        };

        if let Some(playlist) = playlists.get_mut(target.playlist()) {
            playlist.set_active(&target);
        }

        let changed = self.active != Some(target);
        if changed {
            if let Some(previous) = self.active.filter(|_| record_history) {
                self.history.push(previous);
            }
            self.active = Some(target);
        }
        self.shuffle_pass.mark_played(&target);

        // Taken before the engine switches files
        let info = if changed {
            Some(self.song_info(playlists))
        } else {
            None
        };

        if changed && self.engine.location().as_deref() == Some(path.as_path()) {
            // Another row backed by the loaded file starts over
            self.engine.stop();
        }

        tracing::info!("Playing {:?}", path);
        let result = self.engine.play(&path);

        if let Some(mut info) = info {
            info.state = PlaybackState::from(self.engine.state());
            self.pending_events.push(PlaybackEvent::SongChanged(info));
        }

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to play {}: {}", target, e);
                self.report_error(&e);
                false
            }
        }
    }

    fn active_in<'a>(
        &self,
        playlists: &'a Playlists,
    ) -> Option<(TrackRef, &'a crate::playlist::Playlist)> {
        let active = self.active?;
        let playlist = playlists.get(active.playlist())?;
        playlist.contains(&active).then_some((active, playlist))
    }

    fn set_state(&mut self, new: PlaybackState) {
        if self.state == new {
            return;
        }
        let old = std::mem::replace(&mut self.state, new);
        tracing::debug!("Playback state {:?} -> {:?}", old, new);
        self.pending_events
            .push(PlaybackEvent::StateChanged { old, new });
    }

    fn report_error(&mut self, error: &PlaybackError) {
        self.pending_events.push(PlaybackEvent::Error {
            message: error.to_string(),
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_volume_changed(&mut self) {
        let volume = self.engine.volume();
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: volume.level(),
            muted: volume.is_muted(),
        });
    }
}
