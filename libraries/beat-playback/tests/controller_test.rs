//! Playback controller scenarios
//!
//! Drives a controller against the scripted backend in `common` and checks
//! transport, queue and navigation behaviour end to end.

mod common;

use beat_playback::{
    EngineErrorKind, EngineEvent, EngineState, PlaybackCommand, PlaybackConfig, PlaybackEvent,
    PlaybackState, RepeatMode,
};
use common::{create_test_row, Session, TRACK_LENGTH};
use std::collections::HashSet;
use std::time::Duration;

// ===== Transport =====

#[test]
fn test_play_toggles_once_loaded() {
    let mut session = Session::new(&["A", "B", "C"]);

    // Two calls before the engine reports back both resolve a target
    session
        .controller
        .play(&mut session.playlists, Some(session.playlist));
    session
        .controller
        .play(&mut session.playlists, Some(session.playlist));
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    session.play();
    assert_eq!(session.controller.state(), PlaybackState::Paused);

    session.play();
    assert_eq!(session.controller.state(), PlaybackState::Playing);
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.log.lock().unwrap().loads.len(), 1);
}

#[test]
fn test_state_only_moves_on_engine_events() {
    let mut session = Session::new(&["A"]);

    session
        .controller
        .play(&mut session.playlists, Some(session.playlist));
    assert_eq!(session.controller.state(), PlaybackState::Stopped);

    assert!(session.pump() > 0);
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    let events = session.controller.drain_events();
    assert!(events.contains(&PlaybackEvent::StateChanged {
        old: PlaybackState::Stopped,
        new: PlaybackState::Playing,
    }));
}

#[test]
fn test_concrete_scenario_queue_wins_ties() {
    let mut session = Session::new(&["A", "B", "C"]);

    assert!(session.play());
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    assert!(session.next());
    assert_eq!(session.active_index(), Some(1));

    let c = session.refs[2];
    session.controller.enqueue([c]);
    assert!(session.next());
    assert_eq!(session.active_index(), Some(2));
    assert!(session.controller.queue().is_empty());
}

#[test]
fn test_pause_only_from_playing() {
    let mut session = Session::new(&["A"]);

    session.controller.pause();
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert!(session.log.lock().unwrap().requests.is_empty());

    session.play();
    session.controller.pause();
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Paused);
}

#[test]
fn test_stop_keeps_track_context() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(1);

    session.stop();
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert_eq!(session.active_index(), Some(1));
    assert_eq!(session.controller.position(), None);

    session.play();
    assert_eq!(session.controller.state(), PlaybackState::Playing);
    assert_eq!(session.active_index(), Some(1));
}

#[test]
fn test_play_after_unreported_stop_starts_again() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(1);

    // The backend has not reported the stop yet
    session.controller.stop();
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    assert!(session
        .controller
        .play(&mut session.playlists, Some(session.playlist)));
    session.pump();

    assert_eq!(session.controller.state(), PlaybackState::Playing);
    assert_eq!(session.active_index(), Some(1));
    assert_eq!(
        session.log.lock().unwrap().requests.last(),
        Some(&EngineState::Playing)
    );
}

#[test]
fn test_switching_tracks_reloads_through_stopped() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);
    session.log.lock().unwrap().requests.clear();

    session.play_ref(1);

    let log = session.log.lock().unwrap();
    assert_eq!(
        log.requests,
        vec![EngineState::Stopped, EngineState::Playing]
    );
    assert_eq!(log.loads.len(), 2);
    assert!(log.loads[1].ends_with("B.mp3"));
}

#[test]
fn test_play_ref_removes_first_queue_occurrence() {
    let mut session = Session::new(&["A", "B"]);
    let b = session.refs[1];
    session.controller.enqueue([b, b]);

    session.play_ref(1);
    assert_eq!(session.controller.queue().len(), 1);
    assert_eq!(session.controller.queue().front(), Some(b));
}

// ===== Next / previous =====

#[test]
fn test_queue_precedence_regardless_of_state_or_repeat() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.controller.set_repeat(RepeatMode::Song);

    // Stopped: sequential next would do nothing, the queue still plays
    let c = session.refs[2];
    session.controller.enqueue([c]);
    assert!(session.next());
    assert_eq!(session.active_index(), Some(2));
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    session.controller.pause();
    session.pump();
    let a = session.refs[0];
    session.controller.enqueue([a]);
    assert!(session.next());
    assert_eq!(session.active_index(), Some(0));
}

#[test]
fn test_next_without_queue_requires_playing() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);
    session.stop();

    assert!(!session.next());
    assert_eq!(session.active_index(), Some(0));
}

#[test]
fn test_end_of_playlist_without_repeat_stops() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(2);

    assert!(!session.next());
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert_eq!(session.active_index(), Some(2));
}

#[test]
fn test_repeat_playlist_wraps_forward() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.controller.set_repeat(RepeatMode::Playlist);
    session.play_ref(2);

    assert!(session.next());
    assert_eq!(session.active_index(), Some(0));
    let playlist = session.playlists.get(session.playlist).unwrap();
    assert_eq!(playlist.active_ref(), Some(session.refs[0]));
}

#[test]
fn test_prev_walks_back_without_wrapping() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.controller.set_repeat(RepeatMode::Playlist);
    session.play_ref(1);

    assert!(session.prev());
    assert_eq!(session.active_index(), Some(0));

    assert!(!session.prev());
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.state(), PlaybackState::Playing);
}

#[test]
fn test_prev_ignores_queue_and_paused_state() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(1);
    let c = session.refs[2];
    session.controller.enqueue([c]);

    assert!(session.prev());
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.queue().len(), 1);

    session.play();
    assert_eq!(session.controller.state(), PlaybackState::Paused);
    assert!(!session.prev());
}

#[test]
fn test_stale_queue_heads_are_skipped() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(0);
    let (b, c) = (session.refs[1], session.refs[2]);
    session.controller.enqueue([b, b, c]);
    session.remove(1);

    assert!(session.next());
    assert_eq!(session.active_index(), Some(2));
    assert!(session.controller.queue().is_empty());
}

#[test]
fn test_queue_of_only_stale_entries_falls_back_to_playlist() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(0);
    let c = session.refs[2];
    session.controller.enqueue([c]);
    session.remove(2);

    assert!(session.next());
    assert_eq!(session.active_index(), Some(1));
}

#[test]
fn test_prune_queue_drops_deleted_rows() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.controller.enqueue(session.refs.clone());
    session.remove(0);
    session.remove(2);

    assert_eq!(session.controller.prune_queue(&session.playlists), 2);
    assert_eq!(session.controller.queue().front(), Some(session.refs[1]));
    assert_eq!(session.controller.prune_queue(&session.playlists), 0);
}

#[test]
fn test_has_next_and_prev() {
    let mut session = Session::new(&["A", "B"]);
    assert!(!session.controller.has_next(&session.playlists));

    session.play_ref(0);
    assert!(session.controller.has_next(&session.playlists));
    assert!(!session.controller.has_prev(&session.playlists));

    session.play_ref(1);
    assert!(!session.controller.has_next(&session.playlists));
    assert!(session.controller.has_prev(&session.playlists));

    session.controller.enqueue([session.refs[0]]);
    assert!(session.controller.has_next(&session.playlists));

    session.controller.dequeue(&[session.refs[0]]);
    session.controller.set_repeat(RepeatMode::Playlist);
    assert!(session.controller.has_next(&session.playlists));
}

// ===== End of stream =====

#[test]
fn test_end_of_stream_advances() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);

    session.end_of_stream();
    assert_eq!(session.active_index(), Some(1));
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    session.end_of_stream();
    assert_eq!(session.active_index(), Some(1));
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
}

#[test]
fn test_repeat_song_restarts_same_track() {
    let mut session = Session::new(&["A", "B"]);
    session.controller.set_repeat(RepeatMode::Song);
    session.play_ref(0);
    session.log.lock().unwrap().position = Duration::from_secs(179);
    session.controller.drain_events();

    session.end_of_stream();

    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.state(), PlaybackState::Playing);
    assert_eq!(session.controller.position(), Some(Duration::ZERO));
    let log = session.log.lock().unwrap();
    assert_eq!(log.loads.len(), 1);
    assert_eq!(
        &log.requests[log.requests.len() - 2..],
        &[EngineState::Stopped, EngineState::Playing]
    );
    drop(log);
    assert!(session.song_changes().is_empty());
}

#[test]
fn test_end_of_stream_consumes_queue() {
    let mut session = Session::new(&["A", "B", "C"]);
    session.play_ref(0);
    let c = session.refs[2];
    session.controller.enqueue([c]);

    session.end_of_stream();
    assert_eq!(session.active_index(), Some(2));
}

#[test]
fn test_repeat_playlist_single_row_restarts_at_end_of_stream() {
    let mut session = Session::new(&["A"]);
    session.controller.set_repeat(RepeatMode::Playlist);
    session.play_ref(0);
    session.log.lock().unwrap().position = Duration::from_secs(179);
    session.log.lock().unwrap().requests.clear();

    session.end_of_stream();

    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.state(), PlaybackState::Playing);
    assert_eq!(session.controller.position(), Some(Duration::ZERO));
    let log = session.log.lock().unwrap();
    assert_eq!(log.loads.len(), 1);
    assert_eq!(
        &log.requests[log.requests.len() - 2..],
        &[EngineState::Stopped, EngineState::Playing]
    );
}

#[test]
fn test_rows_sharing_a_file_each_play_from_the_start() {
    let mut session = Session::new(&["A"]);
    let again = create_test_row(&session.dir, "A");
    let again = session
        .playlists
        .get_mut(session.playlist)
        .unwrap()
        .add_rows(vec![again], None, true)[0];

    session.play_ref(0);
    session.log.lock().unwrap().position = Duration::from_secs(179);
    session.end_of_stream();

    assert_eq!(session.controller.active_ref(), Some(again));
    assert_eq!(session.controller.position(), Some(Duration::ZERO));

    // Stepping back by hand restarts the shared file too
    session.log.lock().unwrap().position = Duration::from_secs(90);
    session.log.lock().unwrap().requests.clear();
    assert!(session.prev());

    assert_eq!(session.active_index(), Some(0));
    assert_eq!(session.controller.position(), Some(Duration::ZERO));
    let log = session.log.lock().unwrap();
    assert_eq!(log.requests, vec![EngineState::Stopped, EngineState::Playing]);
    assert_eq!(log.loads.len(), 1);
}

// ===== Failures =====

#[test]
fn test_missing_file_falls_back_to_stopped() {
    let mut session = Session::new(&["A"]);
    let gone = session.dir.path().join("gone.mp3");
    let r = session
        .playlists
        .get_mut(session.playlist)
        .unwrap()
        .add_rows(vec![beat_core::TrackRow::new(&gone)], None, true)[0];

    assert!(!session.controller.play_ref(&mut session.playlists, r));
    session.pump();

    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    let events = session.controller.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { message } if message.contains("gone.mp3"))));
}

#[test]
fn test_refused_stream_reports_error() {
    let mut session = Session::new(&["A"]);
    session.log.lock().unwrap().refuse_playing = true;

    assert!(!session.play());
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert!(session
        .controller
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));
}

#[test]
fn test_engine_error_event_stops_playback() {
    let mut session = Session::new(&["A"]);
    session.play_ref(0);
    session.controller.drain_events();

    session
        .engine
        .send(EngineEvent::Error {
            kind: EngineErrorKind::MissingPlugin,
            message: "missing decoder".to_string(),
        })
        .unwrap();
    session.pump();

    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    let events = session.controller.drain_events();
    assert!(events.contains(&PlaybackEvent::Error {
        message: "missing decoder".to_string()
    }));
}

#[test]
fn test_invalid_ref_is_not_fatal() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);
    session.remove(1);

    assert!(!session.play_ref(1));
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert_eq!(session.active_index(), Some(0));
}

#[test]
fn test_navigation_on_empty_playlist_does_nothing() {
    let mut session = Session::new(&[]);
    assert!(!session.play());
    assert!(!session.next());
    assert!(!session.prev());
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
}

// ===== Shuffle =====

#[test]
fn test_shuffle_plays_each_row_once_per_pass() {
    let names = ["A", "B", "C", "D", "E", "F"];
    let mut session = Session::new(&names);
    session.controller.set_shuffle(true);
    session.play();

    let mut seen = HashSet::new();
    seen.insert(session.active_index().unwrap());
    for _ in 1..names.len() {
        assert!(session.next());
        assert!(seen.insert(session.active_index().unwrap()));
    }
    assert_eq!(seen.len(), names.len());
    assert!(!session.controller.has_next(&session.playlists));

    assert!(!session.next());
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
}

#[test]
fn test_shuffle_with_repeat_starts_new_pass() {
    let mut session = Session::with_config(
        &["A", "B", "C"],
        PlaybackConfig {
            shuffle: true,
            repeat: RepeatMode::Playlist,
            ..PlaybackConfig::default()
        },
    );
    session.play();

    for _ in 0..9 {
        let before = session.active_index();
        assert!(session.next());
        assert_ne!(session.active_index(), before);
    }
}

#[test]
fn test_shuffle_prev_retraces_history() {
    let mut session = Session::new(&["A", "B", "C", "D", "E"]);
    session.controller.set_shuffle(true);
    session.play();

    let mut order = vec![session.active_index().unwrap()];
    for _ in 0..3 {
        session.next();
        order.push(session.active_index().unwrap());
    }

    for expected in order.iter().rev().skip(1) {
        assert!(session.prev());
        assert_eq!(session.active_index(), Some(*expected));
    }
}

// ===== Events and commands =====

#[test]
fn test_song_changed_carries_display_info() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);

    let info = session
        .controller
        .drain_events()
        .into_iter()
        .find_map(|event| match event {
            PlaybackEvent::SongChanged(info) => Some(info),
            _ => None,
        })
        .unwrap();

    assert_eq!(info.title, "A");
    assert_eq!(info.artist, "Test Artist");
    assert_eq!(info.album, "Test Album");
    assert_eq!(info.length, Some(TRACK_LENGTH));
    assert_eq!(info.length_str(), "3:00");
    assert!(info.can_go_next);
    assert!(!info.can_go_previous);
}

#[test]
fn test_song_changed_only_when_track_changes() {
    let mut session = Session::new(&["A", "B"]);
    session.play_ref(0);
    session.play();
    session.play();
    session.next();

    assert_eq!(session.song_changes(), vec!["A", "B"]);
}

#[test]
fn test_song_changed_for_untagged_row_has_no_stale_length() {
    let mut session = Session::new(&["A"]);
    let path = session.dir.path().join("untagged.mp3");
    std::fs::write(&path, b"").unwrap();
    let untagged = session
        .playlists
        .get_mut(session.playlist)
        .unwrap()
        .add_rows(vec![beat_core::TrackRow::new(&path)], None, true)[0];

    session.play_ref(0);
    session
        .engine
        .send(EngineEvent::StreamStarted {
            duration: Some(Duration::from_secs(999)),
        })
        .unwrap();
    session.pump();
    session.controller.drain_events();

    assert!(session
        .controller
        .play_ref(&mut session.playlists, untagged));
    let info = session
        .controller
        .drain_events()
        .into_iter()
        .find_map(|event| match event {
            PlaybackEvent::SongChanged(info) => Some(info),
            _ => None,
        })
        .unwrap();

    assert_eq!(info.track, Some(untagged));
    assert_eq!(info.length, None);
    assert_eq!(info.state, PlaybackState::Playing);
}

#[test]
fn test_queue_changes_are_announced() {
    let mut session = Session::new(&["A", "B"]);
    session.controller.enqueue(session.refs.clone());
    session.controller.dequeue(&[session.refs[0]]);

    let lengths: Vec<usize> = session
        .controller
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            PlaybackEvent::QueueChanged { length } => Some(length),
            _ => None,
        })
        .collect();
    assert_eq!(lengths, vec![2, 1]);
}

#[test]
fn test_ticks_become_position_events() {
    let mut session = Session::new(&["A"]);
    session.play_ref(0);
    session.controller.drain_events();

    session
        .engine
        .send(EngineEvent::Tick {
            position: Duration::from_secs(12),
        })
        .unwrap();
    session.pump();

    assert_eq!(
        session.controller.drain_events(),
        vec![PlaybackEvent::PositionChanged {
            position: Duration::from_secs(12),
            duration: Some(TRACK_LENGTH),
        }]
    );
}

#[test]
fn test_dispatch_commands() {
    let mut session = Session::new(&["A", "B", "C"]);
    let id = session.playlist;

    assert!(session
        .controller
        .dispatch(PlaybackCommand::Play, &mut session.playlists, Some(id)));
    session.pump();
    // Play while playing is not a toggle
    session
        .controller
        .dispatch(PlaybackCommand::Play, &mut session.playlists, Some(id));
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Playing);

    session
        .controller
        .dispatch(PlaybackCommand::Next, &mut session.playlists, Some(id));
    session.pump();
    assert_eq!(session.active_index(), Some(1));

    session
        .controller
        .dispatch(PlaybackCommand::PlayPause, &mut session.playlists, Some(id));
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Paused);

    session.controller.dispatch(
        PlaybackCommand::SetRepeat(RepeatMode::Playlist),
        &mut session.playlists,
        Some(id),
    );
    session.controller.dispatch(
        PlaybackCommand::SetVolume(50),
        &mut session.playlists,
        Some(id),
    );
    assert_eq!(session.controller.repeat(), RepeatMode::Playlist);
    assert_eq!(session.controller.volume().level(), 50);
    assert!(session.log.lock().unwrap().gain > 0.0);

    assert!(session.controller.dispatch(
        PlaybackCommand::SeekPercent(0.5),
        &mut session.playlists,
        Some(id),
    ));
    assert_eq!(
        session.log.lock().unwrap().seeks,
        vec![Duration::from_secs(90)]
    );

    session
        .controller
        .dispatch(PlaybackCommand::Stop, &mut session.playlists, Some(id));
    session.pump();
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
    assert!(!session.controller.dispatch(
        PlaybackCommand::SeekPercent(0.5),
        &mut session.playlists,
        Some(id),
    ));
}

#[test]
fn test_second_playlist_rows_are_independent() {
    let mut session = Session::new(&["A", "B"]);
    let other = session.playlists.create("Other");
    let row = create_test_row(&session.dir, "X");
    let x = session
        .playlists
        .get_mut(other)
        .unwrap()
        .add_rows(vec![row], None, true)[0];

    session.play_ref(0);
    assert!(session.controller.play_ref(&mut session.playlists, x));
    session.pump();

    assert_eq!(session.controller.active_ref(), Some(x));
    // The first playlist remembers where it was
    let first = session.playlists.get(session.playlist).unwrap();
    assert_eq!(first.active_ref(), Some(session.refs[0]));

    // Nothing after X in its own playlist
    assert!(!session.next());
    assert_eq!(session.controller.state(), PlaybackState::Stopped);
}
