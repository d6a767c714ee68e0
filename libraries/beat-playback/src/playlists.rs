//! Session-wide playlist store

use crate::error::{PlaybackError, Result};
use crate::playlist::Playlist;
use crate::track_ref::TrackRef;
use beat_core::{PlaylistId, TrackRow};
use std::path::Path;

/// All playlists open in a session, in tab order
///
/// References into a playlist become invalid once it is removed from here.
#[derive(Debug, Clone, Default)]
pub struct Playlists {
    playlists: Vec<Playlist>,
}

impl Playlists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty playlist and return its id
    pub fn create(&mut self, label: impl Into<String>) -> PlaylistId {
        self.insert(Playlist::new(label))
    }

    /// Add an existing playlist
    ///
    /// A playlist with the same id is replaced in place.
    pub fn insert(&mut self, playlist: Playlist) -> PlaylistId {
        let id = playlist.id();
        match self.playlists.iter_mut().find(|p| p.id() == id) {
            Some(existing) => *existing = playlist,
            None => self.playlists.push(playlist),
        }
        id
    }

    /// Drop a playlist, invalidating every reference into it
    pub fn remove(&mut self, id: PlaylistId) -> Option<Playlist> {
        let index = self.playlists.iter().position(|p| p.id() == id)?;
        Some(self.playlists.remove(index))
    }

    pub fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PlaylistId) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| p.id() == id)
    }

    /// Like [`get`](Self::get), but an unknown id is an error
    pub fn require(&self, id: PlaylistId) -> Result<&Playlist> {
        self.get(id).ok_or(PlaybackError::PlaylistNotFound(id))
    }

    pub fn require_mut(&mut self, id: PlaylistId) -> Result<&mut Playlist> {
        self.get_mut(id).ok_or(PlaybackError::PlaylistNotFound(id))
    }

    /// Rename a playlist; returns false if it does not exist
    pub fn rename(&mut self, id: PlaylistId, label: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(playlist) => {
                playlist.set_label(label);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> Vec<PlaylistId> {
        self.playlists.iter().map(Playlist::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.iter()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Whether `r` still points at an existing row
    pub fn is_valid(&self, r: &TrackRef) -> bool {
        self.get(r.playlist()).is_some_and(|p| p.contains(r))
    }

    pub fn row(&self, r: &TrackRef) -> Option<&TrackRow> {
        self.get(r.playlist()).and_then(|p| p.row(r))
    }

    /// Resolve `r` to its file path
    pub fn resolve_path(&self, r: &TrackRef) -> Result<&Path> {
        self.get(r.playlist())
            .ok_or(PlaybackError::TrackNotFound(*r))?
            .resolve_path(r)
    }
}
