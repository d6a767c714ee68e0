//! Playlists with stable row references
//!
//! A [`Playlist`] is an ordered list of [`TrackRow`]s. Every row gets a
//! [`RowId`] when it is inserted, and handles to rows ([`TrackRef`]) carry
//! that id rather than a position, so they survive edits to the rest of the
//! list.

use crate::error::{PlaybackError, Result};
use crate::track_ref::TrackRef;
use beat_core::{MetadataReader, PlaylistId, RowId, TrackRow};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone)]
struct Entry {
    id: RowId,
    track: TrackRow,
}

/// Ordered, editable list of tracks
#[derive(Debug, Clone)]
pub struct Playlist {
    id: PlaylistId,
    label: String,
    rows: Vec<Entry>,

    /// Row currently designated as playing (or last played)
    active: Option<RowId>,

    /// Next id to hand out; never decreases
    next_row: RowId,

    /// False once modified after load or save
    saved: bool,
}

impl Playlist {
    /// Create an empty, unsaved playlist with a fresh id
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(PlaylistId::generate(), label)
    }

    /// Create an empty, unsaved playlist with a known id
    pub fn with_id(id: PlaylistId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            rows: Vec::new(),
            active: None,
            next_row: RowId::new(0),
            saved: false,
        }
    }

    /// Rebuild a playlist from persisted rows
    ///
    /// The result counts as saved.
    pub fn from_rows(id: PlaylistId, label: impl Into<String>, rows: Vec<TrackRow>) -> Self {
        let mut playlist = Self::with_id(id, label);
        playlist.add_rows(rows, None, true);
        playlist.saved = true;
        playlist
    }

    pub fn id(&self) -> PlaylistId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.saved = false;
    }

    /// Whether the playlist matches what was last loaded or saved
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = true;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `r` points at a row that currently exists in this playlist
    pub fn contains(&self, r: &TrackRef) -> bool {
        self.position(r).is_some()
    }

    /// Current index of the row `r` points at
    pub fn position(&self, r: &TrackRef) -> Option<usize> {
        if r.playlist() != self.id {
            return None;
        }
        self.index_of(r.row())
    }

    /// Row behind `r`
    pub fn row(&self, r: &TrackRef) -> Option<&TrackRow> {
        self.position(r).map(|index| &self.rows[index].track)
    }

    /// Reference to the row at `index`
    pub fn ref_at(&self, index: usize) -> Option<TrackRef> {
        self.rows.get(index).map(|entry| self.make_ref(entry.id))
    }

    /// References to every row, in order
    pub fn refs(&self) -> Vec<TrackRef> {
        self.rows.iter().map(|entry| self.make_ref(entry.id)).collect()
    }

    /// Rows with their references, in order
    pub fn iter(&self) -> impl Iterator<Item = (TrackRef, &TrackRow)> + '_ {
        self.rows
            .iter()
            .map(move |entry| (self.make_ref(entry.id), &entry.track))
    }

    /// Resolve `r` to its file path
    pub fn resolve_path(&self, r: &TrackRef) -> Result<&Path> {
        self.row(r)
            .map(TrackRow::path)
            .ok_or(PlaybackError::TrackNotFound(*r))
    }

    /// Insert `rows` next to `anchor`
    ///
    /// With no anchor the rows are appended. An anchor that belongs to
    /// another playlist or no longer resolves also appends. The batch keeps
    /// its order. Returns references to the new rows.
    pub fn add_rows(
        &mut self,
        rows: impl IntoIterator<Item = TrackRow>,
        anchor: Option<TrackRef>,
        insert_after: bool,
    ) -> Vec<TrackRef> {
        let index = match anchor {
            None => self.rows.len(),
            Some(anchor) => match self.position(&anchor) {
                Some(i) if insert_after => i + 1,
                Some(i) => i,
                None => {
                    tracing::warn!(
                        "Anchor {} is not a row of playlist {}, appending",
                        anchor,
                        self.id
                    );
                    self.rows.len()
                }
            },
        };

        let entries: Vec<Entry> = rows
            .into_iter()
            .map(|track| Entry {
                id: self.allocate_row(),
                track,
            })
            .collect();

        if entries.is_empty() {
            return Vec::new();
        }

        let refs: Vec<TrackRef> = entries.iter().map(|e| self.make_ref(e.id)).collect();
        self.rows.splice(index..index, entries);
        self.saved = false;
        refs
    }

    /// Delete the rows `refs` point at
    ///
    /// References into other playlists and already-invalid references are
    /// ignored. If the active row is deleted the marker is cleared; nothing
    /// advances. Returns the number of rows removed.
    pub fn remove_refs(&mut self, refs: &[TrackRef]) -> usize {
        let doomed: HashSet<RowId> = refs
            .iter()
            .filter(|r| r.playlist() == self.id)
            .map(TrackRef::row)
            .collect();

        let before = self.rows.len();
        self.rows.retain(|entry| !doomed.contains(&entry.id));
        let removed = before - self.rows.len();

        if removed > 0 {
            if self.active.is_some_and(|row| doomed.contains(&row)) {
                self.active = None;
            }
            self.saved = false;
        }
        removed
    }

    /// Drop every row
    pub fn clear(&mut self) {
        if !self.rows.is_empty() {
            self.rows.clear();
            self.saved = false;
        }
        self.active = None;
    }

    /// Replace all rows with `rows`
    ///
    /// Old references become invalid; the new rows get fresh ids.
    pub fn replace_rows(&mut self, rows: impl IntoIterator<Item = TrackRow>) -> Vec<TrackRef> {
        self.clear();
        self.add_rows(rows, None, true)
    }

    /// Open files into this playlist
    ///
    /// A saved playlist is replaced by `rows`; an unsaved one (a scratch
    /// list being built up) gets them appended.
    pub fn open_rows(&mut self, rows: impl IntoIterator<Item = TrackRow>) -> Vec<TrackRef> {
        if self.saved {
            self.replace_rows(rows)
        } else {
            self.add_rows(rows, None, true)
        }
    }

    /// Copy of all rows for persisting
    pub fn export_rows(&self) -> Vec<TrackRow> {
        self.rows.iter().map(|entry| entry.track.clone()).collect()
    }

    /// Move the rows `refs` point at next to `target`
    ///
    /// With no target the rows go to the end. Moved rows keep their
    /// relative order and their references. Moving onto one of the moved
    /// rows, or onto a row that does not resolve, does nothing. Returns
    /// whether anything moved.
    pub fn move_rows(
        &mut self,
        refs: &[TrackRef],
        target: Option<TrackRef>,
        insert_after: bool,
    ) -> bool {
        let moving: HashSet<RowId> = refs
            .iter()
            .filter(|r| self.contains(r))
            .map(TrackRef::row)
            .collect();
        if moving.is_empty() {
            return false;
        }

        if let Some(target) = target {
            if !self.contains(&target) {
                tracing::warn!("Move target {} does not resolve in {}", target, self.id);
                return false;
            }
            if moving.contains(&target.row()) {
                return false;
            }
        }

        let (moved, mut kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|entry| moving.contains(&entry.id));

        let index = match target {
            Some(target) => {
                let i = kept
                    .iter()
                    .position(|entry| entry.id == target.row())
                    .unwrap_or(kept.len());
                if insert_after {
                    i + 1
                } else {
                    i
                }
            }
            None => kept.len(),
        };

        kept.splice(index..index, moved);
        self.rows = kept;
        self.saved = false;
        true
    }

    /// Read tags for rows that have none yet
    ///
    /// Rows the reader fails on keep their "unknown" placeholders. Returns
    /// the number of rows filled.
    pub fn fill_metadata(&mut self, reader: &dyn MetadataReader) -> usize {
        let mut filled = 0;
        for entry in self.rows.iter_mut().filter(|e| !e.track.has_metadata()) {
            match reader.read(entry.track.path()) {
                Ok(metadata) => {
                    entry.track.metadata = Some(metadata);
                    filled += 1;
                }
                Err(e) => {
                    tracing::debug!("No metadata for {:?}: {}", entry.track.path(), e);
                }
            }
        }
        filled
    }

    // ===== Active marker =====

    /// The active row, if one is designated
    pub fn active_ref(&self) -> Option<TrackRef> {
        self.active.map(|row| self.make_ref(row))
    }

    /// Designate `r` as active
    ///
    /// Invalid references are ignored. Returns whether the marker moved.
    pub fn set_active(&mut self, r: &TrackRef) -> bool {
        if !self.contains(r) {
            tracing::debug!("Not activating stale reference {}", r);
            return false;
        }
        self.active = Some(r.row());
        true
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Select the first row and return it
    pub fn get_first_and_select(&mut self) -> Option<TrackRef> {
        let first = self.ref_at(0)?;
        self.active = Some(first.row());
        Some(first)
    }

    /// Select the row after the active one and return it
    pub fn get_next_and_select(&mut self) -> Option<TrackRef> {
        let next = self.get_next_ref(&self.active_ref()?)?;
        self.active = Some(next.row());
        Some(next)
    }

    /// Select the row before the active one and return it
    pub fn get_prev_and_select(&mut self) -> Option<TrackRef> {
        let prev = self.get_prev_ref(&self.active_ref()?)?;
        self.active = Some(prev.row());
        Some(prev)
    }

    // ===== Neighbours =====

    /// Row after `r`; `None` at the end (no wraparound)
    pub fn get_next_ref(&self, r: &TrackRef) -> Option<TrackRef> {
        let index = self.position(r)?;
        self.ref_at(index + 1)
    }

    /// Row before `r`; `None` at the start (no wraparound)
    pub fn get_prev_ref(&self, r: &TrackRef) -> Option<TrackRef> {
        let index = self.position(r)?;
        index.checked_sub(1).and_then(|i| self.ref_at(i))
    }

    fn index_of(&self, row: RowId) -> Option<usize> {
        self.rows.iter().position(|entry| entry.id == row)
    }

    fn make_ref(&self, row: RowId) -> TrackRef {
        TrackRef::new(self.id, row)
    }

    fn allocate_row(&mut self) -> RowId {
        let id = self.next_row;
        self.next_row = id.next();
        id
    }
}
