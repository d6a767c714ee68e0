/// Track row and display metadata types
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder shown for any tag the file does not carry
pub const UNKNOWN_TAG: &str = "unknown";

/// Track metadata extracted from file tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Cover image found next to the file
    pub art_path: Option<PathBuf>,
}

impl TrackMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if metadata has any useful information
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.duration_ms.is_none()
    }

    /// Track duration, if known
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}

/// One entry in a playlist
///
/// Only `source_path` is required. Display metadata is filled in lazily by a
/// [`MetadataReader`](crate::traits::MetadataReader); until then every tag
/// reads as [`UNKNOWN_TAG`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRow {
    /// Filesystem location of a playable file
    pub source_path: PathBuf,

    /// Tag metadata, `None` until read
    pub metadata: Option<TrackMetadata>,
}

impl TrackRow {
    /// Create a row with no metadata yet
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            metadata: None,
        }
    }

    /// Create a row with already-read metadata
    pub fn with_metadata(source_path: impl Into<PathBuf>, metadata: TrackMetadata) -> Self {
        Self {
            source_path: source_path.into(),
            metadata: Some(metadata),
        }
    }

    /// Path of the playable file
    pub fn path(&self) -> &Path {
        &self.source_path
    }

    /// Whether tags have been read for this row
    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn title(&self) -> &str {
        self.tag(|m| m.title.as_deref())
    }

    pub fn artist(&self) -> &str {
        self.tag(|m| m.artist.as_deref())
    }

    pub fn album(&self) -> &str {
        self.tag(|m| m.album.as_deref())
    }

    /// Track duration, if known
    pub fn duration(&self) -> Option<Duration> {
        self.metadata.as_ref().and_then(TrackMetadata::duration)
    }

    /// Cover image path, if one was found
    pub fn art_path(&self) -> Option<&Path> {
        self.metadata.as_ref().and_then(|m| m.art_path.as_deref())
    }

    /// Display length (`m:ss`), empty when unknown
    pub fn length_str(&self) -> String {
        self.duration().map(format_duration).unwrap_or_default()
    }

    fn tag<'a>(&'a self, get: impl Fn(&'a TrackMetadata) -> Option<&'a str>) -> &'a str {
        self.metadata
            .as_ref()
            .and_then(get)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_TAG)
    }
}

/// Format a duration as `m:ss`
///
/// Minutes are not wrapped into hours: 1h 2m 5s renders as `62:05`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
