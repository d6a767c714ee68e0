/// Metadata reader implementation using lofty
use crate::error::MetadataError;
use beat_core::{MetadataReader, TrackMetadata};
use lofty::{Accessor, AudioFile, TaggedFileExt};
use std::path::Path;

/// Metadata reader using the lofty library
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    fn extract_from_tag(tag: &lofty::Tag) -> TrackMetadata {
        TrackMetadata {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            ..TrackMetadata::default()
        }
    }
}

impl Default for LoftyMetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader for LoftyMetadataReader {
    fn read(&self, path: &Path) -> beat_core::Result<TrackMetadata> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()).into());
        }

        let tagged_file = lofty::read_from_path(path).map_err(MetadataError::from)?;

        let duration_ms = Some(tagged_file.properties().duration().as_millis() as u64);

        let mut metadata = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first())
            .map(Self::extract_from_tag)
            .unwrap_or_default();
        metadata.duration_ms = duration_ms;

        Ok(metadata)
    }
}
