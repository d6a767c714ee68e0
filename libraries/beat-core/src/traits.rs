/// Core traits for Beat
use crate::error::Result;
use crate::types::TrackMetadata;
use std::path::Path;

/// Tag-reading collaborator
///
/// Playlists call this to populate display metadata for their rows. The
/// playback core never reads tags itself.
pub trait MetadataReader: Send {
    /// Read metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not audio
    fn read(&self, path: &Path) -> Result<TrackMetadata>;
}
