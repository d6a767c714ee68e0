/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for beat_core::BeatError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => beat_core::BeatError::not_found("File", path),
            MetadataError::Io(io) => beat_core::BeatError::Io(io),
            other => beat_core::BeatError::metadata(other.to_string()),
        }
    }
}
