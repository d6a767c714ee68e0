//! Beat Metadata
//!
//! The tag-reading collaborator for Beat playlists.
//!
//! This crate provides:
//! - `LoftyMetadataReader`: title/artist/album/length from file tags
//! - `build_rows`: turns dropped or opened paths into playlist rows,
//!   expanding directories and skipping files that are not audio
//!
//! # Example
//!
//! ```rust,no_run
//! use beat_metadata::{build_rows, LoftyMetadataReader, ScanConfig};
//! use std::path::PathBuf;
//!
//! let reader = LoftyMetadataReader::new();
//! let outcome = build_rows(&[PathBuf::from("/music/album")], &reader, &ScanConfig::default());
//! for row in &outcome.rows {
//!     println!("{} - {}", row.artist(), row.title());
//! }
//! ```

mod error;
mod reader;
mod scanner;

pub use error::{MetadataError, Result};
pub use reader::LoftyMetadataReader;
pub use scanner::{build_rows, collect_audio_files, find_cover_art, ScanConfig, ScanOutcome};
