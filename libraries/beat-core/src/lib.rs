//! Beat Core
//!
//! Shared types, traits, and error handling for the Beat audio player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Identifiers**: `PlaylistId`, `RowId`
//! - **Domain Types**: `TrackRow`, `TrackMetadata`
//! - **Collaborator Traits**: `MetadataReader`
//! - **Error Handling**: Unified `BeatError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use beat_core::{TrackRow, PlaylistId, UNKNOWN_TAG};
//!
//! let id = PlaylistId::generate();
//! let row = TrackRow::new("/music/song.mp3");
//! assert_eq!(row.artist(), UNKNOWN_TAG);
//! # let _ = id;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BeatError, Result};
pub use traits::MetadataReader;
pub use types::{format_duration, PlaylistId, RowId, TrackMetadata, TrackRow, UNKNOWN_TAG};
