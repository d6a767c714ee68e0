mod ids;
mod track;

pub use ids::{PlaylistId, RowId};
pub use track::{format_duration, TrackMetadata, TrackRow, UNKNOWN_TAG};
