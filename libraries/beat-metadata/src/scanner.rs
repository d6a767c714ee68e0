/// Path scanning: turns opened/dropped paths into playlist rows
use beat_core::{MetadataReader, TrackRow};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File names probed (case-insensitively) for a cover image
const COVER_NAMES: &[&str] = &["cover", "folder", "front", "album"];
const COVER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descend into subdirectories (default: true)
    pub recursive: bool,

    /// Follow symbolic links while walking (default: false)
    pub follow_links: bool,

    /// Supported audio file extensions
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_links: false,
            extensions: vec![
                "mp3".to_string(),
                "flac".to_string(),
                "ogg".to_string(),
                "opus".to_string(),
                "wav".to_string(),
                "m4a".to_string(),
                "aac".to_string(),
            ],
        }
    }
}

impl ScanConfig {
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Result of turning a set of paths into rows
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Rows for every readable audio file, in discovery order
    pub rows: Vec<TrackRow>,

    /// Paths that were skipped and why
    pub errors: Vec<(PathBuf, String)>,
}

/// Expand `paths` into the audio files they name
///
/// Files are kept as given (if their extension matches); directories are
/// walked in file-name order. Missing paths are dropped.
pub fn collect_audio_files(paths: &[PathBuf], config: &ScanConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let max_depth = if config.recursive { usize::MAX } else { 1 };
            let walker = WalkDir::new(path)
                .follow_links(config.follow_links)
                .max_depth(max_depth)
                .sort_by_file_name();

            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && config.accepts(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            if config.accepts(path) {
                files.push(path.clone());
            }
        } else {
            tracing::debug!("Skipping missing path {:?}", path);
        }
    }

    files
}

/// Look for a cover image in `dir`
pub fn find_cover_art(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let ext = p.extension().and_then(|s| s.to_str()).unwrap_or_default();
            COVER_NAMES.iter().any(|n| n.eq_ignore_ascii_case(stem))
                && COVER_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
        })
        .collect();

    candidates.sort();
    candidates.into_iter().next()
}

/// Build playlist rows for `paths`
///
/// Every discovered file is read with `reader`; files the reader rejects are
/// reported in [`ScanOutcome::errors`] and left out of the rows.
pub fn build_rows(
    paths: &[PathBuf],
    reader: &dyn MetadataReader,
    config: &ScanConfig,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for path in paths {
        if !path.exists() {
            outcome
                .errors
                .push((path.clone(), "path does not exist".to_string()));
        }
    }

    for file in collect_audio_files(paths, config) {
        match reader.read(&file) {
            Ok(mut metadata) => {
                metadata.art_path = file.parent().and_then(find_cover_art);
                outcome.rows.push(TrackRow::with_metadata(file, metadata));
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable file {:?}: {}", file, e);
                outcome.errors.push((file, e.to_string()));
            }
        }
    }

    outcome
}
