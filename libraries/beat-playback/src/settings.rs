//! Persisted player settings
//!
//! Settings come from an optional TOML file, overridden by `BEAT_`-prefixed
//! environment variables (`BEAT_SHUFFLE=true`, `BEAT_REPEAT=song`, ...).
//! They reach the controller through its ordinary setters.

use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::types::{PlaybackConfig, RepeatMode};
use beat_core::PlaylistId;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "BEAT";

/// Settings remembered between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub repeat: RepeatMode,
    pub shuffle: bool,

    /// Volume level (0-100)
    pub volume: u8,

    pub history_size: usize,

    /// Playlist tab selected when the player last closed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_playlist: Option<PlaylistId>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        let playback = PlaybackConfig::default();
        Self {
            repeat: playback.repeat,
            shuffle: playback.shuffle,
            volume: playback.volume,
            history_size: playback.history_size,
            selected_playlist: None,
        }
    }
}

impl PlayerSettings {
    /// Load settings from `path` (if it exists) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path.filter(|p| p.exists()) {
            tracing::debug!("Reading settings from {:?}", path);
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(config::Environment::with_prefix(prefix).try_parsing(true));

        let config = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        if loaded.volume > 100 {
            return Err(PlaybackError::Config(format!(
                "volume must be 0-100, got {}",
                loaded.volume
            )));
        }
        Ok(loaded)
    }

    /// Controller configuration for startup
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            history_size: self.history_size,
            volume: self.volume,
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    /// Replay the settings into a running controller
    pub fn apply_to(&self, controller: &mut PlaybackController) {
        controller.set_repeat(self.repeat);
        controller.set_shuffle(self.shuffle);
        controller.set_volume(self.volume);
    }

    /// Capture the controller's current modes
    pub fn capture(&mut self, controller: &PlaybackController) {
        self.repeat = controller.repeat();
        self.shuffle = controller.shuffle();
        self.volume = controller.volume().level();
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PlaybackError::Config(e.to_string()))
    }

    /// Write settings as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
