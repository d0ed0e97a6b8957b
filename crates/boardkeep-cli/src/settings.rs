//! User settings, stored as TOML in the platform config directory.
//!
//! ```toml
//! [autosave]
//! enabled = true
//! min_interval_secs = 30
//!
//! [checkpoint]
//! scratch_dir = "/var/tmp/boardkeep"
//! prefix = "recovery"
//! extension = "frb"
//! ```

use std::path::{Path, PathBuf};

use boardkeep_persistence::{AutoSaveConfig, CheckpointConfig, RecoveryCheckpointStore};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardkeepSettings {
    pub autosave: AutoSaveConfig,
    pub checkpoint: CheckpointConfig,
}

impl BoardkeepSettings {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()),
        }
    }

    /// Load settings from a specific path. A missing or invalid file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Default settings file location.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "Boardkeep", "boardkeep")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Checkpoint store these settings describe.
    pub fn store(&self) -> RecoveryCheckpointStore {
        RecoveryCheckpointStore::from_config(&self.checkpoint)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = BoardkeepSettings::load_from(&dir.path().join("nope.toml"));
        assert_eq!(settings, BoardkeepSettings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[autosave\nenabled = ").unwrap();
        assert_eq!(BoardkeepSettings::load_from(&path), BoardkeepSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[checkpoint]\nprefix = \"freerouting\"\n").unwrap();

        let settings = BoardkeepSettings::load_from(&path);
        assert_eq!(settings.checkpoint.prefix, "freerouting");
        assert_eq!(settings.checkpoint.extension, "frb");
        assert_eq!(settings.autosave, AutoSaveConfig::default());
    }

    #[test]
    fn test_full_file_drives_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let scratch = dir.path().join("scratch");
        std::fs::write(
            &path,
            format!(
                "[autosave]\nenabled = false\nmin_interval_secs = 90\n\n[checkpoint]\nscratch_dir = {:?}\n",
                scratch.display().to_string()
            ),
        )
        .unwrap();

        let settings = BoardkeepSettings::load_from(&path);
        assert!(!settings.autosave.enabled);
        assert_eq!(settings.autosave.min_interval_secs, 90);
        assert_eq!(settings.store().dir(), scratch);
    }
}
