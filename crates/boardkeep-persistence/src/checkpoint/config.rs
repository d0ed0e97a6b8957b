//! Checkpoint location settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default file name prefix of recovery checkpoints.
pub const DEFAULT_PREFIX: &str = "recovery";

/// Default file extension of recovery checkpoints.
pub const DEFAULT_EXTENSION: &str = "frb";

/// Where recovery checkpoints are written and how they are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Scratch directory. The system temp directory when unset.
    pub scratch_dir: Option<PathBuf>,

    /// File name prefix, followed by `-<identity>`.
    pub prefix: String,

    /// File extension, without the dot.
    pub extension: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl CheckpointConfig {
    /// Naming used by older releases (`freerouting-<hex>.frb`).
    pub fn legacy() -> Self {
        Self {
            prefix: "freerouting".to_string(),
            ..Default::default()
        }
    }

    /// The configured scratch directory, or the system temp directory.
    pub fn resolved_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
