//! Auto-save functionality for sessions.
//!
//! Provides:
//! - `AutosaveThrottle` - At most one checkpoint write per interval
//! - `CheckpointWriter` - Single in-flight background writer
//! - `Autosaver` - Both of the above, driven by the session's update loop
//! - `AutoSaveConfig` - User settings for auto-save behavior

mod config;
mod throttle;
mod writer;

use std::time::Instant;

pub use config::{AutoSaveConfig, DEFAULT_MIN_INTERVAL_SECS};
pub use throttle::{AutosaveThrottle, should_save};
pub use writer::{CheckpointWriter, SubmitOutcome};

use tokio::task::JoinHandle;

use crate::checkpoint::RecoveryCheckpoint;
use crate::error::Result;
use crate::identity::ChecksumIdentity;
use crate::types::PersistedSession;

/// What one [`Autosaver::tick`] did.
#[derive(Debug)]
pub enum AutosaveTick {
    /// Auto-save is turned off.
    Disabled,

    /// Inside the throttle window.
    Throttled,

    /// The previous write is still running; this attempt was dropped.
    Busy,

    /// Capturing the live session failed; nothing was written.
    CaptureFailed,

    /// A write was started.
    Started(JoinHandle<Option<RecoveryCheckpoint>>),
}

/// Periodic checkpointing of one open design.
#[derive(Debug)]
pub struct Autosaver {
    identity: ChecksumIdentity,
    config: AutoSaveConfig,
    throttle: AutosaveThrottle,
    writer: CheckpointWriter,
}

impl Autosaver {
    /// Autosaver whose first tick writes immediately.
    pub fn new(identity: ChecksumIdentity, config: AutoSaveConfig, writer: CheckpointWriter) -> Self {
        let throttle = AutosaveThrottle::new(config.min_interval());
        Self {
            identity,
            config,
            throttle,
            writer,
        }
    }

    /// Identity of the design being checkpointed.
    pub fn identity(&self) -> ChecksumIdentity {
        self.identity
    }

    /// The background writer.
    pub fn writer(&self) -> &CheckpointWriter {
        &self.writer
    }

    /// Whether auto-save is turned on.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Called from the session update loop.
    ///
    /// `capture` runs on the calling thread, and only when a write is
    /// actually going to start.
    pub fn tick(
        &mut self,
        now: Instant,
        capture: impl FnOnce() -> Result<PersistedSession>,
    ) -> AutosaveTick {
        if !self.config.enabled {
            return AutosaveTick::Disabled;
        }

        if !self.throttle.maybe_save(now) {
            return AutosaveTick::Throttled;
        }

        if self.writer.is_busy() {
            tracing::debug!("Auto-save skipped, previous checkpoint write still running");
            return AutosaveTick::Busy;
        }

        let session = match capture() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Auto-save skipped, could not capture the session: {}", e);
                return AutosaveTick::CaptureFailed;
            }
        };

        match self.writer.submit(self.identity, session) {
            SubmitOutcome::Started(handle) => AutosaveTick::Started(handle),
            SubmitOutcome::Dropped => AutosaveTick::Busy,
        }
    }
}
