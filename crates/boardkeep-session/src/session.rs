//! Open, recover, autosave and close one design.
//!
//! ```text
//! open ──► recovery offer? ──yes──► resolve_recovery(Accept | Decline)
//!              │                          │
//!              no                         ▼
//!              └──────────────► autosave_tick / snapshots / save_design
//!                                         │
//!                                         ▼
//!                                close (or discard)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use boardkeep_persistence::{
    ApplyOutcome, AutoSaveConfig, AutosaveTick, Autosaver, CheckpointConfig, CheckpointWriter,
    ChecksumIdentity, RecoveryCheckpointStore, RecoveryOffer, SessionCodec, notify_minimized,
    notify_restored,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::error::SessionError;
use crate::snapshot::{ApplyReport, SnapshotId};
use crate::workspace::Workspace;

/// Autosave and checkpoint settings of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub autosave: AutoSaveConfig,
    pub checkpoint: CheckpointConfig,
}

/// The user's answer to a recovery offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Load the checkpoint into the session.
    Accept,

    /// Delete the checkpoint and keep the design as opened.
    Decline,
}

/// Result of a manual save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved { path: PathBuf },
    Failed { message: String },
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Returned by [`DesignSession::open`].
#[derive(Debug)]
pub struct OpenOutcome {
    pub session: DesignSession,

    /// A checkpoint newer than the design file. Nothing is loaded until
    /// [`DesignSession::resolve_recovery`] is called.
    pub recovery_offer: Option<RecoveryOffer>,
}

/// One open design and its crash-recovery checkpoint.
#[derive(Debug)]
pub struct DesignSession {
    design_path: PathBuf,
    workspace: Workspace,

    /// `None` when the design's identity could not be computed; recovery is
    /// then disabled for the whole session.
    autosaver: Option<Autosaver>,

    pending_offer: Option<RecoveryOffer>,

    /// Whether the last persistence event was a successful manual save.
    saved_clean: bool,
}

impl DesignSession {
    /// Open a design whose board has already been loaded into `workspace`.
    ///
    /// Computes the design identity, looks for a recovery checkpoint newer
    /// than the design file and prepares autosave. An unreadable design file
    /// only disables recovery.
    pub fn open(
        design_path: impl Into<PathBuf>,
        workspace: Workspace,
        config: &SessionConfig,
        runtime: Handle,
    ) -> OpenOutcome {
        let design_path = design_path.into();

        let identity = match ChecksumIdentity::compute(&design_path) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(
                    "Crash recovery disabled for {}: {}",
                    design_path.display(),
                    e
                );
                None
            }
        };

        let store = RecoveryCheckpointStore::from_config(&config.checkpoint);
        let recovery_offer = identity
            .and_then(|identity| store.recovery_offer(identity, design_saved_at(&design_path)));
        if let Some(offer) = &recovery_offer {
            tracing::info!(
                "Recovery checkpoint {} found for {}",
                offer.path.display(),
                design_path.display()
            );
        }

        let autosaver = identity.map(|identity| {
            Autosaver::new(
                identity,
                config.autosave.clone(),
                CheckpointWriter::new(store, runtime),
            )
        });

        let session = Self {
            design_path,
            workspace,
            autosaver,
            pending_offer: recovery_offer.clone(),
            saved_clean: false,
        };

        OpenOutcome {
            session,
            recovery_offer,
        }
    }

    pub fn design_path(&self) -> &Path {
        &self.design_path
    }

    pub fn identity(&self) -> Option<ChecksumIdentity> {
        self.autosaver.as_ref().map(Autosaver::identity)
    }

    /// Where this session's checkpoint is written.
    pub fn checkpoint_path(&self) -> Option<PathBuf> {
        self.autosaver
            .as_ref()
            .map(|autosaver| autosaver.writer().store().path_for(autosaver.identity()))
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// The unresolved recovery offer, if any.
    pub fn pending_recovery(&self) -> Option<&RecoveryOffer> {
        self.pending_offer.as_ref()
    }

    /// Answer the recovery offer.
    ///
    /// Accepting loads the checkpoint and applies it; on failure the
    /// workspace is left as it was and the offer stays pending. Declining
    /// deletes the checkpoint.
    pub fn resolve_recovery(
        &mut self,
        decision: RecoveryDecision,
    ) -> Result<Option<ApplyOutcome>, SessionError> {
        let offer = self
            .pending_offer
            .take()
            .ok_or(SessionError::NoPendingRecovery)?;
        let Some(autosaver) = &self.autosaver else {
            return Err(SessionError::NoPendingRecovery);
        };
        let store = autosaver.writer().store();

        match decision {
            RecoveryDecision::Accept => {
                let restored = store
                    .read(offer.identity)
                    .map_err(SessionError::from)
                    .and_then(|persisted| {
                        SessionCodec::apply(&persisted, &mut self.workspace)
                            .map_err(SessionError::from)
                    });
                match restored {
                    Ok(outcome) => {
                        tracing::info!("Recovered session from {}", offer.path.display());
                        Ok(Some(outcome))
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Could not recover from {}: {}",
                            offer.path.display(),
                            e
                        );
                        self.pending_offer = Some(offer);
                        Err(e)
                    }
                }
            }
            RecoveryDecision::Decline => {
                store.delete(offer.identity);
                tracing::info!("Recovery declined, removed {}", offer.path.display());
                Ok(None)
            }
        }
    }

    /// Drive autosave from the update loop.
    ///
    /// Suspended while a recovery offer is pending so the checkpoint is not
    /// overwritten before the user decides.
    pub fn autosave_tick(&mut self, now: Instant) -> AutosaveTick {
        if self.pending_offer.is_some() {
            tracing::debug!("Auto-save suspended until the recovery offer is resolved");
            return AutosaveTick::Disabled;
        }
        let Some(autosaver) = self.autosaver.as_mut() else {
            return AutosaveTick::Disabled;
        };

        let workspace = &self.workspace;
        let tick = autosaver.tick(now, || SessionCodec::capture(workspace));
        if matches!(tick, AutosaveTick::Started(_)) {
            self.saved_clean = false;
        }
        tick
    }

    /// Save the design through `write`, which receives the design path and
    /// the workspace. Failure is reported as a status, never an error.
    pub fn save_design<F>(&mut self, write: F) -> SaveStatus
    where
        F: FnOnce(&Path, &Workspace) -> std::io::Result<()>,
    {
        match write(&self.design_path, &self.workspace) {
            Ok(()) => {
                self.saved_clean = true;
                tracing::info!("Saved {}", self.design_path.display());
                SaveStatus::Saved {
                    path: self.design_path.clone(),
                }
            }
            Err(e) => {
                self.saved_clean = false;
                tracing::warn!("Could not save {}: {}", self.design_path.display(), e);
                SaveStatus::Failed {
                    message: format!(
                        "Could not save {}: {}",
                        self.design_path.display(),
                        e
                    ),
                }
            }
        }
    }

    /// Take a snapshot of the live session with the panel's mask. Without a
    /// name the next default name is used.
    pub fn create_snapshot(&mut self, name: Option<&str>) -> Result<SnapshotId, SessionError> {
        let Workspace {
            live, snapshots, ..
        } = &mut self.workspace;
        let mask = snapshots.mask;
        let snapshot = match name {
            Some(name) => snapshots.registry.create(name, live, &mask)?,
            None => snapshots.registry.create_default(live, &mask)?,
        };
        Ok(snapshot.id)
    }

    /// Restore a snapshot into the live session.
    pub fn goto_snapshot(&mut self, id: SnapshotId) -> Result<ApplyReport, SessionError> {
        Ok(self.workspace.goto_snapshot(id)?)
    }

    /// The main frame was minimized.
    pub fn parent_minimized(&mut self) {
        notify_minimized(&mut self.workspace);
    }

    /// The main frame was restored.
    pub fn parent_restored(&mut self) {
        notify_restored(&mut self.workspace);
    }

    /// Close the session.
    ///
    /// Waits for a running checkpoint write, then deletes the checkpoint if
    /// the design was saved since the last autosave. Returns whether a
    /// checkpoint was deleted.
    pub async fn close(self) -> bool {
        let Some(autosaver) = &self.autosaver else {
            return false;
        };
        autosaver.writer().wait_idle().await;

        if self.saved_clean {
            autosaver.writer().store().delete(autosaver.identity())
        } else {
            tracing::info!(
                "Keeping recovery checkpoint for {}, design has unsaved changes",
                self.design_path.display()
            );
            false
        }
    }

    /// Close the session and delete its checkpoint regardless of save state.
    pub async fn discard(self) -> bool {
        let Some(autosaver) = &self.autosaver else {
            return false;
        };
        autosaver.writer().wait_idle().await;
        autosaver.writer().store().delete(autosaver.identity())
    }
}

/// Modification time of the design file.
fn design_saved_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}
