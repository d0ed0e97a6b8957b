//! Session error types.

use boardkeep_persistence::{ApplyError, PersistenceError};
use thiserror::Error;

use crate::snapshot::SnapshotId;

/// Snapshot registry error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Snapshots can only be taken from a menu state.
    #[error("Cannot take a snapshot while an interactive operation is in progress")]
    SessionBusy,

    #[error("Unknown snapshot {id}")]
    UnknownSnapshot { id: SnapshotId },
}

/// Error from the open, recover and save workflow.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// `resolve_recovery` called without an offer pending.
    #[error("No recovery checkpoint is pending for this session")]
    NoPendingRecovery,
}

impl SessionError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(e) => e.user_message(),
            Self::Apply(e) => e.user_message(),
            Self::Snapshot(SnapshotError::SessionBusy) => {
                "Finish or cancel the current routing operation before taking a snapshot."
                    .to_string()
            }
            Self::Snapshot(SnapshotError::UnknownSnapshot { .. }) => {
                "The selected snapshot no longer exists.".to_string()
            }
            Self::NoPendingRecovery => "There is nothing to recover.".to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Persistence(e) => e.suggestion(),
            Self::Apply(ApplyError::Decode { .. }) => {
                Some("Decline the recovery and open the design file instead.".into())
            }
            Self::Apply(_) | Self::Snapshot(_) | Self::NoPendingRecovery => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_messages_delegate() {
        let err = SessionError::from(PersistenceError::ChecksumMismatch {
            stored: 1,
            computed: 2,
        });
        assert!(err.user_message().contains("corrupted"));
        assert!(err.suggestion().is_some());

        let err = SessionError::from(ApplyError::decode("board", "bad"));
        assert!(err.suggestion().unwrap().contains("Decline"));
    }

    #[test]
    fn test_snapshot_messages() {
        let err = SessionError::from(SnapshotError::UnknownSnapshot {
            id: SnapshotId::new(4),
        });
        assert_eq!(err.to_string(), "Unknown snapshot #4");
        assert!(SessionError::from(SnapshotError::SessionBusy)
            .user_message()
            .contains("routing"));
    }
}
