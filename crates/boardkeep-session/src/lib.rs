//! Live routing session, named snapshots and the crash-recovery workflow.
//!
//! # Overview
//!
//! - [`LiveSessionState`] is the interactive board editor: board, settings,
//!   display state and panels.
//! - [`SnapshotRegistry`] holds named, attribute-masked copies of that state
//!   which the user can jump back to.
//! - [`Workspace`] pairs the two and is what the session codec persists.
//! - [`DesignSession`] ties a workspace to a design file: recovery offer on
//!   open, throttled autosave while working, checkpoint cleanup on close.
//!
//! # Example
//!
//! ```ignore
//! use boardkeep_session::{DesignSession, RecoveryDecision, SessionConfig, Workspace};
//!
//! let outcome = DesignSession::open(path, Workspace::new(board), &SessionConfig::default(), handle);
//! let mut session = outcome.session;
//! if outcome.recovery_offer.is_some() {
//!     session.resolve_recovery(RecoveryDecision::Accept)?;
//! }
//!
//! // In the update loop
//! session.autosave_tick(Instant::now());
//!
//! session.close().await;
//! ```

pub mod error;
pub mod live;
mod session;
pub mod snapshot;
mod workspace;

pub use error::{SessionError, SnapshotError};
pub use live::{InteractiveState, LiveSessionState, MenuMode, RoutingBoard};
pub use session::{
    DesignSession, OpenOutcome, RecoveryDecision, SaveStatus, SessionConfig,
};
pub use snapshot::{
    ApplyReport, Snapshot, SnapshotApplier, SnapshotAttribute, SnapshotAttributes, SnapshotId,
    SnapshotRegistry,
};
pub use workspace::Workspace;
