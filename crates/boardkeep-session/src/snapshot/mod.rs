//! Named snapshots of the interactive session.
//!
//! A [`Snapshot`] copies the categories enabled in a [`SnapshotAttributes`]
//! mask out of the live session; [`SnapshotApplier`] copies them back,
//! skipping any category that no longer fits the board. The
//! [`SnapshotRegistry`] keeps them in creation order and the
//! [`SnapshotPanel`] persists the registry with the session.

mod applier;
mod attributes;
mod model;
mod panel;
mod registry;

pub use applier::{ApplyReport, SkippedAttribute, SnapshotApplier};
pub use attributes::{SnapshotAttribute, SnapshotAttributes};
pub use model::{ComponentGrid, DisplayRegion, ManualRules, Snapshot, SnapshotId};
pub use panel::{SNAPSHOT_PANEL_ID, SnapshotPanel};
pub use registry::SnapshotRegistry;
