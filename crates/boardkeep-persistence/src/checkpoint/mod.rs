//! Crash-recovery checkpoints.
//!
//! Provides:
//! - `RecoveryCheckpointStore` - Naming, atomic writes and the recovery offer
//! - `CheckpointConfig` - Where checkpoints live and how they are named

mod config;
mod store;

pub use config::{CheckpointConfig, DEFAULT_EXTENSION, DEFAULT_PREFIX};
pub use store::{RecoveryCheckpoint, RecoveryCheckpointStore, RecoveryOffer};
