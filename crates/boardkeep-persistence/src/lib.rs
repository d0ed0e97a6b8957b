//! Crash-recovery checkpoints for interactive routing sessions.
//!
//! This crate writes the whole working state of a routing session to a
//! scratch file while the user works, and offers it back when the design is
//! opened again after a crash.
//!
//! # Features
//!
//! - **Content-addressed checkpoints** named after the CRC-32 of the design file
//! - **Atomic writes** to prevent truncated checkpoints
//! - **Throttled auto-save** on a single background writer
//! - **Sectioned stream format** with per-provider stable ids and a checksum
//!
//! # Stream Format
//!
//! ```text
//! +----------------------+
//! | Magic: "BKS\x01"     | 4 bytes
//! +----------------------+
//! | Format version       | 4 bytes - u32 little-endian
//! +----------------------+
//! | Section count        | 4 bytes - u32 little-endian
//! +----------------------+
//! | Sections             | board, view, then one per subwindow provider
//! +----------------------+
//! | CRC32                | 4 bytes - over everything above
//! +----------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use boardkeep_persistence::{ChecksumIdentity, RecoveryCheckpointStore, SessionCodec};
//!
//! let identity = ChecksumIdentity::compute(Path::new("board.dsn"))?;
//! let store = RecoveryCheckpointStore::default();
//!
//! // Write the live session
//! store.write(identity, &SessionCodec::capture(&live)?)?;
//!
//! // Next launch
//! if let Some(offer) = store.recovery_offer(identity, design_saved_at) {
//!     let session = store.read(offer.identity)?;
//!     SessionCodec::apply(&session, &mut live)?;
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into:
//!
//! - `identity.rs` - Content checksum of design files
//! - `checkpoint/` - Checkpoint naming, atomic writes, recovery offer
//! - `autosave/` - Throttle and background writer
//! - `codec/` - Session stream encoding, decoding and apply
//! - `provider.rs` - Contract between the codec and the live session
//! - `types/` - Persisted session payload
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod checkpoint;
mod codec;
mod error;
mod identity;
mod provider;
mod types;

// Re-export main types
pub use autosave::{
    AutoSaveConfig, AutosaveThrottle, AutosaveTick, Autosaver, CheckpointWriter,
    DEFAULT_MIN_INTERVAL_SECS, SubmitOutcome, should_save,
};
pub use checkpoint::{
    CheckpointConfig, DEFAULT_EXTENSION, DEFAULT_PREFIX, RecoveryCheckpoint,
    RecoveryCheckpointStore, RecoveryOffer,
};
pub use codec::archive::{from_archive, to_archive};
pub use codec::format::{FORMAT_VERSION, MAGIC};
pub use codec::{ApplyOutcome, SectionInfo, SectionKind, SessionCodec};
pub use error::{ApplyError, PersistenceError, Result};
pub use identity::ChecksumIdentity;
pub use provider::{
    SessionHost, SubwindowStateProvider, ensure_unique_ids, notify_minimized, notify_restored,
    provider_ids,
};
pub use types::{PersistedSession, Point, Rect, SubwindowBlob, ViewState};
