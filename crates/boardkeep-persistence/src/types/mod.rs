//! Persistence types for session checkpoints.
//!
//! The board and subwindow payloads are opaque byte blobs owned by their
//! producers; only the view section has a structure known to this crate.

mod session;
mod view;

pub use session::{PersistedSession, SubwindowBlob};
pub use view::{Point, Rect, ViewState};
