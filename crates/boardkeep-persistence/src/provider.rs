//! State provider contract between the session codec and the live session.
//!
//! Every stateful auxiliary panel implements [`SubwindowStateProvider`]. The
//! live session implements [`SessionHost`] and lists its providers in a fixed
//! order; the codec keys their sections by [`stable_id`], so reordering or
//! adding providers never shifts another provider's data.
//!
//! [`stable_id`]: SubwindowStateProvider::stable_id

use std::collections::HashSet;

use crate::error::{ApplyError, Result};
use crate::types::ViewState;

/// A panel whose state is persisted with the session.
pub trait SubwindowStateProvider {
    /// Identifier of this provider's section. Must be unique per host and
    /// never change once released.
    fn stable_id(&self) -> &'static str;

    /// Schema version written next to the payload.
    fn schema_version(&self) -> u32 {
        1
    }

    /// Serialize the current state.
    fn capture_state(&self) -> Result<Vec<u8>>;

    /// Replace the current state with a previously captured one.
    fn apply_state(&mut self, schema_version: u32, data: &[u8]) -> std::result::Result<(), ApplyError>;

    /// The main frame was minimized.
    fn on_parent_minimized(&mut self) {}

    /// The main frame was restored from minimized.
    fn on_parent_restored(&mut self) {}
}

/// The live session as seen by the codec.
pub trait SessionHost {
    /// Schema version of the board blob.
    fn board_schema_version(&self) -> u32 {
        1
    }

    /// Serialize the board state.
    fn capture_board(&self) -> Result<Vec<u8>>;

    /// Replace the board state.
    fn restore_board(&mut self, schema_version: u32, data: &[u8]) -> std::result::Result<(), ApplyError>;

    /// Current frame and viewport placement.
    fn capture_view(&self) -> ViewState;

    /// Move the frame and viewport.
    fn restore_view(&mut self, view: &ViewState);

    /// Providers in registration order.
    fn providers(&self) -> Vec<&dyn SubwindowStateProvider>;

    /// Providers in registration order, mutably.
    fn providers_mut(&mut self) -> Vec<&mut dyn SubwindowStateProvider>;

    /// A restore is about to start. Hosts with live state the stream does
    /// not carry set it aside here.
    fn begin_restore(&mut self) {}

    /// The restore ended. When `rolled_back` is true the captured state has
    /// already been re-applied and anything set aside in
    /// [`begin_restore`](Self::begin_restore) must be put back.
    fn finish_restore(&mut self, rolled_back: bool) {
        let _ = rolled_back;
    }
}

/// Stable ids of a host's providers, in registration order.
pub fn provider_ids<H: SessionHost + ?Sized>(host: &H) -> Vec<&'static str> {
    host.providers().iter().map(|p| p.stable_id()).collect()
}

/// Reject hosts that register two providers under one id.
pub fn ensure_unique_ids<H: SessionHost + ?Sized>(host: &H) -> std::result::Result<(), ApplyError> {
    let mut seen = HashSet::new();
    for id in provider_ids(host) {
        if !seen.insert(id) {
            return Err(ApplyError::DuplicateProvider { id: id.to_string() });
        }
    }
    Ok(())
}

/// Propagate a minimize of the main frame to every provider.
pub fn notify_minimized<H: SessionHost + ?Sized>(host: &mut H) {
    for provider in host.providers_mut() {
        provider.on_parent_minimized();
    }
}

/// Propagate a restore of the main frame to every provider.
pub fn notify_restored<H: SessionHost + ?Sized>(host: &mut H) {
    for provider in host.providers_mut() {
        provider.on_parent_restored();
    }
}
