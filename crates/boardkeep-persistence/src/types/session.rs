//! The full persisted session payload.

use super::ViewState;

/// State of one subwindow provider as stored in a session stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubwindowBlob {
    /// Stable id of the provider that produced the blob.
    pub provider_id: String,

    /// Provider-defined schema version of `data`.
    pub schema_version: u32,

    /// Provider-defined payload.
    pub data: Vec<u8>,
}

impl SubwindowBlob {
    /// Create a blob.
    pub fn new(provider_id: impl Into<String>, schema_version: u32, data: Vec<u8>) -> Self {
        Self {
            provider_id: provider_id.into(),
            schema_version,
            data,
        }
    }
}

/// Everything needed to rebuild an interactive session.
///
/// Sections appear in the stream in field order: board, view, then the
/// subwindow blobs in provider registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    /// Opaque board state produced by the routing engine.
    pub board_state: Vec<u8>,

    /// Producer-defined schema version of `board_state`.
    pub board_schema_version: u32,

    /// Frame and viewport placement.
    pub view_state: ViewState,

    /// Per-panel state, in provider registration order.
    pub subwindow_states: Vec<SubwindowBlob>,
}

impl PersistedSession {
    /// Create a session with no subwindow state.
    pub fn new(board_state: Vec<u8>, view_state: ViewState) -> Self {
        Self {
            board_state,
            board_schema_version: 1,
            view_state,
            subwindow_states: Vec::new(),
        }
    }

    /// Find a subwindow blob by provider id.
    pub fn subwindow(&self, provider_id: &str) -> Option<&SubwindowBlob> {
        self.subwindow_states
            .iter()
            .find(|blob| blob.provider_id == provider_id)
    }

    /// Total payload size in bytes (excluding framing).
    pub fn payload_len(&self) -> usize {
        self.board_state.len()
            + self
                .subwindow_states
                .iter()
                .map(|blob| blob.data.len())
                .sum::<usize>()
    }
}
