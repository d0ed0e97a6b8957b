//! Session codec: capture, encode, decode and apply whole sessions.
//!
//! Sections are tagged and length-prefixed (see [`format`]), so a stream
//! that is corrupt fails cleanly and a section from an unknown provider is
//! skipped instead of shifting everything after it.

pub mod archive;
pub mod format;
mod reader;
mod writer;

pub use format::{SectionInfo, SectionKind};

use crate::error::{ApplyError, PersistenceError, Result};
use crate::provider::{SessionHost, ensure_unique_ids};
use crate::types::{PersistedSession, SubwindowBlob};

/// What [`SessionCodec::apply`] did besides restoring board and view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Providers whose state was restored.
    pub restored: Vec<String>,

    /// Sections with no matching provider on the host.
    pub orphaned_sections: Vec<String>,

    /// Providers with no section in the stream; left as they were.
    pub untouched_providers: Vec<String>,
}

/// Stateless entry points for the session stream.
pub struct SessionCodec;

impl SessionCodec {
    /// Capture the live state of a host.
    ///
    /// Fails if two providers share a stable id.
    pub fn capture<H: SessionHost + ?Sized>(host: &H) -> Result<PersistedSession> {
        ensure_unique_ids(host).map_err(|e| PersistenceError::Serialization {
            section: "subwindow".to_string(),
            source: Box::new(e),
        })?;

        let mut session = PersistedSession::new(host.capture_board()?, host.capture_view());
        session.board_schema_version = host.board_schema_version();

        for provider in host.providers() {
            session.subwindow_states.push(SubwindowBlob::new(
                provider.stable_id(),
                provider.schema_version(),
                provider.capture_state()?,
            ));
        }

        Ok(session)
    }

    /// Encode a session into bytes.
    pub fn encode(session: &PersistedSession) -> Result<Vec<u8>> {
        writer::encode_session(session)
    }

    /// Decode a session. Any error anywhere in the stream fails the decode.
    pub fn decode(data: &[u8]) -> Result<PersistedSession> {
        reader::decode_session(data)
    }

    /// List the sections of a stream without decoding their payloads.
    pub fn sections(data: &[u8]) -> Result<Vec<SectionInfo>> {
        reader::section_infos(data)
    }

    /// Restore a decoded session into a host.
    ///
    /// Either every step succeeds or the host is rolled back to the state it
    /// had before the call: the captured state is re-applied, then
    /// [`SessionHost::finish_restore`] puts back whatever the host set aside.
    pub fn apply<H: SessionHost + ?Sized>(
        session: &PersistedSession,
        host: &mut H,
    ) -> std::result::Result<ApplyOutcome, ApplyError> {
        ensure_unique_ids(&*host)?;

        let backup =
            Self::capture(&*host).map_err(|e| ApplyError::decode("current session", e))?;

        host.begin_restore();
        match Self::apply_unchecked(session, host) {
            Ok(outcome) => {
                host.finish_restore(false);
                tracing::info!(
                    "Restored session: {} panels, {} orphaned sections",
                    outcome.restored.len(),
                    outcome.orphaned_sections.len()
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!("Session restore failed, rolling back: {}", err);
                if let Err(rollback) = Self::apply_unchecked(&backup, host) {
                    tracing::error!("Rollback after failed restore also failed: {}", rollback);
                }
                host.finish_restore(true);
                Err(err)
            }
        }
    }

    fn apply_unchecked<H: SessionHost + ?Sized>(
        session: &PersistedSession,
        host: &mut H,
    ) -> std::result::Result<ApplyOutcome, ApplyError> {
        host.restore_board(session.board_schema_version, &session.board_state)?;
        host.restore_view(&session.view_state);

        let mut outcome = ApplyOutcome::default();
        let mut providers = host.providers_mut();

        for provider in providers.iter_mut() {
            let id = provider.stable_id();
            match session.subwindow(id) {
                Some(blob) => {
                    provider.apply_state(blob.schema_version, &blob.data)?;
                    outcome.restored.push(id.to_string());
                }
                None => {
                    tracing::debug!("No saved state for panel '{}'", id);
                    outcome.untouched_providers.push(id.to_string());
                }
            }
        }

        for blob in &session.subwindow_states {
            if !providers
                .iter()
                .any(|provider| provider.stable_id() == blob.provider_id)
            {
                tracing::warn!("Ignoring saved state of unknown panel '{}'", blob.provider_id);
                outcome.orphaned_sections.push(blob.provider_id.clone());
            }
        }

        Ok(outcome)
    }
}
