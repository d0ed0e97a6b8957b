//! Session stream encoding.

use super::archive::to_archive;
use super::format::{
    BOARD_SECTION_ID, FORMAT_VERSION, HEADER_SIZE, MAGIC, SectionKind, TRAILER_SIZE,
    VIEW_SCHEMA_VERSION, VIEW_SECTION_ID, write_section,
};
use crate::error::{PersistenceError, Result};
use crate::types::PersistedSession;

/// Encode a session into a framed, checksummed stream.
pub(crate) fn encode_session(session: &PersistedSession) -> Result<Vec<u8>> {
    let view = to_archive(&session.view_state, VIEW_SECTION_ID)?;

    let section_count = u32::try_from(2 + session.subwindow_states.len()).map_err(|_| {
        PersistenceError::InvalidFormat {
            reason: "too many sections".to_string(),
        }
    })?;

    let mut out =
        Vec::with_capacity(HEADER_SIZE + TRAILER_SIZE + view.len() + session.payload_len() + 64);

    // Header
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&section_count.to_le_bytes());

    // Sections in their fixed logical order
    write_section(
        &mut out,
        SectionKind::Board,
        BOARD_SECTION_ID,
        session.board_schema_version,
        &session.board_state,
    )?;
    write_section(
        &mut out,
        SectionKind::View,
        VIEW_SECTION_ID,
        VIEW_SCHEMA_VERSION,
        &view,
    )?;
    for blob in &session.subwindow_states {
        write_section(
            &mut out,
            SectionKind::Subwindow,
            &blob.provider_id,
            blob.schema_version,
            &blob.data,
        )?;
    }

    // Trailer
    let crc = crc32fast::hash(&out);
    out.extend_from_slice(&crc.to_le_bytes());

    Ok(out)
}
