//! Session stream decoding.

use super::archive::from_archive;
use super::format::{
    ByteReader, FORMAT_VERSION, HEADER_SIZE, MAGIC, SectionInfo, SectionKind, TRAILER_SIZE,
    VIEW_SCHEMA_VERSION, VIEW_SECTION_ID,
};
use crate::error::{PersistenceError, Result};
use crate::types::{PersistedSession, SubwindowBlob, ViewState};

/// One section as found in the stream.
pub(crate) struct RawSection<'a> {
    pub(crate) kind: SectionKind,
    pub(crate) id: String,
    pub(crate) schema_version: u32,
    pub(crate) payload: &'a [u8],
}

impl RawSection<'_> {
    fn info(&self) -> SectionInfo {
        SectionInfo {
            kind: self.kind,
            id: self.id.clone(),
            schema_version: self.schema_version,
            payload_len: self.payload.len(),
        }
    }
}

/// Validate framing and split a stream into its sections.
///
/// Checks run in order: size, magic, checksum, format version, then each
/// section header. Any failure rejects the whole stream.
pub(crate) fn split_sections(data: &[u8]) -> Result<Vec<RawSection<'_>>> {
    if data.len() < HEADER_SIZE + TRAILER_SIZE {
        return Err(PersistenceError::Truncated {
            context: "stream header",
            needed: HEADER_SIZE + TRAILER_SIZE,
            available: data.len(),
        });
    }

    // Check magic first (before CRC) for clearer error messages
    if data[0..4] != MAGIC {
        return Err(PersistenceError::InvalidFormat {
            reason: "not a session stream (invalid magic bytes)".to_string(),
        });
    }

    let crc_offset = data.len() - TRAILER_SIZE;
    let stored = u32::from_le_bytes([
        data[crc_offset],
        data[crc_offset + 1],
        data[crc_offset + 2],
        data[crc_offset + 3],
    ]);
    let computed = crc32fast::hash(&data[..crc_offset]);
    if stored != computed {
        return Err(PersistenceError::ChecksumMismatch { stored, computed });
    }

    let mut reader = ByteReader::new(&data[4..crc_offset]);
    let version = reader.read_u32("format version")?;
    if version > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: FORMAT_VERSION,
        });
    }

    let section_count = reader.read_u32("section count")?;
    let mut sections = Vec::new();
    for _ in 0..section_count {
        sections.push(read_section(&mut reader)?);
    }

    if reader.remaining() != 0 {
        return Err(PersistenceError::InvalidFormat {
            reason: format!("{} trailing bytes after last section", reader.remaining()),
        });
    }

    Ok(sections)
}

fn read_section<'a>(reader: &mut ByteReader<'a>) -> Result<RawSection<'a>> {
    let kind = SectionKind::from_tag(reader.read_u8("section kind")?);
    let id_len = reader.read_u16("section id length")? as usize;
    let id_bytes = reader.take(id_len, "section id")?;
    let id = std::str::from_utf8(id_bytes)
        .map_err(|_| PersistenceError::InvalidFormat {
            reason: "section id is not valid UTF-8".to_string(),
        })?
        .to_string();
    let schema_version = reader.read_u32("section schema version")?;
    let payload_len = reader.read_u64("section payload length")?;
    let payload_len = usize::try_from(payload_len).map_err(|_| PersistenceError::InvalidFormat {
        reason: format!("section '{id}' is too large"),
    })?;
    let payload = reader.take(payload_len, "section payload")?;

    Ok(RawSection {
        kind,
        id,
        schema_version,
        payload,
    })
}

/// List the sections of a stream without decoding payloads.
pub(crate) fn section_infos(data: &[u8]) -> Result<Vec<SectionInfo>> {
    Ok(split_sections(data)?.iter().map(RawSection::info).collect())
}

/// Decode a full session.
///
/// The board section must come first and the view section second. Unknown
/// section kinds are skipped.
pub(crate) fn decode_session(data: &[u8]) -> Result<PersistedSession> {
    let sections = split_sections(data)?;
    let mut iter = sections.into_iter();

    let board = match iter.next() {
        Some(section) if section.kind == SectionKind::Board => section,
        other => {
            return Err(PersistenceError::SectionOrder {
                reason: format!(
                    "expected board section first, found {}",
                    describe(other.as_ref())
                ),
            });
        }
    };

    let view = match iter.next() {
        Some(section) if section.kind == SectionKind::View => section,
        other => {
            return Err(PersistenceError::SectionOrder {
                reason: format!(
                    "expected view section second, found {}",
                    describe(other.as_ref())
                ),
            });
        }
    };
    if view.schema_version > VIEW_SCHEMA_VERSION {
        return Err(PersistenceError::Deserialization {
            section: VIEW_SECTION_ID.to_string(),
            source: Box::new(std::io::Error::other(format!(
                "view schema {} is newer than supported {}",
                view.schema_version, VIEW_SCHEMA_VERSION
            ))),
        });
    }
    let view_state: ViewState = from_archive(view.payload, VIEW_SECTION_ID)?;

    let mut subwindow_states: Vec<SubwindowBlob> = Vec::new();
    for section in iter {
        match section.kind {
            SectionKind::Subwindow => {
                if subwindow_states
                    .iter()
                    .any(|blob| blob.provider_id == section.id)
                {
                    return Err(PersistenceError::SectionOrder {
                        reason: format!("duplicate subwindow section '{}'", section.id),
                    });
                }
                subwindow_states.push(SubwindowBlob::new(
                    section.id,
                    section.schema_version,
                    section.payload.to_vec(),
                ));
            }
            SectionKind::Board | SectionKind::View => {
                return Err(PersistenceError::SectionOrder {
                    reason: format!("repeated {} section", section.kind.label()),
                });
            }
            SectionKind::Unknown(tag) => {
                tracing::warn!(
                    "Skipping unknown section '{}' (kind {}, {} bytes)",
                    section.id,
                    tag,
                    section.payload.len()
                );
            }
        }
    }

    Ok(PersistedSession {
        board_state: board.payload.to_vec(),
        board_schema_version: board.schema_version,
        view_state,
        subwindow_states,
    })
}

fn describe(section: Option<&RawSection<'_>>) -> String {
    match section {
        Some(section) => format!("{} section '{}'", section.kind.label(), section.id),
        None => "end of stream".to_string(),
    }
}
