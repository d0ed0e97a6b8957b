//! Session stream format definitions.
//!
//! # Stream Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ MAGIC: [u8; 4] = "BKS\x01"                      │
//! ├─────────────────────────────────────────────────┤
//! │ FORMAT_VERSION: u32                             │
//! ├─────────────────────────────────────────────────┤
//! │ SECTION_COUNT: u32                              │
//! ├─────────────────────────────────────────────────┤
//! │ Section (repeated SECTION_COUNT times):         │
//! │  - Kind: u8 (0=board, 1=view, 2=subwindow)      │
//! │  - Id Length: u16                               │
//! │  - Id: [u8] (UTF-8 stable id)                   │
//! │  - Schema Version: u32                          │
//! │  - Payload Length: u64                          │
//! │  - Payload: [u8]                                │
//! ├─────────────────────────────────────────────────┤
//! │ CRC32: u32 (over everything above)              │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The board section comes first, the view
//! section second, then one section per subwindow provider.

use crate::error::{PersistenceError, Result};

/// Magic bytes at the start of every session stream.
pub const MAGIC: [u8; 4] = [b'B', b'K', b'S', 0x01];

/// Current stream format version.
///
/// The reader rejects streams with a higher version.
pub const FORMAT_VERSION: u32 = 1;

/// Header size: magic(4) + version(4) + section_count(4).
pub const HEADER_SIZE: usize = 12;

/// Trailer size: crc32(4).
pub const TRAILER_SIZE: usize = 4;

/// Stable id of the board section.
pub const BOARD_SECTION_ID: &str = "board";

/// Stable id of the view section.
pub const VIEW_SECTION_ID: &str = "view";

/// Schema version of the view section payload.
pub const VIEW_SCHEMA_VERSION: u32 = 1;

/// What a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Board,
    View,
    Subwindow,
    /// Written by a newer version; skipped on read.
    Unknown(u8),
}

impl SectionKind {
    /// Wire tag of this kind.
    pub fn tag(self) -> u8 {
        match self {
            Self::Board => 0,
            Self::View => 1,
            Self::Subwindow => 2,
            Self::Unknown(tag) => tag,
        }
    }

    /// Kind for a wire tag.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::Board,
            1 => Self::View,
            2 => Self::Subwindow,
            other => Self::Unknown(other),
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::View => "view",
            Self::Subwindow => "subwindow",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Framing of one section, without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub kind: SectionKind,
    pub id: String,
    pub schema_version: u32,
    pub payload_len: usize,
}

/// Append one framed section to `out`.
pub(crate) fn write_section(
    out: &mut Vec<u8>,
    kind: SectionKind,
    id: &str,
    schema_version: u32,
    payload: &[u8],
) -> Result<()> {
    let id_len = u16::try_from(id.len()).map_err(|_| PersistenceError::InvalidFormat {
        reason: format!("section id '{id}' is too long"),
    })?;

    out.push(kind.tag());
    out.extend_from_slice(&id_len.to_le_bytes());
    out.extend_from_slice(id.as_bytes());
    out.extend_from_slice(&schema_version.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

/// Bounds-checked little-endian reader over a byte slice.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn take(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(PersistenceError::Truncated {
                context,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        Ok(self.take(1, context)?[0])
    }

    pub(crate) fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        let bytes = self.take(2, context)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        let bytes = self.take(4, context)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_u64(&mut self, context: &'static str) -> Result<u64> {
        let bytes = self.take(8, context)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_tags() {
        for kind in [SectionKind::Board, SectionKind::View, SectionKind::Subwindow] {
            assert_eq!(SectionKind::from_tag(kind.tag()), kind);
        }
        assert_eq!(SectionKind::from_tag(9), SectionKind::Unknown(9));
    }

    #[test]
    fn test_reader_reports_truncation() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(reader.read_u16("test").unwrap(), 0x0201);
        let err = reader.read_u32("payload length").unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Truncated {
                context: "payload length",
                needed: 4,
                available: 1
            }
        ));
    }

    #[test]
    fn test_write_section_layout() {
        let mut out = Vec::new();
        write_section(&mut out, SectionKind::Subwindow, "vias", 3, &[9, 9]).unwrap();

        assert_eq!(out[0], 2);
        assert_eq!(&out[1..3], &4u16.to_le_bytes());
        assert_eq!(&out[3..7], b"vias");
        assert_eq!(&out[7..11], &3u32.to_le_bytes());
        assert_eq!(&out[11..19], &2u64.to_le_bytes());
        assert_eq!(&out[19..], &[9, 9]);
    }
}
