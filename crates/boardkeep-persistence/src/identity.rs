//! Content-addressed identity of a design file.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{PersistenceError, Result};

/// CRC-32 of a design file's bytes.
///
/// Identical content always yields the same identity, so re-opening the same
/// design reuses its recovery checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChecksumIdentity(u32);

impl ChecksumIdentity {
    /// Wrap a raw checksum value.
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    /// Compute the identity of a file.
    ///
    /// Uses buffered reading for efficient processing of large files. A read
    /// failure is reported; there is no fallback identity.
    pub fn compute(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PersistenceError::io("read", path, e))?;

        let mut reader = BufReader::new(file);
        let mut hasher = crc32fast::Hasher::new();
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| PersistenceError::io("read", path, e))?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
        }

        let identity = Self(hasher.finalize());
        tracing::debug!("Identity of {} is {}", path.display(), identity);
        Ok(identity)
    }

    /// Identity of an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(crc32fast::hash(bytes))
    }

    /// Raw checksum value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Lowercase hex rendering without padding.
    pub fn to_hex(self) -> String {
        format!("{:x}", self.0)
    }

    /// Parse the hex rendering produced by [`to_hex`](Self::to_hex).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.is_empty() || hex.len() > 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for ChecksumIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
