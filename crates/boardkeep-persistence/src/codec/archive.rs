//! rkyv helpers for section payloads.
//!
//! Section payloads sit at arbitrary offsets inside a stream, so they are
//! copied into an aligned buffer before validation.

use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;

use crate::error::{PersistenceError, Result};

/// Serialize a value into an rkyv archive.
pub fn to_archive<T>(value: &T, section: &str) -> Result<Vec<u8>>
where
    T: for<'a> rkyv::Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, rancor::Error>>,
{
    let bytes = rkyv::to_bytes::<rancor::Error>(value).map_err(|e| {
        PersistenceError::Serialization {
            section: section.to_string(),
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;
    Ok(bytes.to_vec())
}

/// Validate and deserialize an rkyv archive.
pub fn from_archive<T>(bytes: &[u8], section: &str) -> Result<T>
where
    T: rkyv::Archive,
    T::Archived: for<'a> CheckBytes<HighValidator<'a, rancor::Error>>
        + rkyv::Deserialize<T, HighDeserializer<rancor::Error>>,
{
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    rkyv::from_bytes::<T, rancor::Error>(&aligned).map_err(|e| {
        PersistenceError::Deserialization {
            section: section.to_string(),
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        }
    })
}
