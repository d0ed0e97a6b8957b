//! Persistence error types.
//!
//! Checkpoint and codec operations return [`PersistenceError`]; restoring
//! decoded state into a live session returns [`ApplyError`]. Both carry
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Checkpoint I/O or codec error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a session stream (bad magic, malformed section header).
    #[error("Invalid session stream: {reason}")]
    InvalidFormat { reason: String },

    /// Stream written by a newer format version.
    #[error("Session format version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion { found: u32, max_supported: u32 },

    /// Stream ended before a declared field or section did.
    #[error("Session stream truncated while reading {context}: needed {needed} bytes, {available} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    /// Trailer checksum does not match the stream content.
    #[error("Session stream checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// Mandatory sections missing or out of order.
    #[error("Unexpected section layout: {reason}")]
    SectionOrder { reason: String },

    /// Serialization error.
    #[error("Failed to serialize {section} section")]
    Serialization {
        section: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize {section} section")]
    Deserialization {
        section: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PersistenceError {
    /// Build an [`PersistenceError::Io`] for the given operation and path.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from decoding a stream rather than file I/O.
    pub fn is_codec_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::AtomicWriteFailed { .. })
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This session file was written by a newer version of the router \
                    (format version {}, this version reads up to {}).",
                    found, max_supported
                )
            }
            Self::InvalidFormat { .. }
            | Self::Truncated { .. }
            | Self::ChecksumMismatch { .. }
            | Self::SectionOrder { .. }
            | Self::Deserialization { .. } => {
                "The saved session could not be read. The file may be corrupted.".to_string()
            }
            Self::Serialization { .. } => {
                "An error occurred while writing the session data.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update the application.".into()),
            Self::Truncated { .. } | Self::ChecksumMismatch { .. } => {
                Some("Open the original design file instead.".into())
            }
            Self::InvalidFormat { .. }
            | Self::SectionOrder { .. }
            | Self::Serialization { .. }
            | Self::Deserialization { .. } => None,
        }
    }
}

/// Error restoring captured state into a live session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// Captured value doesn't fit the live session's current shape.
    #[error("Cannot restore {category}: {reason}")]
    Incompatible { category: String, reason: String },

    /// A section payload could not be decoded by its provider.
    #[error("Cannot decode {section} state: {reason}")]
    Decode { section: String, reason: String },

    /// The session is in the middle of an interactive operation.
    #[error("The session is busy with an interactive operation")]
    SessionBusy,

    /// Two providers registered under the same stable id.
    #[error("Duplicate state provider id: {id}")]
    DuplicateProvider { id: String },

    /// No snapshot with the given id.
    #[error("Unknown snapshot id {id}")]
    UnknownSnapshot { id: u64 },
}

impl ApplyError {
    /// Shorthand for [`ApplyError::Incompatible`].
    pub fn incompatible(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Incompatible {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ApplyError::Decode`].
    pub fn decode(section: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            section: section.into(),
            reason: reason.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Incompatible { category, .. } => {
                format!("The saved {category} settings no longer match this board and were skipped.")
            }
            Self::Decode { section, .. } => {
                format!("The saved state of '{section}' could not be read.")
            }
            Self::SessionBusy => {
                "Finish or cancel the current routing operation first.".to_string()
            }
            Self::DuplicateProvider { id } => {
                format!("Internal error: two panels are registered as '{id}'.")
            }
            Self::UnknownSnapshot { .. } => "The selected snapshot no longer exists.".to_string(),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
