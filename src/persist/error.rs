//! Persistence error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Encoding the state failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding stored bytes failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Stored envelope was written by an unsupported format version
    #[error("Unsupported envelope version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Stored envelope was written under a different key
    #[error("Envelope key mismatch: expected '{expected}', found '{found}'")]
    KeyMismatch { expected: String, found: String },

    /// Storage key cannot be used by the backend
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Backend I/O failed
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
