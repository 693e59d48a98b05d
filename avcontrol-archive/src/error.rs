use std::path::PathBuf;

use thiserror::Error;

/// Errors affecting a whole archive blob
///
/// A single unreadable record inside an otherwise valid archive is not an
/// error; it is counted and skipped.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The records could not be encoded
    #[error("Failed to serialize archive: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The blob is not a versioned record list
    #[error("Invalid archive envelope: {0}")]
    Envelope(String),

    /// The blob was written by an incompatible version
    #[error("Unsupported archive version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The store failed to load or save the blob
    #[error("Archive store error at {path:?}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No storage location could be determined for the file store
    #[error("No cache directory available for the archive store")]
    NoStoreLocation,
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
