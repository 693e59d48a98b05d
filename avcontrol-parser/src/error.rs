//! Error types for event decoding

use thiserror::Error;

/// Errors that can occur while decoding an event body
///
/// All of these are recoverable: the caller drops the event and keeps the
/// state it decoded last.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The outer property-set document is not well formed
    #[error("Malformed event document: {0}")]
    MalformedEvent(String),

    /// The property set carries no `LastChange` property
    #[error("No LastChange element in event document")]
    MissingLastChange,

    /// The embedded `LastChange` document could not be parsed
    #[error("Malformed LastChange document: {0}")]
    MalformedLastChange(String),
}

/// Result type alias for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;
