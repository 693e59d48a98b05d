//! Error types for the entity model

use thiserror::Error;

/// Errors raised while building identities or entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The raw USN string is not of the form `uuid:<uuid>[::<urn>]`
    #[error("Invalid unique service name: {0}")]
    InvalidUsn(String),

    /// The description URL could not be parsed
    #[error("Invalid description URL '{url}': {reason}")]
    InvalidDescriptionUrl { url: String, reason: String },

    /// The URN does not name a device or service type this crate models
    #[error("Unknown device or service type: {0}")]
    UnknownDeviceOrServiceType(String),
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
