use thiserror::Error;

/// Errors that can occur in the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A discovery operation was requested but no discovery source is attached
    #[error("No discovery source attached to the registry")]
    DiscoveryUnavailable,

    /// The discovery source failed to carry out a request
    #[error("Discovery {operation} failed: {source}")]
    Discovery {
        operation: &'static str,
        #[source]
        source: DiscoveryError,
    },

    /// The snapshot listener thread could not be spawned
    #[error("Failed to spawn snapshot listener: {0}")]
    ListenerSpawn(#[from] std::io::Error),
}

/// Failure reported by the discovery collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The SSDP socket could not be bound, joined or written
    #[error("SSDP socket error: {0}")]
    Socket(String),

    /// The engine must be started before this request
    #[error("Discovery engine is not running")]
    NotRunning,

    /// Any other engine failure
    #[error("Discovery engine error: {0}")]
    Other(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
