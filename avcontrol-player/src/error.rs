//! Error types for the playback controller

use std::fmt;

use thiserror::Error;

use crate::state::PlayerState;

/// Failure reported by the transport collaborator for one action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// UPnP fault returned by the renderer
    #[error("UPnP fault: error code {0}")]
    Fault(u16),

    /// Any other collaborator failure
    #[error("Transport error: {0}")]
    Other(String),
}

/// AVTransport actions the controller issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    SetAVTransportURI,
    SetNextAVTransportURI,
    Play,
    Pause,
    Stop,
    GetPositionInfo,
}

impl TransportAction {
    /// UPnP action name
    pub fn name(&self) -> &'static str {
        match self {
            TransportAction::SetAVTransportURI => "SetAVTransportURI",
            TransportAction::SetNextAVTransportURI => "SetNextAVTransportURI",
            TransportAction::Play => "Play",
            TransportAction::Pause => "Pause",
            TransportAction::Stop => "Stop",
            TransportAction::GetPositionInfo => "GetPositionInfo",
        }
    }
}

impl fmt::Display for TransportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors surfaced by the playback controller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// The renderer rejected or failed an action
    #[error("{action} failed: {source}")]
    TransportActionFailed {
        action: TransportAction,
        #[source]
        source: TransportError,
    },

    /// The command is not defined for the current state
    #[error("{command} cannot be used while {state:?}")]
    InvalidCommandForState {
        command: &'static str,
        state: PlayerState,
    },

    /// A command was issued with no renderer attached
    #[error("No media renderer selected")]
    NoRenderer,

    /// The controller was constructed outside a tokio runtime
    #[error("Playback controller requires a tokio runtime")]
    NoRuntime,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for playback controller operations
pub type Result<T> = std::result::Result<T, PlayerError>;
