//! Player state enumeration

/// Playback state of the attached renderer as last reported by its events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Reported a transport state the controller does not map
    Unknown,
    /// Stopped, or nothing loaded
    #[default]
    Stopped,
    /// Currently playing
    Playing,
    /// Playback is paused
    Paused,
}

impl PlayerState {
    /// Maps an AVTransport `TransportState` value
    ///
    /// Matching is by case-insensitive substring, so vendor variants like
    /// `PAUSED_PLAYBACK` or `PAUSED_RECORDING` map to `Paused`. Anything
    /// else (`TRANSITIONING`, `NO_MEDIA_PRESENT`) is `Unknown`.
    pub fn from_transport_state(state: &str) -> Self {
        let state = state.to_lowercase();
        if state.contains("playing") {
            PlayerState::Playing
        } else if state.contains("paused") {
            PlayerState::Paused
        } else if state.contains("stopped") {
            PlayerState::Stopped
        } else {
            PlayerState::Unknown
        }
    }
}
