//! # avcontrol-player
//!
//! Event-driven playback controller for a single UPnP media renderer.
//!
//! The controller never guesses its state from the commands it sends. It
//! follows the `TransportState` reported by the renderer's AVTransport
//! events, polls the position once per interval while playing, and reports
//! `PlaybackEnded` when the renderer stops within the end-of-media tolerance
//! of the track's end.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use avcontrol_player::{MediaRenderer, PlaybackController, PlayerConfig, PlayerEvent};
//!
//! let controller = PlaybackController::new(PlayerConfig::default())?;
//! let mut events = controller.subscribe();
//!
//! controller.set_renderer(Some(MediaRenderer::new(device, transport)));
//! controller.start_playback("http://192.168.1.10:8200/MediaItems/22.mp4");
//!
//! while let Some(event) = events.recv().await {
//!     if event == PlayerEvent::PlaybackEnded {
//!         break;
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
mod poller;
pub mod state;
pub mod transport;

pub use config::PlayerConfig;
pub use controller::PlaybackController;
pub use error::{PlayerError, Result, TransportAction, TransportError};
pub use event::{PlayerEvent, PlayerEvents};
pub use state::PlayerState;
pub use transport::{
    AvTransport, EventCallback, EventSubscription, MediaRenderer, PositionInfo,
    SubscriptionHandle,
};
