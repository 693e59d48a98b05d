//! # avcontrol-sdk
//!
//! A UPnP/DLNA media control point: find media servers and renderers on the
//! local network, drive playback on one renderer, and warm-start the next
//! session from an archive of what was last seen.
//!
//! [`ControlPoint`] wires the pieces together:
//!
//! - [`Registry`]: reconciles discovery snapshots into device/service tables
//! - [`PlaybackController`]: event-driven playback state machine
//! - [`ArchiveStore`]: persistence for the warm-start archive
//!
//! Network transport (SSDP, SOAP, GENA) is supplied by the application
//! through [`DiscoverySource`], [`SnapshotObserver`] and [`TransportProvider`].

pub mod config;
mod control_point;
mod error;
pub mod logging;

pub use config::{ControlPointConfig, DEFAULT_ARCHIVE_KEY};
pub use control_point::{ControlPoint, ControlPointBuilder, RestoreSummary, TransportProvider};
pub use error::{Result, SdkError};

// Re-export the component crates' public types
pub use avcontrol_archive::{ArchiveStore, FileArchiveStore, MemoryArchiveStore};
pub use avcontrol_model::{
    Device, DeviceKind, DiscoveredEntity, DiscoveryRecord, EntityFactory, Service, ServiceKind,
    UniqueServiceName,
};
pub use avcontrol_parser::{decode_av_transport, decode_rendering_control, TrackMetadata};
pub use avcontrol_player::{
    AvTransport, MediaRenderer, PlaybackController, PlayerConfig, PlayerEvent, PlayerEvents,
    PlayerState,
};
pub use avcontrol_registry::{
    DeviceEvent, DiscoveryError, DiscoverySource, Registry, ServiceEvent, SnapshotObserver,
};
