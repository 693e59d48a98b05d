//! # avcontrol-parser
//!
//! Decoder for the `LastChange` events sent by UPnP AVTransport and
//! RenderingControl services.
//!
//! ## Usage
//!
//! ```rust
//! use avcontrol_parser::{decode_av_transport, TrackMetadata};
//!
//! let body = br#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><LastChange>&lt;Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"&gt;&lt;InstanceID val="0"&gt;&lt;TransportState val="PLAYING"/&gt;&lt;/InstanceID&gt;&lt;/Event&gt;</LastChange></e:property></e:propertyset>"#;
//!
//! let state = decode_av_transport(body).unwrap();
//! assert_eq!(state.transport_state(), Some("PLAYING"));
//! assert!(TrackMetadata::from_instance_state(&state).is_none());
//! ```

pub mod didl;
pub mod error;
pub mod last_change;
pub mod state;
pub mod time;
pub mod xml_decode;

pub use didl::{TrackMetadata, CURRENT_TRACK_METADATA};
pub use error::{DecodeError, DecodeResult};
pub use last_change::{
    decode, decode_av_transport, decode_last_change, decode_metadata, decode_rendering_control,
    EventFamily, DIDL_LITE_NAMESPACE,
};
pub use state::{InstanceState, StateValue, TRANSPORT_STATE};
pub use time::parse_duration_secs;
