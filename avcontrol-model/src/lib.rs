//! # avcontrol-model
//!
//! Identity and entity types shared by every avcontrol crate.
//!
//! - [`UniqueServiceName`]: the `(uuid, urn)` key used for every device and service
//! - [`Device`], [`Service`], [`DiscoveredEntity`]: closed set of modelled entities
//! - [`EntityFactory`]: URN to entity variant mapping, used by both discovery and
//!   archive restore so the two paths produce identical types
//! - [`DiscoveryRecord`]: raw snapshot entry produced by the SSDP collaborator
//!
//! ```rust
//! use avcontrol_model::{DiscoveryRecord, EntityFactory};
//!
//! let record = DiscoveryRecord::device(
//!     "uuid:4d696e69-444c-164e-9d41-b827eb1a2c3d",
//!     "urn:schemas-upnp-org:device:MediaRenderer:1",
//!     "http://192.168.1.20:49152/description.xml",
//! );
//! let device = EntityFactory::new().create_device(&record).unwrap();
//! assert!(device.is_media_renderer());
//! ```

pub mod entity;
pub mod error;
pub mod factory;
pub mod kind;
pub mod record;
pub mod usn;

pub use entity::{Device, DeviceLookup, DiscoveredEntity, Service};
pub use error::{ModelError, Result};
pub use factory::{parse_description_url, EntityFactory, FRIENDLY_NAME_KEY};
pub use kind::{DeviceKind, ServiceKind};
pub use record::DiscoveryRecord;
pub use usn::UniqueServiceName;

// Re-exported so downstream crates share one `Url` type
pub use url::Url;
