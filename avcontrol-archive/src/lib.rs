//! # avcontrol-archive
//!
//! Warm-start archive for discovered devices and services.
//!
//! An archive keeps just enough of each entity (its USN, description URL and
//! caller-chosen metadata) to rebuild it on the next start without waiting
//! for discovery. Rebuilding goes through the same
//! [`EntityFactory`](avcontrol_model::EntityFactory) as discovery, so restored
//! entities have the same types as freshly discovered ones.
//!
//! ```rust
//! use std::collections::HashMap;
//! use avcontrol_archive::{deserialize, reconstruct, serialize};
//! use avcontrol_model::{DiscoveryRecord, DeviceKind, DiscoveredEntity, EntityFactory};
//!
//! let factory = EntityFactory::new();
//! let record = DiscoveryRecord::device(
//!     "renderer-1",
//!     DeviceKind::MediaRenderer.urn(1),
//!     "http://192.168.1.20:49152/description.xml",
//! );
//! let entities = vec![DiscoveredEntity::from(factory.create_device(&record).unwrap())];
//!
//! let bytes = serialize(&entities, |_| HashMap::new()).unwrap();
//! let decoded = deserialize(&bytes).unwrap();
//! let restored = reconstruct(&decoded.records, &factory);
//! assert_eq!(restored.entities, entities);
//! ```

pub mod codec;
pub mod error;
pub mod record;
pub mod store;

pub use codec::{
    deserialize, encode_records, reconstruct, restore, serialize, DecodedArchive, Restored,
    ARCHIVE_VERSION,
};
pub use error::{ArchiveError, Result};
pub use record::ArchivedRecord;
pub use store::{default_archive_dir, ArchiveStore, FileArchiveStore, MemoryArchiveStore};
