//! # avcontrol-registry
//!
//! Concurrency-safe table of discovered UPnP media devices and services.
//!
//! The SSDP collaborator delivers a full snapshot of what it currently sees on
//! every tick. [`Registry::on_snapshot_update`] reconciles that snapshot into
//! stable add/keep/remove sets and broadcasts the differences to every
//! subscriber of [`Registry::subscribe_devices`] and
//! [`Registry::subscribe_services`].

pub mod discovery;
pub mod error;
pub mod event;
pub mod iter;
mod reconcile;
pub mod registry;

pub use discovery::{DiscoverySource, SnapshotObserver};
pub use error::{DiscoveryError, RegistryError, Result};
pub use event::{DeviceEvent, ReconcileSummary, ServiceEvent, TableSummary};
pub use iter::{Notifications, TimeoutIter, TryIter};
pub use registry::Registry;
