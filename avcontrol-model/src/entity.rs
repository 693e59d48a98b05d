//! Typed device and service entities

use serde::{Deserialize, Serialize};
use url::Url;

use crate::kind::{DeviceKind, ServiceKind};
use crate::usn::UniqueServiceName;

/// Resolves a device from a USN without holding a reference to it
///
/// Services use this to find their owning device. Implementations should
/// match the exact USN first and fall back to the device sharing the uuid,
/// since a service USN carries the service type rather than the device type.
pub trait DeviceLookup: Send + Sync {
    fn lookup_device(&self, usn: &UniqueServiceName) -> Option<Device>;
}

/// A discovered root device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub usn: UniqueServiceName,
    pub description_url: Url,
    /// Human readable name; empty until populated from a description or archive
    pub friendly_name: String,
    pub kind: DeviceKind,
    pub version: u32,
}

impl Device {
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    pub fn is_media_renderer(&self) -> bool {
        self.kind == DeviceKind::MediaRenderer
    }

    pub fn is_media_server(&self) -> bool {
        self.kind == DeviceKind::MediaServer
    }

    /// Concrete type name, e.g. `MediaRenderer1Device`
    pub fn class_name(&self) -> String {
        format!("{}{}Device", self.kind.type_name(), self.version)
    }
}

/// A discovered root service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub usn: UniqueServiceName,
    pub description_url: Url,
    pub kind: ServiceKind,
    pub version: u32,
}

impl Service {
    /// Owning device, resolved through `lookup`
    pub fn device(&self, lookup: &dyn DeviceLookup) -> Option<Device> {
        lookup.lookup_device(&self.usn)
    }

    /// Friendly name of the owning device
    pub fn friendly_name(&self, lookup: &dyn DeviceLookup) -> Option<String> {
        self.device(lookup).map(|device| device.friendly_name)
    }

    /// Concrete type name, e.g. `AVTransport1Service`
    pub fn class_name(&self) -> String {
        format!("{}{}Service", self.kind.type_name(), self.version)
    }
}

/// Either kind of discovered entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveredEntity {
    Device(Device),
    Service(Service),
}

impl DiscoveredEntity {
    pub fn usn(&self) -> &UniqueServiceName {
        match self {
            DiscoveredEntity::Device(device) => &device.usn,
            DiscoveredEntity::Service(service) => &service.usn,
        }
    }

    pub fn description_url(&self) -> &Url {
        match self {
            DiscoveredEntity::Device(device) => &device.description_url,
            DiscoveredEntity::Service(service) => &service.description_url,
        }
    }

    pub fn class_name(&self) -> String {
        match self {
            DiscoveredEntity::Device(device) => device.class_name(),
            DiscoveredEntity::Service(service) => service.class_name(),
        }
    }

    pub fn as_device(&self) -> Option<&Device> {
        match self {
            DiscoveredEntity::Device(device) => Some(device),
            DiscoveredEntity::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&Service> {
        match self {
            DiscoveredEntity::Service(service) => Some(service),
            DiscoveredEntity::Device(_) => None,
        }
    }
}

impl From<Device> for DiscoveredEntity {
    fn from(device: Device) -> Self {
        DiscoveredEntity::Device(device)
    }
}

impl From<Service> for DiscoveredEntity {
    fn from(service: Service) -> Self {
        DiscoveredEntity::Service(service)
    }
}
