//! Construction of typed entities from discovery or archive data

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::entity::{Device, DiscoveredEntity, Service};
use crate::error::{ModelError, Result};
use crate::kind::{DeviceKind, ServiceKind};
use crate::record::DiscoveryRecord;
use crate::usn::UniqueServiceName;

/// Metadata key used to carry a device's friendly name through an archive
pub const FRIENDLY_NAME_KEY: &str = "friendlyName";

/// Maps URNs to concrete entity variants
///
/// Discovery-time construction returns `None` for anything it cannot
/// model (unknown type, missing fields, bad location), because partial SSDP
/// advertisements are routine. Archive-time construction reports why.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityFactory;

impl EntityFactory {
    pub fn new() -> Self {
        Self
    }

    /// Builds a device from a snapshot record, or `None` if it cannot be modelled
    pub fn create_device(&self, record: &DiscoveryRecord) -> Option<Device> {
        let usn = record.usn()?;
        let description_url = parse_location(record.location.as_deref()?)?;
        self.device_from_parts(usn, description_url)
    }

    /// Builds a service from a snapshot record, or `None` if it cannot be modelled
    pub fn create_service(&self, record: &DiscoveryRecord) -> Option<Service> {
        let usn = record.usn()?;
        let description_url = parse_location(record.location.as_deref()?)?;
        self.service_from_parts(usn, description_url)
    }

    pub fn device_from_parts(&self, usn: UniqueServiceName, description_url: Url) -> Option<Device> {
        let Some((kind, version)) = DeviceKind::from_urn(usn.urn()) else {
            debug!("Skipping device {} with unsupported type", usn);
            return None;
        };

        Some(Device {
            usn,
            description_url,
            friendly_name: String::new(),
            kind,
            version,
        })
    }

    pub fn service_from_parts(&self, usn: UniqueServiceName, description_url: Url) -> Option<Service> {
        let Some((kind, version)) = ServiceKind::from_urn(usn.urn()) else {
            debug!("Skipping service {} with unsupported type", usn);
            return None;
        };

        Some(Service {
            usn,
            description_url,
            kind,
            version,
        })
    }

    /// Rebuilds an entity from archived identity and metadata
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownDeviceOrServiceType` when the USN's urn
    /// names neither a supported device nor a supported service.
    pub fn restore_entity(
        &self,
        usn: UniqueServiceName,
        description_url: Url,
        metadata: &HashMap<String, String>,
    ) -> Result<DiscoveredEntity> {
        if DeviceKind::from_urn(usn.urn()).is_some() {
            if let Some(mut device) = self.device_from_parts(usn.clone(), description_url.clone()) {
                if let Some(name) = metadata.get(FRIENDLY_NAME_KEY) {
                    device.friendly_name = name.clone();
                }
                return Ok(DiscoveredEntity::Device(device));
            }
        }

        self.service_from_parts(usn.clone(), description_url)
            .map(DiscoveredEntity::Service)
            .ok_or_else(|| ModelError::UnknownDeviceOrServiceType(usn.urn().to_string()))
    }
}

fn parse_location(location: &str) -> Option<Url> {
    match Url::parse(location) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!("Ignoring record with invalid location '{}': {}", location, e);
            None
        }
    }
}

/// Parses a description URL, reporting the failure
pub fn parse_description_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ModelError::InvalidDescriptionUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
