//! Raw discovery records delivered by the SSDP collaborator

use crate::usn::UniqueServiceName;

/// One entry of a discovery snapshot
///
/// Mirrors what an SSDP cache knows about an announcement. Any field may be
/// missing on a partial or malformed advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryRecord {
    pub uuid: Option<String>,
    pub urn: Option<String>,
    /// `LOCATION` header, the URL of the description document
    pub location: Option<String>,
    pub is_device: bool,
    pub is_service: bool,
}

impl DiscoveryRecord {
    /// A complete device announcement
    pub fn device(uuid: impl Into<String>, urn: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            urn: Some(urn.into()),
            location: Some(location.into()),
            is_device: true,
            is_service: false,
        }
    }

    /// A complete service announcement
    pub fn service(uuid: impl Into<String>, urn: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            urn: Some(urn.into()),
            location: Some(location.into()),
            is_device: false,
            is_service: true,
        }
    }

    /// USN of the record, if both uuid and urn are present
    pub fn usn(&self) -> Option<UniqueServiceName> {
        match (&self.uuid, &self.urn) {
            (Some(uuid), Some(urn)) => Some(UniqueServiceName::new(uuid.as_str(), urn.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usn_requires_uuid_and_urn() {
        let record = DiscoveryRecord::device("uuid:abc", "urn:x:device:MediaServer:1", "http://h/d.xml");
        assert_eq!(record.usn(), Some(UniqueServiceName::new("abc", "urn:x:device:MediaServer:1")));

        let partial = DiscoveryRecord {
            uuid: Some("abc".to_string()),
            is_device: true,
            ..Default::default()
        };
        assert_eq!(partial.usn(), None);
    }
}
