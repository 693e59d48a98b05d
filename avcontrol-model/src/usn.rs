//! Unique Service Name identity type

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Identity of a discovered device or service
///
/// A USN is the `(uuid, urn)` pair announced over SSDP. Its raw form is
/// `uuid:<uuid>` for an untyped announcement or `uuid:<uuid>::<urn>` for a
/// typed one. The `uuid:` prefix is normalized away on construction, so
/// `UniqueServiceName::new("uuid:abc", ..)` and `UniqueServiceName::new("abc", ..)`
/// are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueServiceName {
    uuid: String,
    urn: String,
}

impl UniqueServiceName {
    /// Creates a USN from its parts, normalizing the uuid
    pub fn new(uuid: impl Into<String>, urn: impl Into<String>) -> Self {
        let uuid = uuid.into();
        let uuid = match uuid.strip_prefix("uuid:") {
            Some(stripped) => stripped.to_string(),
            None => uuid,
        };
        Self {
            uuid,
            urn: urn.into(),
        }
    }

    /// Parses the raw SSDP form
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidUsn` when the `uuid:` prefix is missing
    /// or the uuid part is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let body = raw
            .strip_prefix("uuid:")
            .ok_or_else(|| ModelError::InvalidUsn(raw.to_string()))?;

        let (uuid, urn) = body.split_once("::").unwrap_or((body, ""));
        if uuid.is_empty() {
            return Err(ModelError::InvalidUsn(raw.to_string()));
        }

        Ok(Self::new(uuid, urn))
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// True when the USN carries no type, i.e. an empty or `all` urn
    pub fn is_untyped(&self) -> bool {
        self.urn.is_empty() || self.urn == "all"
    }
}

impl fmt::Display for UniqueServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.urn.is_empty() {
            write!(f, "uuid:{}", self.uuid)
        } else {
            write!(f, "uuid:{}::{}", self.uuid, self.urn)
        }
    }
}

impl FromStr for UniqueServiceName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for UniqueServiceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UniqueServiceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const RENDERER_URN: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

    #[test]
    fn test_new_strips_uuid_prefix() {
        let a = UniqueServiceName::new("uuid:5f9ec1b3", RENDERER_URN);
        let b = UniqueServiceName::new("5f9ec1b3", RENDERER_URN);
        assert_eq!(a, b);
        assert_eq!(a.uuid(), "5f9ec1b3");
    }

    #[test]
    fn test_parse_typed() {
        let usn = UniqueServiceName::parse(&format!("uuid:5f9ec1b3::{}", RENDERER_URN)).unwrap();
        assert_eq!(usn.uuid(), "5f9ec1b3");
        assert_eq!(usn.urn(), RENDERER_URN);
        assert!(!usn.is_untyped());
    }

    #[test]
    fn test_parse_untyped() {
        let usn = UniqueServiceName::parse("uuid:5f9ec1b3").unwrap();
        assert_eq!(usn.urn(), "");
        assert!(usn.is_untyped());
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert!(matches!(
            UniqueServiceName::parse("5f9ec1b3::urn:x"),
            Err(ModelError::InvalidUsn(_))
        ));
        assert!(UniqueServiceName::parse("uuid:").is_err());
        assert!(UniqueServiceName::parse("uuid:::urn:x").is_err());
    }

    #[test]
    fn test_display_matches_raw_form() {
        let raw = format!("uuid:5f9ec1b3::{}", RENDERER_URN);
        assert_eq!(UniqueServiceName::parse(&raw).unwrap().to_string(), raw);
        assert_eq!(UniqueServiceName::new("abc", "").to_string(), "uuid:abc");
    }

    #[test]
    fn test_hash_key_by_pair() {
        let mut map = HashMap::new();
        map.insert(UniqueServiceName::new("abc", RENDERER_URN), 1);
        map.insert(UniqueServiceName::new("abc", "urn:other"), 2);
        map.insert(UniqueServiceName::new("uuid:abc", RENDERER_URN), 3);

        assert_eq!(map.len(), 2);
        assert_eq!(map[&UniqueServiceName::new("abc", RENDERER_URN)], 3);
    }

    #[test]
    fn test_serde_as_raw_string() {
        let usn = UniqueServiceName::new("abc", RENDERER_URN);
        let json = serde_json::to_string(&usn).unwrap();
        assert_eq!(json, format!("\"uuid:abc::{}\"", RENDERER_URN));

        let back: UniqueServiceName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, usn);

        assert!(serde_json::from_str::<UniqueServiceName>("\"bogus\"").is_err());
    }
}
