//! Versioned JSON encoding of archived records
//!
//! ```json
//! { "version": 1, "records": [ { "usn": "...", "description_url": "...", "custom_metadata": {} } ] }
//! ```

use std::collections::HashMap;

use avcontrol_model::{DiscoveredEntity, EntityFactory};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ArchiveError, Result};
use crate::record::ArchivedRecord;

/// Format version written by [`serialize`]
pub const ARCHIVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    records: &'a [ArchivedRecord],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

/// Records read back from an archive blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedArchive {
    pub records: Vec<ArchivedRecord>,
    /// Entries that were present but unreadable
    pub corrupt: usize,
}

/// Entities rebuilt from archived records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restored {
    pub entities: Vec<DiscoveredEntity>,
    /// Records that could not be turned into an entity
    pub skipped: usize,
}

/// Encodes `entities` with the metadata `metadata_fn` chooses for each
pub fn serialize<'a, I, F>(entities: I, metadata_fn: F) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a DiscoveredEntity>,
    F: Fn(&DiscoveredEntity) -> HashMap<String, String>,
{
    let records: Vec<ArchivedRecord> = entities
        .into_iter()
        .map(|entity| ArchivedRecord::from_entity(entity, metadata_fn(entity)))
        .collect();

    encode_records(&records)
}

/// Encodes already-built records
pub fn encode_records(records: &[ArchivedRecord]) -> Result<Vec<u8>> {
    let envelope = EnvelopeOut {
        version: ARCHIVE_VERSION,
        records,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decodes an archive blob
///
/// # Errors
///
/// Fails only when the envelope itself is unreadable or has another
/// version. Unreadable records are counted in `corrupt`.
pub fn deserialize(bytes: &[u8]) -> Result<DecodedArchive> {
    let envelope: EnvelopeIn =
        serde_json::from_slice(bytes).map_err(|e| ArchiveError::Envelope(e.to_string()))?;

    if envelope.version != ARCHIVE_VERSION {
        return Err(ArchiveError::UnsupportedVersion {
            found: envelope.version,
            expected: ARCHIVE_VERSION,
        });
    }

    let mut decoded = DecodedArchive::default();
    for (index, value) in envelope.records.into_iter().enumerate() {
        match serde_json::from_value::<ArchivedRecord>(value) {
            Ok(record) => decoded.records.push(record),
            Err(e) => {
                warn!("Skipping corrupt archive record {}: {}", index, e);
                decoded.corrupt += 1;
            }
        }
    }

    debug!(
        "Decoded archive with {} records ({} corrupt)",
        decoded.records.len(),
        decoded.corrupt
    );
    Ok(decoded)
}

/// Rebuilds entities, skipping records the factory cannot model
pub fn reconstruct(records: &[ArchivedRecord], factory: &EntityFactory) -> Restored {
    let mut restored = Restored::default();

    for record in records {
        match record.to_entity(factory) {
            Ok(entity) => restored.entities.push(entity),
            Err(e) => {
                warn!("Skipping archived record {}: {}", record.usn, e);
                restored.skipped += 1;
            }
        }
    }

    restored
}

/// Decodes a blob and rebuilds its entities in one step
///
/// Corrupt records count towards `skipped`.
pub fn restore(bytes: &[u8], factory: &EntityFactory) -> Result<Restored> {
    let decoded = deserialize(bytes)?;
    let mut restored = reconstruct(&decoded.records, factory);
    restored.skipped += decoded.corrupt;
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_empty_archive() {
        let bytes = serialize(&Vec::<DiscoveredEntity>::new(), |_| HashMap::new()).unwrap();
        assert_eq!(bytes, br#"{"version":1,"records":[]}"#.to_vec());
        assert_eq!(deserialize(&bytes).unwrap(), DecodedArchive::default());
    }

    #[rstest]
    #[case(b"not json".as_slice())]
    #[case(br#"{"records":[]}"#.as_slice())]
    #[case(br#"[1,2,3]"#.as_slice())]
    fn test_invalid_envelope(#[case] bytes: &[u8]) {
        assert!(matches!(deserialize(bytes), Err(ArchiveError::Envelope(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let result = deserialize(br#"{"version":2,"records":[]}"#);
        assert!(matches!(
            result,
            Err(ArchiveError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_corrupt_records_are_counted() {
        let bytes = br#"{"version":1,"records":[
            {"usn":"uuid:tv::urn:schemas-upnp-org:device:MediaRenderer:1","description_url":"http://h/d.xml"},
            {"usn":"no-uuid-prefix","description_url":"http://h/d.xml"},
            {"usn":"uuid:x","description_url":"not a url"},
            42
        ]}"#;

        let decoded = deserialize(bytes).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.corrupt, 3);

        let restored = restore(bytes, &EntityFactory::new()).unwrap();
        assert_eq!(restored.entities.len(), 1);
        assert_eq!(restored.skipped, 3);
    }
}
