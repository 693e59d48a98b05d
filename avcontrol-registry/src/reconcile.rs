//! Set reconciliation of one table against a snapshot

use std::collections::{HashMap, HashSet};

use avcontrol_model::{DiscoveryRecord, UniqueServiceName};

use crate::event::TableSummary;

/// Entities removed and added by one pass, in emission order
#[derive(Debug)]
pub(crate) struct Diff<E> {
    pub removed: Vec<E>,
    pub added: Vec<E>,
    pub kept: usize,
}

impl<E> Diff<E> {
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            added: self.added.len(),
            kept: self.kept,
            removed: self.removed.len(),
        }
    }
}

/// Reconciles `table` against the records of one snapshot
///
/// Records already in the table are kept untouched. New USNs are built with
/// `build`, which returns `None` for anything it cannot model. Every entry
/// not kept is removed. Removals are applied before additions. Records
/// without a uuid or urn are ignored.
pub(crate) fn reconcile<'a, E, I, F>(
    table: &mut HashMap<UniqueServiceName, E>,
    records: I,
    build: F,
) -> Diff<E>
where
    E: Clone,
    I: IntoIterator<Item = &'a DiscoveryRecord>,
    F: Fn(&DiscoveryRecord) -> Option<E>,
{
    let mut kept = HashSet::new();
    let mut to_add: Vec<(UniqueServiceName, E)> = Vec::new();
    let mut pending = HashSet::new();

    for record in records {
        let Some(usn) = record.usn() else {
            continue;
        };

        if table.contains_key(&usn) {
            kept.insert(usn);
        } else if !pending.contains(&usn) {
            if let Some(entity) = build(record) {
                pending.insert(usn.clone());
                to_add.push((usn, entity));
            }
        }
    }

    let mut stale: Vec<UniqueServiceName> = table
        .keys()
        .filter(|usn| !kept.contains(*usn))
        .cloned()
        .collect();
    stale.sort();

    let removed = stale
        .into_iter()
        .filter_map(|usn| table.remove(&usn))
        .collect();

    let added = to_add
        .into_iter()
        .map(|(usn, entity)| {
            table.insert(usn, entity.clone());
            entity
        })
        .collect();

    Diff {
        removed,
        added,
        kept: kept.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uuid: &str) -> DiscoveryRecord {
        DiscoveryRecord::device(uuid, "urn:t:device:X:1", "http://h/d.xml")
    }

    fn build(record: &DiscoveryRecord) -> Option<String> {
        record.uuid.clone().filter(|uuid| !uuid.starts_with("skip"))
    }

    #[test]
    fn test_add_keep_remove() {
        let mut table = HashMap::new();

        let first = reconcile(&mut table, &[record("a"), record("b")], build);
        assert_eq!(first.added, vec!["a".to_string(), "b".to_string()]);
        assert!(first.removed.is_empty());

        let second = reconcile(&mut table, &[record("b"), record("c")], build);
        assert_eq!(second.removed, vec!["a".to_string()]);
        assert_eq!(second.added, vec!["c".to_string()]);
        assert_eq!(second.kept, 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unbuildable_and_incomplete_records_are_ignored() {
        let mut table = HashMap::new();
        let incomplete = DiscoveryRecord {
            uuid: Some("x".to_string()),
            is_device: true,
            ..Default::default()
        };

        let diff = reconcile(&mut table, &[record("skip-me"), incomplete], build);
        assert!(diff.added.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_records_add_once() {
        let mut table = HashMap::new();
        let diff = reconcile(&mut table, &[record("a"), record("a")], build);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.summary().added, 1);
    }
}
