use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A scanned file resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    pub path: String,
    pub uuid: Uuid,
}

/// A directory surfaced as one collection on the device.
#[derive(Debug, Clone)]
pub struct Collection {
    pub uuid: Uuid,
    pub name: String,
    /// Set when the identity marker was written during this scan.
    pub fresh_identity: bool,
    pub entries: Vec<CollectionEntry>,
}

impl Collection {
    pub fn new(uuid: Uuid, name: impl Into<String>, fresh_identity: bool) -> Self {
        Self {
            uuid,
            name: name.into(),
            fresh_identity,
            entries: Vec::new(),
        }
    }

    /// Append an entry in discovery order. Returns false when an entry with
    /// the same UUID is already a member.
    pub fn add_entry(&mut self, entry: CollectionEntry) -> bool {
        if self.entries.iter().any(|existing| existing.uuid == entry.uuid) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn member_uuids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|entry| entry.uuid).collect()
    }
}

/// Collections of a single scan keyed by absolute directory path.
pub type CollectionMap = BTreeMap<PathBuf, Collection>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_entry_rejects_duplicate_uuid() {
        let mut collection = Collection::new(Uuid::new_v4(), "Foo", true);
        let uuid = Uuid::new_v4();

        assert!(collection.add_entry(CollectionEntry {
            path: "/docs/Foo/a.mobi".to_string(),
            uuid,
        }));
        assert!(!collection.add_entry(CollectionEntry {
            path: "/docs/Foo/b.mobi".to_string(),
            uuid,
        }));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.member_uuids(), vec![uuid]);
    }
}
