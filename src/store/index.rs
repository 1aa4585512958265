//! Uniqueness indexes over record keys

use std::collections::HashMap;
use std::hash::Hash;

use crate::service::error::{AccessControlError, AccessControlResult};
use crate::types::EntityKind;

/// Maps a unique string field (uid, name, username) to the owning record id
#[derive(Debug, Clone)]
pub(crate) struct UniqueIndex<Id> {
    kind: EntityKind,
    field: &'static str,
    entries: HashMap<String, Id>,
}

impl<Id: Copy + Eq + Hash> UniqueIndex<Id> {
    pub(crate) fn new(kind: EntityKind, field: &'static str) -> Self {
        Self { kind, field, entries: HashMap::new() }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Id> {
        self.entries.get(key).copied()
    }

    /// Fail with a duplicate key error if `key` belongs to a record other than `owner`
    pub(crate) fn ensure_available(&self, key: &str, owner: Option<Id>) -> AccessControlResult<()> {
        match self.entries.get(key) {
            Some(existing) if Some(*existing) != owner => {
                Err(AccessControlError::duplicate(self.kind, self.field, key))
            }
            _ => Ok(()),
        }
    }

    /// Insert a key that has already been checked with [`Self::ensure_available`]
    pub(crate) fn insert(&mut self, key: String, id: Id) {
        self.entries.insert(key, id);
    }

    /// Insert a key, failing if it is already taken
    pub(crate) fn try_insert(&mut self, key: String, id: Id) -> AccessControlResult<()> {
        self.ensure_available(&key, Some(id))?;
        self.entries.insert(key, id);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Move `id` from `old_key` to `new_key`
    pub(crate) fn rename(&mut self, old_key: &str, new_key: String, id: Id) {
        if old_key != new_key {
            self.entries.remove(old_key);
            self.entries.insert(new_key, id);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorId;

    #[test]
    fn test_duplicate_detection() {
        let mut index = UniqueIndex::new(EntityKind::Sensor, "uid");
        let first = SensorId::new();
        index.insert("RFID-1".to_string(), first);

        assert!(index.ensure_available("RFID-1", Some(first)).is_ok());
        assert!(index.ensure_available("RFID-2", None).is_ok());

        let error = index.ensure_available("RFID-1", None).unwrap_err();
        assert!(matches!(error, AccessControlError::DuplicateKey { field: "uid", .. }));
    }

    #[test]
    fn test_rename_moves_key() {
        let mut index = UniqueIndex::new(EntityKind::Barrier, "name");
        let id = crate::types::BarrierId::new();
        index.insert("Gate".to_string(), id);
        index.rename("Gate", "North Gate".to_string(), id);

        assert_eq!(index.get("Gate"), None);
        assert_eq!(index.get("North Gate"), Some(id));
    }
}
