//! In-memory object store with JSON snapshots.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DesignObjectStore;
use crate::association::{AssociationSets, AssociationTable};
use crate::file::{read_optional, write_file};
use crate::model::{DesignObject, ObjectId, ObjectKey, ObjectType};
use crate::{ConfigError, ConfigResult, ConfigResultExt};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoredObject {
    id: ObjectId,
    object: DesignObject,
}

/// Design objects held in memory, keyed by [`ObjectKey`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: u64,
    objects: Vec<StoredObject>,
    #[serde(default)]
    associations: AssociationTable,
    #[serde(skip)]
    index: BTreeMap<ObjectKey, usize>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from the JSON snapshot at `path`.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not a valid snapshot.
    pub fn load_snapshot(path: &Utf8Path) -> ConfigResult<Self> {
        let Some(text) = read_optional(path)? else {
            return Ok(Self::new());
        };
        let mut store: Self = serde_json::from_str(&text).into_config()?;
        store.reindex();
        Ok(store)
    }

    /// Write the store as a JSON snapshot to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when the file cannot be written.
    pub fn save_snapshot(&self, path: &Utf8Path) -> ConfigResult<()> {
        let text = serde_json::to_string_pretty(self).into_config()?;
        write_file(path, &text)
    }

    /// Persisted associations.
    #[must_use]
    pub const fn associations(&self) -> &AssociationTable {
        &self.associations
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when the store holds no object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insert `object` directly, bypassing association handling.
    ///
    /// # Errors
    ///
    /// See [`DesignObjectStore::save`].
    pub fn insert(&mut self, object: DesignObject) -> ConfigResult<ObjectId> {
        self.save(&object, &AssociationSets::default())
    }

    fn reindex(&mut self) {
        self.index = self
            .objects
            .iter()
            .enumerate()
            .map(|(slot, stored)| (stored.object.key(), slot))
            .collect();
    }

    fn stored(&self, key: &ObjectKey) -> Option<&StoredObject> {
        self.index.get(key).and_then(|slot| self.objects.get(*slot))
    }
}

impl DesignObjectStore for MemoryStore {
    fn load_modifiable(&self, key: &ObjectKey) -> ConfigResult<Option<DesignObject>> {
        Ok(self.stored(key).map(|stored| stored.object.clone()))
    }

    fn save(
        &mut self,
        object: &DesignObject,
        associations: &AssociationSets,
    ) -> ConfigResult<ObjectId> {
        let key = object.key();
        if key.name.trim().is_empty() {
            return Err(ConfigError::store(key.to_string(), "object name must not be blank"));
        }
        let id = match self.index.get(&key).and_then(|slot| self.objects.get_mut(*slot)) {
            Some(stored) => {
                stored.object = object.clone();
                stored.id
            }
            None => {
                self.next_id += 1;
                let id = ObjectId(self.next_id);
                self.index.insert(key.clone(), self.objects.len());
                self.objects.push(StoredObject {
                    id,
                    object: object.clone(),
                });
                id
            }
        };
        associations.apply_to(&mut self.associations);
        debug!(object = %key, id = %id, "saved design object");
        Ok(id)
    }

    fn delete(&mut self, id: ObjectId) -> ConfigResult<()> {
        let slot = self
            .objects
            .iter()
            .position(|stored| stored.id == id)
            .ok_or_else(|| ConfigError::store(id.to_string(), "no such object"))?;
        let removed = self.objects.remove(slot);
        let key = removed.object.key();
        for owners in self.associations.values_mut() {
            owners.remove(&key.name);
        }
        self.associations.retain(|_, owners| !owners.is_empty());
        self.reindex();
        debug!(object = %key, id = %id, "deleted design object");
        Ok(())
    }

    fn find_all_names(&self, object_type: ObjectType) -> ConfigResult<Vec<String>> {
        Ok(self
            .index
            .keys()
            .filter(|key| key.object_type == object_type)
            .map(|key| key.name.clone())
            .collect())
    }

    fn name_to_guid(&self, key: &ObjectKey) -> Option<ObjectId> {
        self.stored(key).map(|stored| stored.id)
    }

    fn guid_to_name(&self, id: ObjectId) -> Option<ObjectKey> {
        self.objects
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| stored.object.key())
    }
}
