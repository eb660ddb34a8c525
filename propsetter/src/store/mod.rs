//! Design-object persistence contract.
//!
//! The pipeline touches persistence only through [`DesignObjectStore`].
//! [`MemoryStore`] is the in-process implementation used by the CLI and the
//! tests; it can be snapshotted to and restored from a JSON file.

mod memory;

pub use memory::MemoryStore;

use crate::ConfigResult;
use crate::association::AssociationSets;
use crate::model::{DesignObject, ObjectId, ObjectKey, ObjectType};

/// Load, save and delete operations over design objects.
pub trait DesignObjectStore {
    /// Load a modifiable copy of the object at `key`, or `None` when it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Store`] when the backend fails.
    fn load_modifiable(&self, key: &ObjectKey) -> ConfigResult<Option<DesignObject>>;

    /// Persist `object` together with the association changes queued for it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Store`] when the backend rejects the
    /// object.
    fn save(
        &mut self,
        object: &DesignObject,
        associations: &AssociationSets,
    ) -> ConfigResult<ObjectId>;

    /// Delete the object with `id` and every association it owns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Store`] when `id` is unknown or the
    /// backend fails.
    fn delete(&mut self, id: ObjectId) -> ConfigResult<()>;

    /// Names of every stored object of `object_type`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Store`] when the backend fails.
    fn find_all_names(&self, object_type: ObjectType) -> ConfigResult<Vec<String>>;

    /// Identifier of the object at `key`, if stored.
    fn name_to_guid(&self, key: &ObjectKey) -> Option<ObjectId>;

    /// Key of the object with `id`, if stored.
    fn guid_to_name(&self, id: ObjectId) -> Option<ObjectKey>;
}
