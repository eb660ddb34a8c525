//! Shared fixtures for the propsetter integration tests.

use propsetter::association::AssociationSets;
use propsetter::definition::Definition;
use propsetter::model::{DesignObject, ObjectId, ObjectKey, ObjectType};
use propsetter::service::ConfigDocuments;
use propsetter::store::{DesignObjectStore, MemoryStore};
use propsetter::{ConfigError, ConfigResult};
use test_helpers::xml::flat_document;

/// Store that fails the save of one named object and records every save.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_on: Option<ObjectKey>,
    pub saved: Vec<ObjectKey>,
}

impl FailingStore {
    pub fn failing_on(key: ObjectKey) -> Self {
        Self {
            fail_on: Some(key),
            ..Self::default()
        }
    }
}

impl DesignObjectStore for FailingStore {
    fn load_modifiable(&self, key: &ObjectKey) -> ConfigResult<Option<DesignObject>> {
        self.inner.load_modifiable(key)
    }

    fn save(&mut self, object: &DesignObject, assoc: &AssociationSets) -> ConfigResult<ObjectId> {
        let key = object.key();
        self.saved.push(key.clone());
        if self.fail_on.as_ref() == Some(&key) {
            return Err(ConfigError::store(key.to_string(), "simulated save failure"));
        }
        self.inner.save(object, assoc)
    }

    fn delete(&mut self, id: ObjectId) -> ConfigResult<()> {
        self.inner.delete(id)
    }

    fn find_all_names(&self, object_type: ObjectType) -> ConfigResult<Vec<String>> {
        self.inner.find_all_names(object_type)
    }

    fn name_to_guid(&self, key: &ObjectKey) -> Option<ObjectId> {
        self.inner.name_to_guid(key)
    }

    fn guid_to_name(&self, id: ObjectId) -> Option<ObjectKey> {
        self.inner.guid_to_name(id)
    }
}

/// One content type whose label and description come from `com.Blog.*`.
pub const BLOG_DEFINITION: &str = r#"
[[handler]]
type = "content-type"
name = "Blog"

[[handler.setter]]
kind = "property"
properties = { label = "${com.Blog.x}", description = "${com.Blog.y}" }
"#;

/// Documents named `blog` over [`BLOG_DEFINITION`] with flat defaults.
pub fn blog_documents(props: &[(&str, &str)]) -> ConfigDocuments {
    documents("blog", BLOG_DEFINITION, props)
}

pub fn documents(name: &str, definition: &str, props: &[(&str, &str)]) -> ConfigDocuments {
    ConfigDocuments {
        name: name.to_owned(),
        definition: Definition::from_toml_str(definition).expect("fixture definition parses"),
        default_xml: flat_document("com", "Blog", props),
        local_xml: None,
    }
}

pub fn blog_key() -> ObjectKey {
    ObjectKey::new(ObjectType::ContentType, "Blog")
}
