//! Definition documents generated from an export descriptor.
//!
//! ```toml
//! prefix = "com"
//! solution = "Blog"
//!
//! [[object]]
//! type = "content-type"
//! name = "Article"
//! properties = ["label", "visibility"]
//! ```
//!
//! Objects without `properties` export every property of their type.

use figment::Figment;
use figment::providers::{Format, Toml};
use serde::Deserialize;

use crate::definition::{Definition, HandlerDef, SetterDef};
use crate::model::{DesignObject, LOCATION_SCHEME_EXTRAS, ObjectType};
use crate::target::PropertyTarget;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult, ConfigResultExt};

/// Objects to expose and the key prefix their placeholders use.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportDescriptor {
    /// Publisher prefix of the generated keys.
    pub prefix: String,
    /// Solution name of the generated keys.
    pub solution: String,
    /// Exported objects in handler order.
    #[serde(default, rename = "object")]
    pub objects: Vec<ExportObject>,
}

/// One exported object.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportObject {
    /// Object family.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Object name.
    pub name: String,
    /// Properties to expose; every property of the family when absent.
    #[serde(default)]
    pub properties: Option<Vec<String>>,
}

impl ExportDescriptor {
    /// Parse a descriptor held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Gathering`] when the document does not match
    /// the descriptor schema.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Figment::from(Toml::string(text)).extract().into_config()
    }
}

/// Build a definition with one handler per exported object, each carrying
/// a `property` setter whose values are `${prefix.solution.object.property}`
/// placeholders.
///
/// Location schemes get their identifying properties as handler extras
/// instead of setter properties.
///
/// # Errors
///
/// Returns [`ConfigError::Definition`] for a blank prefix, solution or
/// object name and [`ConfigError::UnknownProperty`] for properties the
/// family does not have.
pub fn definition_shell(descriptor: &ExportDescriptor) -> ConfigResult<Definition> {
    let prefix = descriptor.prefix.trim();
    let solution = descriptor.solution.trim();
    if prefix.is_empty() || solution.is_empty() {
        return Err(ConfigError::definition(
            "export descriptors require a non-blank prefix and solution",
        ));
    }
    let handlers = descriptor
        .objects
        .iter()
        .map(|object| export_handler(&format!("{prefix}.{solution}"), object))
        .collect::<ConfigResult<Vec<_>>>()?;
    Ok(Definition { handlers })
}

fn export_handler(base: &str, object: &ExportObject) -> ConfigResult<HandlerDef> {
    let name = object.name.trim();
    if name.is_empty() {
        return Err(ConfigError::definition(format!(
            "exported {} objects need a name",
            object.object_type
        )));
    }
    let blank = DesignObject::blank(object.object_type);
    let names: Vec<&str> = match &object.properties {
        Some(listed) => listed.iter().map(String::as_str).collect(),
        None => blank.property_names().to_vec(),
    };
    let placeholder = |property: &str| PropertyValue::scalar(format!("${{{base}.{name}.{property}}}"));

    let mut extra = PropertyMap::new();
    let mut properties = PropertyMap::new();
    for property in names {
        if !blank.has_property(property) {
            return Err(ConfigError::unknown_property(
                object.object_type.as_str(),
                property,
            ));
        }
        let bucket = if object.object_type == ObjectType::LocationScheme
            && LOCATION_SCHEME_EXTRAS.contains(&property)
        {
            &mut extra
        } else {
            &mut properties
        };
        bucket.insert(property.to_owned(), placeholder(property));
    }
    if object.object_type == ObjectType::LocationScheme {
        for property in LOCATION_SCHEME_EXTRAS {
            extra
                .entry(property.to_owned())
                .or_insert_with(|| placeholder(property));
        }
    }

    let setters = if properties.is_empty() {
        Vec::new()
    } else {
        vec![SetterDef {
            kind: "property".to_owned(),
            properties,
        }]
    };
    Ok(HandlerDef {
        object_type: Some(object.object_type),
        name: Some(PropertyValue::scalar(name)),
        names: None,
        removal: None,
        extra,
        setters,
    })
}
