//! Design objects configured by handlers.
//!
//! The CMS object model is reduced to a closed set of families, each a typed
//! struct implementing [`PropertyTarget`]. [`DesignObject`] dispatches over
//! them so setters never need runtime type inspection.

mod kinds;
mod objects;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use kinds::{GeneratorKind, Visibility};
pub use objects::{ContentType, FieldOverride, LocationScheme, Site, Slot, Template, Workflow};

use crate::target::PropertyTarget;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

/// Family of a design object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    /// Content type definition.
    ContentType,
    /// Presentation template.
    Template,
    /// Publishing site.
    Site,
    /// Workflow definition.
    Workflow,
    /// Location scheme used to generate publishing locations.
    LocationScheme,
    /// Template slot.
    Slot,
}

impl ObjectType {
    /// Every family, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::ContentType,
        Self::Template,
        Self::Site,
        Self::Workflow,
        Self::LocationScheme,
        Self::Slot,
    ];

    /// Identifier used in definition documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentType => "content-type",
            Self::Template => "template",
            Self::Site => "site",
            Self::Workflow => "workflow",
            Self::LocationScheme => "location-scheme",
            Self::Slot => "slot",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = std::sync::Arc<ConfigError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ConfigError::definition(format!("unknown object type '{s}'")))
    }
}

/// Identity of a design object within a store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Family of the object.
    pub object_type: ObjectType,
    /// Object name, unique within its family.
    pub name: String,
}

impl ObjectKey {
    /// Build a key.
    #[must_use]
    pub fn new(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            object_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.object_type, self.name)
    }
}

/// Store-assigned object identifier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A loaded, modifiable design object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DesignObject {
    /// See [`ContentType`].
    ContentType(ContentType),
    /// See [`Template`].
    Template(Template),
    /// See [`Site`].
    Site(Site),
    /// See [`Workflow`].
    Workflow(Workflow),
    /// See [`LocationScheme`].
    LocationScheme(LocationScheme),
    /// See [`Slot`].
    Slot(Slot),
}

/// Handler extra properties a new location scheme is created from.
pub const LOCATION_SCHEME_EXTRAS: [&str; 3] = ["context", "contentType", "template"];

impl DesignObject {
    /// Create a fresh object for `key`.
    ///
    /// Location schemes copy [`LOCATION_SCHEME_EXTRAS`] from `extra`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Business`] when a location scheme lacks one of
    /// its required extra properties, or a conversion error when an extra
    /// property has the wrong shape.
    pub fn create(key: &ObjectKey, extra: &PropertyMap) -> ConfigResult<Self> {
        let name = key.name.clone();
        let mut object = match key.object_type {
            ObjectType::ContentType => Self::ContentType(ContentType::named(name)),
            ObjectType::Template => Self::Template(Template::named(name)),
            ObjectType::Site => Self::Site(Site::named(name)),
            ObjectType::Workflow => Self::Workflow(Workflow::named(name)),
            ObjectType::LocationScheme => Self::LocationScheme(LocationScheme::named(name)),
            ObjectType::Slot => Self::Slot(Slot::named(name)),
        };
        if key.object_type == ObjectType::LocationScheme {
            for property in LOCATION_SCHEME_EXTRAS {
                let value = extra
                    .get(property)
                    .filter(|value| value.as_str().is_some_and(|text| !text.trim().is_empty()))
                    .ok_or_else(|| {
                        ConfigError::business(format!(
                            "location scheme '{}' requires handler extra property '{property}'",
                            key.name
                        ))
                    })?;
                object.set_property(property, value)?;
            }
        }
        Ok(object)
    }

    /// Default-valued object of `object_type` with a blank name, used to
    /// dry-run conversions during validation.
    #[must_use]
    pub fn blank(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::ContentType => Self::ContentType(ContentType::default()),
            ObjectType::Template => Self::Template(Template::default()),
            ObjectType::Site => Self::Site(Site::default()),
            ObjectType::Workflow => Self::Workflow(Workflow::default()),
            ObjectType::LocationScheme => Self::LocationScheme(LocationScheme::default()),
            ObjectType::Slot => Self::Slot(Slot::default()),
        }
    }

    /// Family of this object.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::ContentType(_) => ObjectType::ContentType,
            Self::Template(_) => ObjectType::Template,
            Self::Site(_) => ObjectType::Site,
            Self::Workflow(_) => ObjectType::Workflow,
            Self::LocationScheme(_) => ObjectType::LocationScheme,
            Self::Slot(_) => ObjectType::Slot,
        }
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ContentType(o) => &o.name,
            Self::Template(o) => &o.name,
            Self::Site(o) => &o.name,
            Self::Workflow(o) => &o.name,
            Self::LocationScheme(o) => &o.name,
            Self::Slot(o) => &o.name,
        }
    }

    /// Store key of this object.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.object_type(), self.name())
    }

    fn target(&self) -> &dyn PropertyTarget {
        match self {
            Self::ContentType(o) => o,
            Self::Template(o) => o,
            Self::Site(o) => o,
            Self::Workflow(o) => o,
            Self::LocationScheme(o) => o,
            Self::Slot(o) => o,
        }
    }

    fn target_mut(&mut self) -> &mut dyn PropertyTarget {
        match self {
            Self::ContentType(o) => o,
            Self::Template(o) => o,
            Self::Site(o) => o,
            Self::Workflow(o) => o,
            Self::LocationScheme(o) => o,
            Self::Slot(o) => o,
        }
    }
}

impl PropertyTarget for DesignObject {
    fn target_name(&self) -> &'static str {
        self.object_type().as_str()
    }

    fn property_names(&self) -> &'static [&'static str] {
        self.target().property_names()
    }

    fn get_property(&self, name: &str) -> ConfigResult<PropertyValue> {
        self.target().get_property(name)
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> ConfigResult<bool> {
        self.target_mut().set_property(name, value)
    }

    fn clear_property(&mut self, name: &str) -> ConfigResult<bool> {
        self.target_mut().clear_property(name)
    }
}

#[cfg(test)]
mod tests;
