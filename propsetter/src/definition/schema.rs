//! Serde schema of definition documents.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::handler::RemovalPolicy;
use crate::model::ObjectType;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

/// Ordered handler records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Handlers in application order.
    #[serde(default, rename = "handler")]
    pub handlers: Vec<HandlerDef>,
}

/// One unresolved handler record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDef {
    /// Object family; absent for global property handlers.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    /// Single object name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<PropertyValue>,
    /// Object names or wildcard patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<PropertyValue>,
    /// Overrides the family's default removal policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal: Option<RemovalPolicy>,
    /// Handler-level properties not delegated to a setter.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub extra: PropertyMap,
    /// Setters in application order.
    #[serde(default, rename = "setter")]
    pub setters: Vec<SetterDef>,
}

/// One unresolved setter record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetterDef {
    /// Strategy identifier.
    pub kind: String,
    /// Raw property values.
    #[serde(default)]
    pub properties: PropertyMap,
}

impl HandlerDef {
    /// Every raw value the handler resolves: target names, extras and setter
    /// properties.
    pub fn raw_values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.name
            .iter()
            .chain(&self.names)
            .chain(self.extra.values())
            .chain(self.setters.iter().flat_map(|s| s.properties.values()))
    }

    /// Label used in diagnostics before resolution.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        let family = self.object_type.map_or("global", ObjectType::as_str);
        match (&self.name, &self.names) {
            (Some(name), _) => format!("handler #{} ({family}/{name})", index + 1),
            (None, Some(names)) => format!("handler #{} ({family}/{names})", index + 1),
            (None, None) => format!("handler #{} ({family})", index + 1),
        }
    }
}

impl Definition {
    /// Reject handler records whose target fields contradict their type.
    pub(super) fn check_shape(&self) -> ConfigResult<()> {
        let errors: Vec<_> = self
            .handlers
            .iter()
            .enumerate()
            .filter_map(|(index, handler)| {
                let problem = match (handler.object_type, &handler.name, &handler.names) {
                    (Some(_), Some(_), Some(_)) => "sets both 'name' and 'names'",
                    (Some(_), None, None) => "needs 'name' or 'names'",
                    (None, Some(_), _) | (None, _, Some(_)) => {
                        "has no 'type' but names target objects"
                    }
                    _ if handler.setters.iter().any(|s| s.kind.trim().is_empty()) => {
                        "has a setter without 'kind'"
                    }
                    _ => return None,
                };
                Some(ConfigError::definition(format!(
                    "{} {problem}",
                    handler.label(index)
                )))
            })
            .collect();
        ConfigError::try_aggregate(errors).map_or(Ok(()), |err| Err(Arc::new(err)))
    }
}
