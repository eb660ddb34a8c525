//! Resolved handlers: one object family, its target names and setters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ConfigResult;
use crate::association::AssociationSets;
use crate::model::{LOCATION_SCHEME_EXTRAS, ObjectKey, ObjectType};
use crate::placeholder::is_unresolved;
use crate::reconcile::{ObjectState, expand_names, is_pattern, partition};
use crate::setter::{Setter, SetterTarget, ValidationScope};
use crate::store::DesignObjectStore;
use crate::validate::ValidationReport;
use crate::value::PropertyMap;

/// What happens to an object once its configuration is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Undo the setters and keep the object.
    Undo,
    /// Delete the object.
    Delete,
}

impl RemovalPolicy {
    /// Default policy for objects of `object_type`.
    ///
    /// Location schemes exist only because configuration created them, so
    /// they are deleted; everything else is kept.
    #[must_use]
    pub const fn for_type(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::LocationScheme => Self::Delete,
            ObjectType::ContentType
            | ObjectType::Template
            | ObjectType::Site
            | ObjectType::Workflow
            | ObjectType::Slot => Self::Undo,
        }
    }
}

/// Objects a handler configures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerTarget {
    /// No design object: setters write to the session's global properties.
    Unbound,
    /// One fixed object name.
    Fixed(String),
    /// Names or wildcard patterns, resolved against both runs.
    Names {
        /// Names from the current configuration.
        current: Vec<String>,
        /// Names from the previous configuration.
        previous: Vec<String>,
    },
}

impl HandlerTarget {
    /// Names configured by the current run, patterns unexpanded.
    #[must_use]
    pub fn current_names(&self) -> Vec<&str> {
        match self {
            Self::Unbound => Vec::new(),
            Self::Fixed(name) => vec![name.as_str()],
            Self::Names { current, .. } => current.iter().map(String::as_str).collect(),
        }
    }
}

/// A handler resolved for one apply or de-apply cycle.
#[derive(Clone, Debug)]
pub struct Handler {
    /// Object family, `None` for global property handlers.
    pub object_type: Option<ObjectType>,
    /// Objects to configure.
    pub target: HandlerTarget,
    /// What to do with objects leaving configuration.
    pub removal: RemovalPolicy,
    /// Handler-level properties resolved against the current configuration.
    pub extra: PropertyMap,
    /// Handler-level properties resolved against the previous configuration.
    pub prev_extra: PropertyMap,
    /// Setters in application order.
    pub setters: Vec<Setter>,
}

impl Handler {
    /// Name used in logs and findings.
    #[must_use]
    pub fn label(&self) -> String {
        let family = self.object_type.map_or("global", ObjectType::as_str);
        match &self.target {
            HandlerTarget::Unbound => family.to_owned(),
            HandlerTarget::Fixed(name) => format!("{family}/{name}"),
            HandlerTarget::Names { current, .. } => format!("{family}/[{}]", current.join(", ")),
        }
    }

    /// Pair every configured object with its state.
    ///
    /// A fixed name is [`ObjectState::Both`] when a previous run exists and
    /// [`ObjectState::Current`] otherwise. Name lists are expanded against
    /// the store's catalog and partitioned.
    ///
    /// # Errors
    ///
    /// Propagates catalog lookup failures.
    pub fn targets(
        &self,
        has_prev: bool,
        store: &dyn DesignObjectStore,
    ) -> ConfigResult<Vec<(ObjectKey, ObjectState)>> {
        let Some(object_type) = self.object_type else {
            return Ok(Vec::new());
        };
        match &self.target {
            HandlerTarget::Unbound => Ok(Vec::new()),
            HandlerTarget::Fixed(name) => {
                let state = if has_prev {
                    ObjectState::Both
                } else {
                    ObjectState::Current
                };
                Ok(vec![(ObjectKey::new(object_type, name.as_str()), state)])
            }
            HandlerTarget::Names { current, previous } => {
                if current.is_empty() && previous.is_empty() {
                    return Ok(Vec::new());
                }
                let catalog = if current.iter().chain(previous).any(|n| is_pattern(n)) {
                    store.find_all_names(object_type)?
                } else {
                    Vec::new()
                };
                let current: BTreeSet<String> = expand_names(current, &catalog);
                let previous: BTreeSet<String> = expand_names(previous, &catalog);
                Ok(partition(&current, &previous)
                    .into_iter()
                    .map(|(name, state)| (ObjectKey::new(object_type, name), state))
                    .collect())
            }
        }
    }

    /// Apply every setter to `target`; returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Stops at the first failing setter.
    pub fn process(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let mut changed = false;
        for setter in &self.setters {
            changed |= setter.apply_properties(target, state, assoc)?;
        }
        Ok(changed)
    }

    /// Undo every setter on `target`; returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Stops at the first failing setter.
    pub fn unprocess(
        &self,
        target: &mut SetterTarget<'_>,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let mut changed = false;
        for setter in &self.setters {
            changed |= setter.deapply_properties(target, assoc)?;
        }
        Ok(changed)
    }

    /// Record handler and setter problems in `report`.
    pub fn validate(&self, report: &mut ValidationReport) {
        let label = self.label();
        if self.object_type == Some(ObjectType::LocationScheme) {
            for extra in LOCATION_SCHEME_EXTRAS {
                let ok = self
                    .extra
                    .get(extra)
                    .is_some_and(|v| !is_unresolved(v) && v.as_str().is_some_and(|s| !s.trim().is_empty()));
                if !ok {
                    report.error(
                        &label,
                        Some(extra),
                        "location scheme handlers require this extra property",
                    );
                }
            }
        }
        if self.object_type.is_some() && self.target.current_names().is_empty() {
            report.warning(&label, None, "handler configures no object names");
        }
        let scope = ValidationScope {
            object_type: self.object_type,
            object: &label,
        };
        for setter in &self.setters {
            setter.validate(scope, report);
        }
    }
}
