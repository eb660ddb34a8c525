//! Setters: strategies that apply named properties to a design object.
//!
//! A [`Setter`] pairs resolved current and previous property maps with a
//! [`SetterStrategy`] looked up by kind in a [`SetterRegistry`]. The setter
//! enforces the no-op rule (an empty property map never touches the object)
//! and routes each [`ObjectState`] to apply or undo; the strategy does the
//! per-property work.

mod associations;
mod field_overrides;
mod property;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use associations::AssociationSetter;
pub use field_overrides::FieldOverridesSetter;
pub use property::PropertySetter;

use crate::association::AssociationSets;
use crate::model::{DesignObject, ObjectType};
use crate::reconcile::ObjectState;
use crate::target::{PropertyBag, PropertyTarget};
use crate::validate::ValidationReport;
use crate::value::PropertyMap;
use crate::{ConfigError, ConfigResult};

/// Object a setter writes to.
#[derive(Debug)]
pub enum SetterTarget<'a> {
    /// A loaded design object.
    Object(&'a mut DesignObject),
    /// Session-wide properties of handlers without an object type.
    Globals(&'a mut PropertyBag),
}

impl SetterTarget<'_> {
    /// Untyped property access to the target.
    pub fn properties(&mut self) -> &mut dyn PropertyTarget {
        match self {
            Self::Object(object) => &mut **object,
            Self::Globals(bag) => &mut **bag,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Object(object) => object.key().to_string(),
            Self::Globals(_) => "global properties".to_owned(),
        }
    }
}

/// What a setter is validated against.
#[derive(Clone, Copy, Debug)]
pub struct ValidationScope<'a> {
    /// Family the owning handler configures, `None` for global handlers.
    pub object_type: Option<ObjectType>,
    /// Handler label used in findings.
    pub object: &'a str,
}

/// Per-kind property application logic.
pub trait SetterStrategy: fmt::Debug + Send + Sync {
    /// Identifier used in definition documents.
    fn kind(&self) -> &'static str;

    /// Apply `props` to `target`. In [`ObjectState::Both`], `prev` holds the
    /// previous run's properties so removed entries can be undone.
    ///
    /// Returns `true` when the target or its associations changed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value cannot be applied.
    fn apply(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        props: &PropertyMap,
        prev: &PropertyMap,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool>;

    /// Undo what applying `props` did.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the target rejects the change.
    fn deapply(
        &self,
        target: &mut SetterTarget<'_>,
        props: &PropertyMap,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool>;

    /// Record problems with `props` without touching any object.
    fn validate(&self, scope: ValidationScope<'_>, props: &PropertyMap, report: &mut ValidationReport);
}

/// A strategy bound to resolved properties for one apply cycle.
#[derive(Clone, Debug)]
pub struct Setter {
    /// Strategy identifier.
    pub kind: String,
    /// Properties resolved against the current configuration.
    pub properties: PropertyMap,
    /// Properties resolved against the previous configuration.
    pub prev_properties: PropertyMap,
    strategy: Arc<dyn SetterStrategy>,
}

impl Setter {
    /// Bind `strategy` to resolved property maps.
    #[must_use]
    pub fn new(
        strategy: Arc<dyn SetterStrategy>,
        properties: PropertyMap,
        prev_properties: PropertyMap,
    ) -> Self {
        Self {
            kind: strategy.kind().to_owned(),
            properties,
            prev_properties,
            strategy,
        }
    }

    /// Drop both property maps, turning the setter into a no-op.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.prev_properties.clear();
    }

    /// Apply the setter to `target` for an object in `state`.
    ///
    /// Objects leaving scope ([`ObjectState::Previous`]) have the previous
    /// properties undone. Otherwise the current properties are applied; an
    /// empty current map is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates strategy failures.
    pub fn apply_properties(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        match state {
            _ if self.properties.is_empty() => Ok(false),
            ObjectState::Previous if self.prev_properties.is_empty() => Ok(false),
            ObjectState::Previous => self.strategy.deapply(target, &self.prev_properties, assoc),
            ObjectState::Current => {
                self.strategy
                    .apply(target, state, &self.properties, &PropertyMap::new(), assoc)
            }
            ObjectState::Both => {
                self.strategy
                    .apply(target, state, &self.properties, &self.prev_properties, assoc)
            }
        }
    }

    /// Undo the current properties on `target`.
    ///
    /// # Errors
    ///
    /// Propagates strategy failures.
    pub fn deapply_properties(
        &self,
        target: &mut SetterTarget<'_>,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        if self.properties.is_empty() {
            return Ok(false);
        }
        self.strategy.deapply(target, &self.properties, assoc)
    }

    /// Validate the current properties.
    pub fn validate(&self, scope: ValidationScope<'_>, report: &mut ValidationReport) {
        if !self.properties.is_empty() {
            self.strategy.validate(scope, &self.properties, report);
        }
    }
}

/// Lookup table of strategies keyed by kind.
#[derive(Clone, Debug)]
pub struct SetterRegistry {
    strategies: BTreeMap<&'static str, Arc<dyn SetterStrategy>>,
}

impl Default for SetterRegistry {
    /// Registry holding every built-in strategy.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PropertySetter));
        registry.register(Arc::new(AssociationSetter::templates()));
        registry.register(Arc::new(AssociationSetter::slot_contents()));
        registry.register(Arc::new(AssociationSetter::workflow_content_types()));
        registry.register(Arc::new(FieldOverridesSetter));
        registry
    }
}

impl SetterRegistry {
    /// Registry without any strategy.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Add or replace the strategy for its kind.
    pub fn register(&mut self, strategy: Arc<dyn SetterStrategy>) {
        self.strategies.insert(strategy.kind(), strategy);
    }

    /// Strategy registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Definition`] for unknown kinds.
    pub fn get(&self, kind: &str) -> ConfigResult<Arc<dyn SetterStrategy>> {
        self.strategies.get(kind).cloned().ok_or_else(|| {
            let known: Vec<&str> = self.strategies.keys().copied().collect();
            ConfigError::definition(format!(
                "unknown setter kind '{kind}'; expected one of {}",
                known.join(", ")
            ))
        })
    }

    /// Registered kinds in name order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.keys().copied()
    }
}

/// Require `target` to be a design object of `expected` family.
fn expect_object<'t>(
    target: &'t mut SetterTarget<'_>,
    kind: &str,
    expected: ObjectType,
) -> ConfigResult<&'t mut DesignObject> {
    let label = target.label();
    match target {
        SetterTarget::Object(object) if object.object_type() == expected => Ok(&mut **object),
        _ => Err(ConfigError::business(format!(
            "setter '{kind}' only applies to {expected} objects, not {label}"
        ))),
    }
}

#[cfg(test)]
mod tests;
