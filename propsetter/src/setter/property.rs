//! Generic setter writing properties through [`PropertyTarget`].
//!
//! [`PropertyTarget`]: crate::target::PropertyTarget

use tracing::debug;

use super::{SetterStrategy, SetterTarget, ValidationScope};
use crate::association::AssociationSets;
use crate::model::DesignObject;
use crate::placeholder::{is_unresolved, placeholder_keys};
use crate::reconcile::ObjectState;
use crate::target::PropertyTarget;
use crate::validate::ValidationReport;
use crate::value::{PropertyMap, PropertyValue};
use crate::ConfigResult;

/// Sets each named property on the target.
///
/// A value that is still a whole `${placeholder}` counts as absent. Null
/// values reset the property to its default. In [`ObjectState::Both`],
/// properties that were set previously but are absent now are reset too.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertySetter;

fn present(value: &PropertyValue) -> bool {
    !is_unresolved(value)
}

impl SetterStrategy for PropertySetter {
    fn kind(&self) -> &'static str {
        "property"
    }

    fn apply(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        props: &PropertyMap,
        prev: &PropertyMap,
        _assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let label = target.label();
        let object = target.properties();
        let mut changed = false;
        for (name, value) in props {
            if !present(value) {
                debug!(object = %label, property = %name, "skipping unresolved property");
                continue;
            }
            changed |= if value.is_null() {
                object.clear_property(name)?
            } else {
                object.set_property(name, value)?
            };
        }
        if state == ObjectState::Both {
            for name in prev.keys() {
                if props.get(name).is_some_and(present) {
                    continue;
                }
                debug!(object = %label, property = %name, "clearing removed property");
                changed |= object.clear_property(name)?;
            }
        }
        Ok(changed)
    }

    fn deapply(
        &self,
        target: &mut SetterTarget<'_>,
        props: &PropertyMap,
        _assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let object = target.properties();
        let mut changed = false;
        for (name, value) in props {
            if present(value) {
                changed |= object.clear_property(name)?;
            }
        }
        Ok(changed)
    }

    fn validate(
        &self,
        scope: ValidationScope<'_>,
        props: &PropertyMap,
        report: &mut ValidationReport,
    ) {
        let Some(object_type) = scope.object_type else {
            return;
        };
        let mut scratch = DesignObject::blank(object_type);
        for (name, value) in props {
            if !scratch.has_property(name) {
                report.error(
                    scope.object,
                    Some(name),
                    format!("{object_type} has no property named '{name}'"),
                );
                continue;
            }
            let unresolved = placeholder_keys(value);
            if !unresolved.is_empty() {
                report.warning(
                    scope.object,
                    Some(name),
                    format!("unresolved placeholder(s): {}", unresolved.join(", ")),
                );
                continue;
            }
            if value.is_null() {
                continue;
            }
            if let Err(err) = scratch.set_property(name, value) {
                report.error(scope.object, Some(name), err.to_string());
            }
        }
    }
}
