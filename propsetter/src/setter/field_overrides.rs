//! Setter for a content type's anonymous field-override groups.

use std::collections::BTreeSet;

use super::{SetterStrategy, SetterTarget, ValidationScope, expect_object};
use crate::association::AssociationSets;
use crate::model::{DesignObject, FieldOverride, ObjectType};
use crate::placeholder::{is_unresolved, placeholder_keys};
use crate::reconcile::ObjectState;
use crate::target::FromProperty;
use crate::validate::ValidationReport;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

const PROPERTY: &str = "overrides";
const KIND: &str = "field-overrides";

/// Upserts field overrides keyed by field name.
///
/// The `overrides` property is a list of `{ field, label, required }`
/// groups. Overrides whose field was listed previously but no longer are
/// removed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldOverridesSetter;

fn parse_overrides(props: &PropertyMap) -> ConfigResult<Vec<FieldOverride>> {
    let Some(value) = props.get(PROPERTY).filter(|v| !is_unresolved(v)) else {
        return Ok(Vec::new());
    };
    let groups: &[PropertyValue] = match value {
        PropertyValue::Null => &[],
        PropertyValue::Sequence(items) => items,
        PropertyValue::Mapping(_) => std::slice::from_ref(value),
        PropertyValue::Scalar(_) | PropertyValue::Pair(..) => {
            return Err(ConfigError::conversion(PROPERTY, "list of field overrides", value));
        }
    };
    groups.iter().map(parse_group).collect()
}

fn parse_group(group: &PropertyValue) -> ConfigResult<FieldOverride> {
    let PropertyValue::Mapping(entries) = group else {
        return Err(ConfigError::conversion(PROPERTY, "field override group", group));
    };
    let get = |name: &str| entries.get(name).cloned().unwrap_or_default();
    let field = String::from_property("field", &get("field"))?;
    if field.trim().is_empty() {
        return Err(ConfigError::conversion("field", "non-empty field name", &get("field")));
    }
    Ok(FieldOverride {
        field,
        label: String::from_property("label", &get("label"))?,
        required: Option::<bool>::from_property("required", &get("required"))?
            .unwrap_or_default(),
    })
}

fn content_type<'t>(target: &'t mut SetterTarget<'_>) -> ConfigResult<&'t mut Vec<FieldOverride>> {
    match expect_object(target, KIND, ObjectType::ContentType)? {
        DesignObject::ContentType(ct) => Ok(&mut ct.field_overrides),
        other => Err(ConfigError::business(format!(
            "setter '{KIND}' cannot apply to {}",
            other.key()
        ))),
    }
}

fn remove_fields(overrides: &mut Vec<FieldOverride>, fields: &BTreeSet<String>) -> bool {
    let before = overrides.len();
    overrides.retain(|o| !fields.contains(&o.field));
    overrides.len() != before
}

impl SetterStrategy for FieldOverridesSetter {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn apply(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        props: &PropertyMap,
        prev: &PropertyMap,
        _assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let current = parse_overrides(props)?;
        let gone: BTreeSet<String> = if state == ObjectState::Both {
            parse_overrides(prev)?
                .into_iter()
                .map(|o| o.field)
                .filter(|field| current.iter().all(|o| &o.field != field))
                .collect()
        } else {
            BTreeSet::new()
        };
        let overrides = content_type(target)?;
        let mut changed = remove_fields(overrides, &gone);
        for wanted in current {
            match overrides.iter_mut().find(|o| o.field == wanted.field) {
                Some(existing) if *existing == wanted => {}
                Some(existing) => {
                    *existing = wanted;
                    changed = true;
                }
                None => {
                    overrides.push(wanted);
                    changed = true;
                }
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
        let fields = parse_overrides(props)?.into_iter().map(|o| o.field).collect();
        Ok(remove_fields(content_type(target)?, &fields))
    }

    fn validate(
        &self,
        scope: ValidationScope<'_>,
        props: &PropertyMap,
        report: &mut ValidationReport,
    ) {
        if scope.object_type != Some(ObjectType::ContentType) {
            report.error(
                scope.object,
                None,
                format!("setter '{KIND}' only applies to content-type handlers"),
            );
        }
        let Some(value) = props.get(PROPERTY) else {
            report.error(
                scope.object,
                Some(PROPERTY),
                format!("setter '{KIND}' requires property '{PROPERTY}'"),
            );
            return;
        };
        let unresolved = placeholder_keys(value);
        if !unresolved.is_empty() {
            report.warning(
                scope.object,
                Some(PROPERTY),
                format!("unresolved placeholder(s): {}", unresolved.join(", ")),
            );
            return;
        }
        match parse_overrides(props) {
            Ok(overrides) => {
                let mut seen = BTreeSet::new();
                for o in overrides.iter().filter(|o| !seen.insert(o.field.clone())) {
                    report.error(
                        scope.object,
                        Some(PROPERTY),
                        format!("field '{}' is overridden twice", o.field),
                    );
                }
            }
            Err(err) => report.error(scope.object, Some(PROPERTY), err.to_string()),
        }
    }
}
