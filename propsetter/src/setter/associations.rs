//! Setters that maintain many-to-many relationships.

use std::collections::BTreeSet;

use super::{SetterStrategy, SetterTarget, ValidationScope, expect_object};
use crate::association::{Association, AssociationOp, AssociationSets, AssociationType};
use crate::model::ObjectType;
use crate::placeholder::{is_unresolved, placeholder_keys};
use crate::reconcile::ObjectState;
use crate::target::FromProperty;
use crate::validate::ValidationReport;
use crate::value::{PropertyMap, PropertyValue};
use crate::{ConfigError, ConfigResult};

/// How members are spelled in the property value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MemberShape {
    /// Names: a list or a comma-separated scalar.
    Names,
    /// A list of pairs.
    Pairs,
}

/// Queues MERGE and DELETE operations for one association type.
///
/// The owner is the target object. In [`ObjectState::Both`] only the
/// difference to the previous run is queued: new members are merged and
/// members no longer listed are deleted.
#[derive(Clone, Debug)]
pub struct AssociationSetter {
    kind: &'static str,
    owner: ObjectType,
    property: &'static str,
    association: AssociationType,
    shape: MemberShape,
}

impl AssociationSetter {
    /// `templates`: templates a content type may be rendered with.
    #[must_use]
    pub const fn templates() -> Self {
        Self {
            kind: "templates",
            owner: ObjectType::ContentType,
            property: "templates",
            association: AssociationType::ContentTypeTemplate,
            shape: MemberShape::Names,
        }
    }

    /// `slot-contents`: `(content type, template)` pairs allowed in a slot.
    #[must_use]
    pub const fn slot_contents() -> Self {
        Self {
            kind: "slot-contents",
            owner: ObjectType::Slot,
            property: "contents",
            association: AssociationType::SlotContent,
            shape: MemberShape::Pairs,
        }
    }

    /// `workflow-content-types`: content types a workflow is allowed for.
    #[must_use]
    pub const fn workflow_content_types() -> Self {
        Self {
            kind: "workflow-content-types",
            owner: ObjectType::Workflow,
            property: "contentTypes",
            association: AssociationType::WorkflowContentType,
            shape: MemberShape::Names,
        }
    }

    /// Members listed in `props`; an absent or unresolved value lists none.
    fn members(&self, props: &PropertyMap) -> ConfigResult<BTreeSet<String>> {
        let Some(value) = props.get(self.property).filter(|v| !is_unresolved(v)) else {
            return Ok(BTreeSet::new());
        };
        match self.shape {
            MemberShape::Names => Ok(Vec::<String>::from_property(self.property, value)?
                .into_iter()
                .collect()),
            MemberShape::Pairs => pair_members(self.property, value),
        }
    }
}

fn pair_members(property: &str, value: &PropertyValue) -> ConfigResult<BTreeSet<String>> {
    let items: &[PropertyValue] = match value {
        PropertyValue::Null => &[],
        PropertyValue::Sequence(items) => items,
        PropertyValue::Pair(..) => std::slice::from_ref(value),
        PropertyValue::Scalar(_) | PropertyValue::Mapping(_) => {
            return Err(ConfigError::conversion(property, "list of pairs", value));
        }
    };
    items
        .iter()
        .map(|item| match item {
            PropertyValue::Pair(first, second) => match (first.as_str(), second.as_str()) {
                (Some(a), Some(b)) => Ok(Association::pair_member(a, b)),
                _ => Err(ConfigError::conversion(property, "pair of names", item)),
            },
            _ => Err(ConfigError::conversion(property, "pair of names", item)),
        })
        .collect()
}

impl SetterStrategy for AssociationSetter {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn apply(
        &self,
        target: &mut SetterTarget<'_>,
        state: ObjectState,
        props: &PropertyMap,
        prev: &PropertyMap,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let owner = expect_object(target, self.kind, self.owner)?.name().to_owned();
        let current = self.members(props)?;
        let previous = if state == ObjectState::Both {
            self.members(prev)?
        } else {
            BTreeSet::new()
        };
        let added = current.difference(&previous).cloned().collect();
        let gone = previous.difference(&current).cloned().collect();
        let merged = assoc.push(self.association, AssociationOp::Merge, &owner, added);
        let deleted = assoc.push(self.association, AssociationOp::Delete, &owner, gone);
        Ok(merged || deleted)
    }

    fn deapply(
        &self,
        target: &mut SetterTarget<'_>,
        props: &PropertyMap,
        assoc: &mut AssociationSets,
    ) -> ConfigResult<bool> {
        let owner = expect_object(target, self.kind, self.owner)?.name().to_owned();
        let members = self.members(props)?.into_iter().collect();
        Ok(assoc.push(self.association, AssociationOp::Delete, &owner, members))
    }

    fn validate(
        &self,
        scope: ValidationScope<'_>,
        props: &PropertyMap,
        report: &mut ValidationReport,
    ) {
        if scope.object_type != Some(self.owner) {
            report.error(
                scope.object,
                None,
                format!("setter '{}' only applies to {} handlers", self.kind, self.owner),
            );
        }
        let Some(value) = props.get(self.property) else {
            report.error(
                scope.object,
                Some(self.property),
                format!("setter '{}' requires property '{}'", self.kind, self.property),
            );
            return;
        };
        for name in props.keys().filter(|name| *name != self.property) {
            report.warning(
                scope.object,
                Some(name),
                format!("ignored by setter '{}'", self.kind),
            );
        }
        let unresolved = placeholder_keys(value);
        if !unresolved.is_empty() {
            report.warning(
                scope.object,
                Some(self.property),
                format!("unresolved placeholder(s): {}", unresolved.join(", ")),
            );
        } else if let Err(err) = self.members(props) {
            report.error(scope.object, Some(self.property), err.to_string());
        }
    }
}
