//! Unit tests for setter strategies and the no-op rule.

use std::sync::Arc;

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};

use super::{
    AssociationSetter, FieldOverridesSetter, PropertySetter, Setter, SetterRegistry,
    SetterTarget, ValidationScope,
};
use crate::association::{AssociationOp, AssociationSets, AssociationType};
use crate::model::{DesignObject, FieldOverride, ObjectKey, ObjectType};
use crate::reconcile::ObjectState;
use crate::target::{PropertyBag, PropertyTarget};
use crate::validate::ValidationReport;
use crate::value::{PropertyMap, PropertyValue};

fn props<const N: usize>(entries: [(&str, PropertyValue); N]) -> PropertyMap {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}

fn object(object_type: ObjectType, name: &str) -> Result<DesignObject> {
    Ok(DesignObject::create(
        &ObjectKey::new(object_type, name),
        &PropertyMap::new(),
    )?)
}

#[fixture]
fn article() -> DesignObject {
    DesignObject::create(
        &ObjectKey::new(ObjectType::ContentType, "Article"),
        &PropertyMap::new(),
    )
    .expect("content types need no extras")
}

fn property_setter(current: PropertyMap, prev: PropertyMap) -> Setter {
    Setter::new(Arc::new(PropertySetter), current, prev)
}

#[rstest]
fn current_state_sets_each_property(mut article: DesignObject) -> Result<()> {
    let setter = property_setter(
        props([("label", "Article".into()), ("visibility", "hidden".into())]),
        PropertyMap::new(),
    );
    let mut assoc = AssociationSets::default();
    let changed = setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Current,
        &mut assoc,
    )?;
    ensure!(changed, "expected a change");
    ensure!(article.get_property("label")? == "Article".into(), "label not set");
    ensure!(
        article.get_property("visibility")? == "hidden".into(),
        "visibility not set"
    );
    ensure!(assoc.is_empty(), "property setter queued associations");
    Ok(())
}

#[rstest]
fn reapplying_same_values_reports_no_change(mut article: DesignObject) -> Result<()> {
    let setter = property_setter(props([("label", "Article".into())]), PropertyMap::new());
    let mut assoc = AssociationSets::default();
    let mut target = SetterTarget::Object(&mut article);
    ensure!(
        setter.apply_properties(&mut target, ObjectState::Current, &mut assoc)?,
        "first apply unchanged"
    );
    ensure!(
        !setter.apply_properties(&mut target, ObjectState::Current, &mut assoc)?,
        "second apply changed"
    );
    Ok(())
}

#[rstest]
fn both_state_clears_properties_dropped_since_last_run(
    mut article: DesignObject,
) -> Result<()> {
    article.set_property("label", &"Old".into())?;
    article.set_property("description", &"Gone soon".into())?;
    let setter = property_setter(
        props([("label", "New".into()), ("iconPath", "${missing}".into())]),
        props([
            ("label", "Old".into()),
            ("description", "Gone soon".into()),
            ("iconPath", "/icons/a.png".into()),
        ]),
    );
    let mut assoc = AssociationSets::default();
    setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Both,
        &mut assoc,
    )?;
    ensure!(article.get_property("label")? == "New".into(), "label not updated");
    ensure!(
        article.get_property("description")? == "".into(),
        "dropped property kept"
    );
    ensure!(
        article.get_property("iconPath")?.is_null(),
        "unresolved property was not cleared"
    );
    Ok(())
}

#[rstest]
fn unresolved_placeholder_is_skipped_in_current_state(mut article: DesignObject) -> Result<()> {
    article.set_property("label", &"Kept".into())?;
    let setter = property_setter(props([("label", "${nowhere}".into())]), PropertyMap::new());
    let changed = setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Current,
        &mut AssociationSets::default(),
    )?;
    ensure!(!changed, "unresolved value changed the object");
    ensure!(article.get_property("label")? == "Kept".into(), "label overwritten");
    Ok(())
}

#[rstest]
fn previous_state_undoes_previous_properties(mut article: DesignObject) -> Result<()> {
    article.set_property("label", &"Article".into())?;
    let setter = property_setter(
        props([("label", "Article".into())]),
        props([("label", "Article".into())]),
    );
    let changed = setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Previous,
        &mut AssociationSets::default(),
    )?;
    ensure!(changed, "undo reported no change");
    ensure!(article.get_property("label")? == "".into(), "label not reset");
    Ok(())
}

#[rstest]
#[case::current(ObjectState::Current)]
#[case::previous(ObjectState::Previous)]
#[case::both(ObjectState::Both)]
fn empty_setter_is_a_no_op(mut article: DesignObject, #[case] state: ObjectState) -> Result<()> {
    let before = article.clone();
    let mut setter = property_setter(
        props([("label", "X".into())]),
        props([("label", "Y".into())]),
    );
    setter.clear();
    let changed = setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        state,
        &mut AssociationSets::default(),
    )?;
    ensure!(!changed, "cleared setter reported a change");
    ensure!(article == before, "cleared setter touched the object");
    Ok(())
}

#[rstest]
fn unknown_property_fails_at_apply(mut article: DesignObject) {
    let setter = property_setter(props([("colour", "red".into())]), PropertyMap::new());
    let result = setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Current,
        &mut AssociationSets::default(),
    );
    assert!(result.is_err());
}

#[rstest]
fn global_properties_accept_any_name() -> Result<()> {
    let mut bag = PropertyBag::default();
    let setter = property_setter(props([("mail.host", "smtp".into())]), PropertyMap::new());
    setter.apply_properties(
        &mut SetterTarget::Globals(&mut bag),
        ObjectState::Current,
        &mut AssociationSets::default(),
    )?;
    ensure!(
        bag.values().get("mail.host") == Some(&"smtp".into()),
        "global property missing"
    );
    Ok(())
}

#[rstest]
fn templates_setter_queues_only_the_difference(mut article: DesignObject) -> Result<()> {
    let setter = Setter::new(
        Arc::new(AssociationSetter::templates()),
        props([("templates", PropertyValue::scalars(["Full", "Teaser"]))]),
        props([("templates", "Full, Legacy".into())]),
    );
    let mut assoc = AssociationSets::default();
    ensure!(
        setter.apply_properties(
            &mut SetterTarget::Object(&mut article),
            ObjectState::Both,
            &mut assoc,
        )?,
        "no association queued"
    );
    let merged = assoc.bucket(AssociationType::ContentTypeTemplate, AssociationOp::Merge);
    let deleted = assoc.bucket(AssociationType::ContentTypeTemplate, AssociationOp::Delete);
    ensure!(merged.len() == 1 && merged[0].members == ["Teaser"], "{merged:?}");
    ensure!(deleted.len() == 1 && deleted[0].members == ["Legacy"], "{deleted:?}");
    ensure!(deleted[0].owner == "Article", "wrong owner");
    Ok(())
}

#[rstest]
#[case::templates(
    AssociationSetter::templates(),
    ObjectType::ContentType,
    props([("templates", "Full, Teaser".into())])
)]
#[case::slot_contents(
    AssociationSetter::slot_contents(),
    ObjectType::Slot,
    props([(
        "contents",
        PropertyValue::Sequence(vec![PropertyValue::pair("Article".into(), "Teaser".into())]),
    )])
)]
fn unchanged_members_queue_nothing(
    #[case] strategy: AssociationSetter,
    #[case] owner: ObjectType,
    #[case] members: PropertyMap,
) -> Result<()> {
    let mut target = object(owner, "Owner")?;
    let setter = Setter::new(Arc::new(strategy), members.clone(), members);
    let mut assoc = AssociationSets::default();
    let changed = setter.apply_properties(
        &mut SetterTarget::Object(&mut target),
        ObjectState::Both,
        &mut assoc,
    )?;
    ensure!(!changed, "re-applying the same members reported a change");
    ensure!(assoc.is_empty(), "{assoc:?}");
    Ok(())
}

#[rstest]
fn association_setters_reject_other_targets() -> Result<()> {
    let setter = Setter::new(
        Arc::new(AssociationSetter::templates()),
        props([("templates", "Full".into())]),
        PropertyMap::new(),
    );
    let mut assoc = AssociationSets::default();
    let mut page = object(ObjectType::Template, "Page")?;
    let err = setter
        .apply_properties(&mut SetterTarget::Object(&mut page), ObjectState::Current, &mut assoc)
        .expect_err("templates applied to a template");
    ensure!(err.to_string().contains("Page"), "{err}");

    let mut bag = PropertyBag::default();
    let err = setter
        .apply_properties(&mut SetterTarget::Globals(&mut bag), ObjectState::Current, &mut assoc)
        .expect_err("templates applied to globals");
    ensure!(err.to_string().ends_with("not global properties"), "{err}");
    ensure!(assoc.is_empty(), "{assoc:?}");
    Ok(())
}

#[rstest]
fn slot_contents_encode_pairs() -> Result<()> {
    let mut slot = object(ObjectType::Slot, "Sidebar")?;
    let setter = Setter::new(
        Arc::new(AssociationSetter::slot_contents()),
        props([(
            "contents",
            PropertyValue::Sequence(vec![PropertyValue::pair("Article".into(), "Teaser".into())]),
        )]),
        PropertyMap::new(),
    );
    let mut assoc = AssociationSets::default();
    setter.apply_properties(
        &mut SetterTarget::Object(&mut slot),
        ObjectState::Current,
        &mut assoc,
    )?;
    let merged = assoc.bucket(AssociationType::SlotContent, AssociationOp::Merge);
    ensure!(merged[0].members == ["Article:Teaser"], "{merged:?}");
    Ok(())
}

#[rstest]
fn association_setter_rejects_wrong_owner() -> Result<()> {
    let mut site = object(ObjectType::Site, "Main")?;
    let setter = Setter::new(
        Arc::new(AssociationSetter::templates()),
        props([("templates", "Full".into())]),
        PropertyMap::new(),
    );
    let result = setter.apply_properties(
        &mut SetterTarget::Object(&mut site),
        ObjectState::Current,
        &mut AssociationSets::default(),
    );
    ensure!(result.is_err(), "site accepted a template association");
    Ok(())
}

fn override_group(field: &str, label: &str) -> PropertyValue {
    PropertyValue::Mapping(props([("field", field.into()), ("label", label.into())]))
}

#[rstest]
fn field_overrides_upsert_and_remove(mut article: DesignObject) -> Result<()> {
    let setter = Setter::new(
        Arc::new(FieldOverridesSetter),
        props([(
            "overrides",
            PropertyValue::Sequence(vec![
                override_group("title", "Headline"),
                override_group("body", "Text"),
            ]),
        )]),
        props([(
            "overrides",
            PropertyValue::Sequence(vec![
                override_group("title", "Title"),
                override_group("summary", "Summary"),
            ]),
        )]),
    );
    if let DesignObject::ContentType(ct) = &mut article {
        ct.field_overrides = vec![
            FieldOverride {
                field: "title".into(),
                label: "Title".into(),
                required: false,
            },
            FieldOverride {
                field: "summary".into(),
                label: "Summary".into(),
                required: false,
            },
        ];
    }
    setter.apply_properties(
        &mut SetterTarget::Object(&mut article),
        ObjectState::Both,
        &mut AssociationSets::default(),
    )?;
    let DesignObject::ContentType(ct) = &article else {
        anyhow::bail!("object changed family");
    };
    let fields: Vec<(&str, &str)> = ct
        .field_overrides
        .iter()
        .map(|o| (o.field.as_str(), o.label.as_str()))
        .collect();
    ensure!(fields == [("title", "Headline"), ("body", "Text")], "{fields:?}");

    setter.deapply_properties(
        &mut SetterTarget::Object(&mut article),
        &mut AssociationSets::default(),
    )?;
    let DesignObject::ContentType(ct) = &article else {
        anyhow::bail!("object changed family");
    };
    ensure!(ct.field_overrides.is_empty(), "overrides survived de-apply");
    Ok(())
}

#[rstest]
fn validation_reports_unknown_properties_and_conversions() {
    let setter = property_setter(
        props([
            ("colour", "red".into()),
            ("visibility", "secret".into()),
            ("label", "${later}".into()),
        ]),
        PropertyMap::new(),
    );
    let mut report = ValidationReport::default();
    setter.validate(
        ValidationScope {
            object_type: Some(ObjectType::ContentType),
            object: "content-type/Article",
        },
        &mut report,
    );
    assert_eq!(report.errors().count(), 2);
    assert_eq!(report.warnings().count(), 1);
}

#[rstest]
#[case::boolean("global")]
#[case::list("slots")]
#[case::text("mimeType")]
fn validation_accepts_null_like_apply(#[case] name: &str) -> Result<()> {
    let setter = property_setter(props([(name, PropertyValue::Null)]), PropertyMap::new());
    let mut report = ValidationReport::default();
    setter.validate(
        ValidationScope {
            object_type: Some(ObjectType::Template),
            object: "template/Page",
        },
        &mut report,
    );
    ensure!(!report.has_errors(), "{report:?}");

    let mut page = object(ObjectType::Template, "Page")?;
    setter.apply_properties(
        &mut SetterTarget::Object(&mut page),
        ObjectState::Current,
        &mut AssociationSets::default(),
    )?;
    Ok(())
}

#[rstest]
fn validation_flags_duplicate_override_fields() {
    let setter = Setter::new(
        Arc::new(FieldOverridesSetter),
        props([(
            "overrides",
            PropertyValue::Sequence(vec![override_group("a", "A"), override_group("a", "B")]),
        )]),
        PropertyMap::new(),
    );
    let mut report = ValidationReport::default();
    setter.validate(
        ValidationScope {
            object_type: Some(ObjectType::ContentType),
            object: "content-type/Article",
        },
        &mut report,
    );
    assert!(report.has_errors());
}

#[rstest]
fn registry_knows_builtins_and_rejects_unknown_kinds() {
    let registry = SetterRegistry::default();
    let kinds: Vec<_> = registry.kinds().collect();
    assert_eq!(
        kinds,
        [
            "field-overrides",
            "property",
            "slot-contents",
            "templates",
            "workflow-content-types"
        ]
    );
    let err = registry.get("teleport").expect_err("unknown kind accepted");
    assert!(err.to_string().contains("teleport"));
}
