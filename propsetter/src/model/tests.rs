//! Unit tests for design objects and their generated accessors.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::{ContentType, DesignObject, GeneratorKind, ObjectKey, ObjectType, Visibility};
use crate::ConfigError;
use crate::target::PropertyTarget;
use crate::value::{PropertyMap, PropertyValue};

#[rstest]
fn object_types_parse_their_identifiers() -> Result<()> {
    for ty in ObjectType::ALL {
        let parsed: ObjectType = ty.as_str().parse()?;
        ensure!(parsed == ty, "{ty} parsed as {parsed}");
    }
    ensure!("page".parse::<ObjectType>().is_err(), "unknown type accepted");
    Ok(())
}

#[rstest]
fn generated_accessors_convert_and_detect_changes() -> Result<()> {
    let mut ct = ContentType::default();
    ensure!(ct.property_names().contains(&"iconPath"), "missing iconPath");
    ensure!(!ct.property_names().contains(&"name"), "skipped field exposed");

    ensure!(ct.set_property("visibility", &"Private".into())?, "no change");
    ensure!(ct.visibility == Visibility::Private, "visibility not stored");
    ensure!(!ct.set_property("visibility", &"private".into())?, "reported spurious change");
    ensure!(
        ct.get_property("visibility")? == PropertyValue::scalar("private"),
        "unexpected rendering"
    );

    ensure!(ct.clear_property("visibility")?, "clear unchanged");
    ensure!(ct.visibility == Visibility::Public, "clear did not reset");
    Ok(())
}

#[rstest]
fn unknown_properties_name_the_family() {
    let mut ct = ContentType::default();
    let err = ct
        .set_property("colour", &"red".into())
        .expect_err("unknown property accepted");
    assert!(
        matches!(
            err.as_ref(),
            ConfigError::UnknownProperty { object_type, property }
                if object_type == "content-type" && property == "colour"
        ),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn renamed_fields_use_their_property_name() -> Result<()> {
    let key = ObjectKey::new(ObjectType::Site, "main");
    let mut site = DesignObject::create(&key, &PropertyMap::new())?;
    ensure!(site.set_property("url", &"https://example.com".into())?, "url unchanged");
    ensure!(site.set_property("baseUrl", &"x".into()).is_err(), "field name accepted");
    ensure!(site.key() == key, "key mismatch");
    Ok(())
}

#[rstest]
fn location_schemes_copy_handler_extras() -> Result<()> {
    let key = ObjectKey::new(ObjectType::LocationScheme, "article-page");
    let extra = PropertyMap::from([
        ("context".to_owned(), "Publish".into()),
        ("contentType".to_owned(), "Article".into()),
        ("template".to_owned(), "Page".into()),
    ]);
    let DesignObject::LocationScheme(scheme) = DesignObject::create(&key, &extra)? else {
        anyhow::bail!("wrong family created");
    };
    ensure!(scheme.content_type == "Article", "extra not copied");
    ensure!(scheme.generator == GeneratorKind::Expression, "unexpected default");
    Ok(())
}

#[rstest]
fn location_schemes_require_every_extra() {
    let key = ObjectKey::new(ObjectType::LocationScheme, "article-page");
    let extra = PropertyMap::from([("context".to_owned(), "Publish".into())]);
    let err = DesignObject::create(&key, &extra).expect_err("missing extras accepted");
    assert!(err.to_string().contains("contentType"), "unexpected error {err}");
}

#[rstest]
fn design_objects_serialise_with_a_type_tag() -> Result<()> {
    let object = DesignObject::create(&ObjectKey::new(ObjectType::Slot, "sidebar"), &PropertyMap::new())?;
    let json = serde_json::to_value(&object)?;
    ensure!(json["type"] == "slot", "unexpected tag in {json}");
    let back: DesignObject = serde_json::from_value(json)?;
    ensure!(back == object, "round trip changed object");
    Ok(())
}
