//! Unit tests for the conversion table and the property bag.

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use rstest::rstest;

use super::{FromProperty, IntoProperty, PropertyBag, PropertyTarget};
use crate::ConfigError;
use crate::value::PropertyValue;

#[rstest]
#[case::word("TRUE", true)]
#[case::yes("yes", true)]
#[case::zero("0", false)]
fn booleans_accept_common_spellings(#[case] text: &str, #[case] expected: bool) -> Result<()> {
    let parsed = bool::from_property("global", &text.into())?;
    ensure!(parsed == expected, "{text} parsed as {parsed}");
    Ok(())
}

#[rstest]
#[case::bool_word("maybe")]
#[case::bool_list("[]")]
fn invalid_booleans_report_the_property(#[case] text: &str) {
    let err = bool::from_property("global", &text.into()).expect_err("conversion must fail");
    assert!(
        matches!(err.as_ref(), ConfigError::Conversion { property, .. } if property == "global"),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn integers_reject_non_scalars() {
    let value = PropertyValue::scalars(["1"]);
    assert!(u32::from_property("maxItems", &value).is_err());
    assert!(u32::from_property("maxItems", &"-1".into()).is_err());
}

#[rstest]
#[case::null(PropertyValue::Null, None)]
#[case::blank(PropertyValue::scalar("  "), None)]
#[case::value(PropertyValue::scalar("7"), Some(7))]
fn options_treat_blank_as_absent(
    #[case] value: PropertyValue,
    #[case] expected: Option<u32>,
) -> Result<()> {
    let parsed = Option::<u32>::from_property("maxItems", &value)?;
    ensure!(parsed == expected, "got {parsed:?}");
    ensure!(parsed.to_property().is_null() == expected.is_none(), "render mismatch");
    Ok(())
}

#[rstest]
#[case::sequence(PropertyValue::scalars(["a", "b"]))]
#[case::comma_separated(PropertyValue::scalar("a, b,"))]
fn lists_accept_sequences_and_csv(#[case] value: PropertyValue) -> Result<()> {
    let parsed = Vec::<String>::from_property("states", &value)?;
    ensure!(parsed == ["a", "b"], "got {parsed:?}");
    Ok(())
}

#[rstest]
fn tables_require_scalar_entries() -> Result<()> {
    let good = PropertyValue::Mapping(BTreeMap::from([("k".to_owned(), "v".into())]));
    let parsed = BTreeMap::<String, String>::from_property("variables", &good)?;
    ensure!(parsed.get("k").map(String::as_str) == Some("v"), "got {parsed:?}");

    let bad = PropertyValue::Mapping(BTreeMap::from([(
        "k".to_owned(),
        PropertyValue::scalars(["v"]),
    )]));
    ensure!(
        BTreeMap::<String, String>::from_property("variables", &bad).is_err(),
        "nested list accepted"
    );
    Ok(())
}

#[rstest]
fn bag_reports_changes_only_once() -> Result<()> {
    let mut bag = PropertyBag::default();
    ensure!(bag.set_property("anything", &"1".into())?, "first set unchanged");
    ensure!(!bag.set_property("anything", &"1".into())?, "repeat set changed");
    ensure!(bag.has_property("whatever"), "bag must accept any name");
    ensure!(bag.clear_property("anything")?, "clear unchanged");
    ensure!(bag.values().is_empty(), "bag not empty");
    Ok(())
}
