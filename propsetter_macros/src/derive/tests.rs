//! Tests for `PropertyTarget` input parsing and token generation.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::expand;
use super::parse::parse_input;

#[rstest]
fn property_names_default_to_lower_camel_case() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct LocationScheme {
            #[property(skip)]
            name: String,
            content_type: String,
            #[property(rename = "rank")]
            sort_rank: u32,
        }
    };
    let parsed = parse_input(&input).map_err(|err| anyhow!("parse failed: {err}"))?;
    let names: Vec<&str> = parsed.fields.iter().map(|f| f.property.as_str()).collect();
    ensure!(names == ["contentType", "rank"], "unexpected names {names:?}");
    ensure!(
        parsed.target_name == "location-scheme",
        "unexpected target name {}",
        parsed.target_name
    );
    Ok(())
}

#[rstest]
#[case::tuple(parse_quote! { struct Slot(String); }, "named fields")]
#[case::enumeration(parse_quote! { enum Slot { A } }, "only be derived for structs")]
#[case::unknown_key(
    parse_quote! { struct Slot { #[property(flatten)] label: String } },
    "unknown property attribute"
)]
#[case::empty_rename(
    parse_quote! { struct Slot { #[property(rename = "")] label: String } },
    "non-empty string"
)]
#[case::duplicate(
    parse_quote! {
        struct Slot {
            label: String,
            #[property(rename = "label")]
            caption: String,
        }
    },
    "duplicate property name"
)]
fn invalid_input_is_rejected(#[case] input: DeriveInput, #[case] expected: &str) -> Result<()> {
    let Err(err) = parse_input(&input) else {
        return Err(anyhow!("expected parse failure"));
    };
    ensure!(
        err.to_string().contains(expected),
        "unexpected error message: {err}"
    );
    Ok(())
}

#[rstest]
fn generated_impl_routes_every_field() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Slot {
            label: String,
            max_items: Option<u32>,
        }
    };
    let tokens = expand(&input)
        .map_err(|err| anyhow!("expansion failed: {err}"))?
        .to_string();
    for needle in [
        "impl propsetter :: target :: PropertyTarget for Slot",
        "\"label\" =>",
        "\"maxItems\" =>",
        "propsetter :: target :: unknown (\"slot\" , name)",
    ] {
        ensure!(tokens.contains(needle), "missing `{needle}` in {tokens}");
    }
    Ok(())
}

#[rstest]
fn crate_attribute_overrides_generated_paths() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[property_target(crate = "crate")]
        struct Slot {
            label: String,
        }
    };
    let tokens = expand(&input)
        .map_err(|err| anyhow!("expansion failed: {err}"))?
        .to_string();
    ensure!(
        tokens.contains("impl crate :: target :: PropertyTarget for Slot"),
        "crate path not applied: {tokens}"
    );
    Ok(())
}
