//! Procedural macros for `propsetter`.
//!
//! The [`PropertyTarget`] derive replaces runtime reflection with a generated
//! `match` over a struct's named fields. Each arm converts through the
//! `FromProperty` / `IntoProperty` table so a bad value surfaces as a
//! conversion error rather than a silently miscast field.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `propsetter::target::PropertyTarget`.
///
/// Field attributes:
/// - `#[property(rename = "name")]` overrides the property name, which
///   otherwise is the field name in lower camel case.
/// - `#[property(skip)]` keeps the field out of the generated accessors.
///
/// Struct attribute `#[property_target(crate = "path")]` overrides the path
/// generated code uses to reach the `propsetter` crate.
#[proc_macro_derive(PropertyTarget, attributes(property, property_target))]
pub fn derive_property_target(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
