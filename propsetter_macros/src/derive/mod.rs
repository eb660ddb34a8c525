//! Expansion of `#[derive(PropertyTarget)]`.

mod crate_path;
mod generate;
mod parse;
#[cfg(test)]
mod tests;

use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Parse `input` and emit the trait implementation.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    Ok(generate::property_target_impl(&parsed))
}
