//! Input parsing for the `PropertyTarget` derive.

use heck::{ToKebabCase, ToLowerCamelCase};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Lit};

/// One field exposed as a property.
pub(crate) struct PropertyField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    pub property: String,
}

/// Everything generation needs, validated up front.
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub target_name: String,
    pub crate_path: Option<syn::Path>,
    pub fields: Vec<PropertyField>,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
}

/// Collect the struct identifier and its exposed fields.
///
/// Fails fast on tuple structs, enums, unknown attribute keys and duplicate
/// property names.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let ident = input.ident.clone();
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "PropertyTarget requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "PropertyTarget can only be derived for structs",
            ));
        }
    };

    let mut fields: Vec<PropertyField> = Vec::new();
    for field in named {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(field_ident) = field.ident.clone() else {
            continue;
        };
        let property = attrs.rename.unwrap_or_else(|| {
            field_ident
                .to_string()
                .trim_start_matches("r#")
                .to_lower_camel_case()
        });
        if fields.iter().any(|existing| existing.property == property) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate property name '{property}'"),
            ));
        }
        fields.push(PropertyField {
            ident: field_ident,
            ty: field.ty.clone(),
            property,
        });
    }

    Ok(ParsedInput {
        target_name: ident.to_string().to_kebab_case(),
        ident,
        generics: input.generics.clone(),
        crate_path: parse_crate_path(&input.attrs)?,
        fields,
    })
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("property")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                out.rename = Some(lit_str(&meta, "rename")?);
                Ok(())
            } else {
                Err(meta.error("unknown property attribute; expected `rename` or `skip`"))
            }
        })?;
    }
    Ok(out)
}

fn parse_crate_path(attrs: &[Attribute]) -> syn::Result<Option<syn::Path>> {
    let mut out = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("property_target")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let raw = lit_str(&meta, "crate")?;
                out = Some(syn::parse_str::<syn::Path>(&raw)?);
                Ok(())
            } else {
                Err(meta.error("unknown property_target attribute; expected `crate`"))
            }
        })?;
    }
    Ok(out)
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<String> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) if !s.value().trim().is_empty() => Ok(s.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a non-empty string"),
        )),
    }
}
