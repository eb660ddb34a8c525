//! Token generation for the `PropertyTarget` implementation.

use proc_macro2::TokenStream;
use quote::quote;

use super::crate_path;
use super::parse::ParsedInput;

/// Emit `impl PropertyTarget for <struct>`.
pub(crate) fn property_target_impl(input: &ParsedInput) -> TokenStream {
    let krate = crate_path::resolve(input.crate_path.as_ref());
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let target_name = &input.target_name;
    let names = input.fields.iter().map(|f| &f.property);

    let get_arms = input.fields.iter().map(|f| {
        let (field, property) = (&f.ident, &f.property);
        quote! {
            #property => ::core::result::Result::Ok(
                #krate::target::IntoProperty::to_property(&self.#field)
            ),
        }
    });
    let set_arms = input.fields.iter().map(|f| {
        let (field, ty, property) = (&f.ident, &f.ty, &f.property);
        quote! {
            #property => {
                let next = <#ty as #krate::target::FromProperty>::from_property(name, value)?;
                ::core::result::Result::Ok(#krate::target::replace(&mut self.#field, next))
            }
        }
    });
    let clear_arms = input.fields.iter().map(|f| {
        let (field, ty, property) = (&f.ident, &f.ty, &f.property);
        quote! {
            #property => ::core::result::Result::Ok(#krate::target::replace(
                &mut self.#field,
                <#ty as ::core::default::Default>::default(),
            )),
        }
    });

    quote! {
        impl #impl_generics #krate::target::PropertyTarget for #ident #ty_generics #where_clause {
            fn target_name(&self) -> &'static str {
                #target_name
            }

            fn property_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn get_property(
                &self,
                name: &str,
            ) -> #krate::ConfigResult<#krate::value::PropertyValue> {
                match name {
                    #(#get_arms)*
                    _ => #krate::target::unknown(#target_name, name),
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: &#krate::value::PropertyValue,
            ) -> #krate::ConfigResult<bool> {
                match name {
                    #(#set_arms)*
                    _ => #krate::target::unknown(#target_name, name),
                }
            }

            fn clear_property(&mut self, name: &str) -> #krate::ConfigResult<bool> {
                match name {
                    #(#clear_arms)*
                    _ => #krate::target::unknown(#target_name, name),
                }
            }
        }
    }
}
