use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::ext::IdentExt;

use crate::{build_where_clause, parse_field_attrs};

/// Generates `impl Record` (the field table) and `impl Bind` (flattening).
pub fn derive_record_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let where_clause = build_where_clause(&input.generics, where_clause);

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        syn::Data::Enum(_) => {
            return Err(syn::Error::new_spanned(input, "Record cannot be derived for enums"));
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(input, "Record cannot be derived for unions"));
        }
    };

    let defs = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let attrs = parse_field_attrs(&field.attrs)?;
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let ident_str = ident.unraw().to_string();
            let ty = &field.ty;

            let tag = match &attrs.rename {
                Some(rename) => quote! { ::std::option::Option::Some(#rename) },
                None => quote! { ::std::option::Option::None },
            };

            let ignored = attrs.skip
                || attrs.rename.as_deref() == Some("-")
                || ident_str.starts_with('_');
            let binding = if ignored {
                quote! { ::csvane_core::Binding::Ignored }
            } else {
                quote! {
                    <#ty as ::csvane_core::Bind>::bind::<Self>(
                        |record| &record.#ident,
                        |record| &mut record.#ident,
                    )
                }
            };

            Ok(quote! {
                ::csvane_core::FieldDef::new(#ident_str, #tag, #index, #binding)
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::csvane_core::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::csvane_core::FieldDef<Self>> {
                ::std::vec![#(#defs),*]
            }
        }

        impl #impl_generics ::csvane_core::Bind for #name #ty_generics #where_clause {
            fn bind<P: 'static>(
                get: fn(&P) -> &Self,
                get_mut: fn(&mut P) -> &mut Self,
            ) -> ::csvane_core::Binding<P> {
                ::csvane_core::Binding::nested(get, get_mut)
            }
        }
    })
}
