use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::build_where_clause;

#[derive(Default)]
struct CellAttrs {
    parse_only: bool,
    format_only: bool,
}

fn parse_cell_attrs(input: &DeriveInput) -> syn::Result<CellAttrs> {
    let mut result = CellAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("csv") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("parse_only") {
                result.parse_only = true;
            } else if meta.path.is_ident("format_only") {
                result.format_only = true;
            } else {
                return Err(meta.error("expected `parse_only` or `format_only`"));
            }
            Ok(())
        })?;
    }

    if result.parse_only && result.format_only {
        return Err(syn::Error::new_spanned(
            input,
            "`parse_only` and `format_only` are mutually exclusive",
        ));
    }

    Ok(result)
}

/// Generates `impl Bind` as a single custom-converted column.
pub fn derive_cell_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let where_clause = build_where_clause(&input.generics, where_clause);
    let attrs = parse_cell_attrs(input)?;

    // An omitted capability leaves its accessor unused.
    let (get_mut, parse) = if attrs.format_only {
        (quote! { _get_mut }, quote! {})
    } else {
        (quote! { get_mut }, quote! { .parse_with(get_mut) })
    };
    let (get, format) = if attrs.parse_only {
        (quote! { _get }, quote! {})
    } else {
        (quote! { get }, quote! { .format_with(get) })
    };

    Ok(quote! {
        impl #impl_generics ::csvane_core::Bind for #name #ty_generics #where_clause {
            fn bind<P: 'static>(
                #get: fn(&P) -> &Self,
                #get_mut: fn(&mut P) -> &mut Self,
            ) -> ::csvane_core::Binding<P> {
                ::csvane_core::Binding::Leaf(
                    ::csvane_core::Leaf::new(
                        ::csvane_core::Coercion::Custom,
                        ::std::any::type_name::<Self>(),
                    )
                    #parse
                    #format
                )
            }
        }
    })
}
