use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

mod cell;
mod record;

/// Derive macro for the `Record` trait.
///
/// Every named field becomes a column, in declaration order. A field whose
/// type derives `Record` is flattened into sibling columns.
///
/// # Example
///
/// ```ignore
/// use csvane_core::Record;
///
/// #[derive(Default, Record)]
/// struct Person {
///     #[csv(rename = "Name")]
///     name: String,
///     age: u32,
///     #[csv(skip)]
///     cached: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[csv(rename = "name")]` - Column name, defaults to the field name
/// - `#[csv(skip)]` or `#[csv(rename = "-")]` - Do not bind this field
///
/// Fields whose name starts with `_` are never bound.
#[proc_macro_derive(Record, attributes(csv))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record::derive_record_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive macro binding a type as a single column converted by its own
/// `FromCell` and `ToCell` implementations.
///
/// # Example
///
/// ```ignore
/// use csvane_core::{Cell, CellError, FromCell, ToCell};
///
/// #[derive(Default, Cell)]
/// struct Cents(i64);
///
/// impl FromCell for Cents { /* ... */ }
/// impl ToCell for Cents { /* ... */ }
/// ```
///
/// # Attributes
///
/// - `#[csv(parse_only)]` - Only `FromCell` is implemented; the column cannot be encoded
/// - `#[csv(format_only)]` - Only `ToCell` is implemented; the column cannot be decoded
#[proc_macro_derive(Cell, attributes(csv))]
pub fn derive_cell(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match cell::derive_cell_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn build_where_clause(
    generics: &syn::Generics,
    existing: Option<&syn::WhereClause>,
) -> proc_macro2::TokenStream {
    let type_params: Vec<_> = generics.type_params().map(|p| &p.ident).collect();

    if type_params.is_empty() && existing.is_none() {
        return quote! {};
    }

    let bind_bounds = type_params.iter().map(|p| {
        quote! { #p: ::csvane_core::Bind }
    });

    let existing_predicates = existing
        .map(|w| {
            let predicates = &w.predicates;
            quote! { #predicates, }
        })
        .unwrap_or_default();

    quote! {
        where
            #existing_predicates
            #(#bind_bounds),*
    }
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("csv") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else {
                return Err(meta.error("expected `skip` or `rename = \"...\"`"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
