//! `#[derive(FromContext)]`: build a service by resolving every field.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Type};

use crate::fields::named_fields;

pub fn derive_from_context_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let fields = match named_fields(&input, "FromContext") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };
    let context = match context_type(&input) {
        Ok(Some(ty)) => quote! { #ty },
        Ok(None) => quote! { Context },
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let inits = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let ty = &field.ty;
        Some(quote! { #ident: <#ty as crate::FromRef<#context>>::from_ref(ctx) })
    });

    quote! {
        impl #impl_generics crate::FromRef<#context> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &#context) -> Self {
                Self { #(#inits),* }
            }
        }
    }
    .into()
}

/// Reads `#[from_context(Context = "Path")]`, if present.
fn context_type(input: &DeriveInput) -> syn::Result<Option<Type>> {
    let mut found = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("from_context")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("Context") {
                let value: syn::LitStr = meta.value()?.parse()?;
                found = Some(value.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `Context = \"Type\"`"))
            }
        })?;
    }
    Ok(found)
}
