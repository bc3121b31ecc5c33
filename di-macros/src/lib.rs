//! Compile-time dependency injection derives for wikidata-mcp.
//!
//! - `#[derive(Context)]` exposes every field of a context struct through
//!   `FromRef`.
//! - `#[derive(FromContext)]` builds a service by resolving each of its
//!   fields from a context.
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! define or re-export that trait at its root.

use proc_macro::TokenStream;

mod context;
mod fields;
mod from_context;

/// Generates `impl crate::FromRef<Ctx> for FieldType` for every named field.
///
/// Field types must be `Clone` and pairwise distinct, otherwise the
/// generated impls overlap.
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub config: Arc<Config>,
///     pub transport: Arc<dyn SparqlTransport>,
/// }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}

/// Generates `impl crate::FromRef<Context> for Self`, resolving each field
/// with `<FieldType as FromRef<Context>>::from_ref(ctx)`.
///
/// The context type defaults to `Context` and can be overridden with
/// `#[from_context(Context = "OtherContext")]`.
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct SparqlService {
///     transport: Arc<dyn SparqlTransport>,
///     config: Arc<Config>,
/// }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::derive_from_context_impl(input)
}
