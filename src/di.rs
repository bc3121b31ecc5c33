//! Dependency injection infrastructure.
//!
//! Services are assembled at compile time from the root [`Context`]:
//!
//! - `FromRef<T>` extracts a value from `&T`.
//! - `#[derive(Context)]` makes each context field extractable.
//! - `#[derive(FromContext)]` builds a service by extracting each of its fields.
//!
//! ```ignore
//! #[derive(FromContext, Clone)]
//! pub struct SparqlService {
//!     transport: AppTransport, // FromRef<Context> from #[derive(Context)]
//!     config: Arc<Config>,
//! }
//!
//! let service = SparqlService::from_ref(&ctx);
//! ```
//!
//! [`Context`]: crate::context::Context

/// Extracts `Self` from a reference to `T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any `Clone` type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use di_macros::{Context, FromContext};
