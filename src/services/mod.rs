//! Tool-facing services.
//!
//! Services turn upstream results into tool payloads or [`ToolError`]s and
//! use the `FromContext` derive macro for dependency injection.

mod lookup;
mod queries;
mod sparql;
mod tool_error;

pub use lookup::{EntityFacts, LookupService, PropertyRef};
pub use sparql::SparqlService;
pub use tool_error::{PipelineStep, ToolError};
