//! SPARQL query pipeline.
//!
//! Caller text flows through [`validate`] (on the original text), then
//! [`sanitize`], [`inject_prefixes`] and finally [`SparqlExecutor`], which
//! retries transient endpoint failures.

pub mod executor;
pub mod prefixes;
pub mod retry;
pub mod sanitizer;
pub mod transport;
pub mod validator;

pub use executor::{ExecutionFailure, ExecutionOutcome, SparqlExecutor};
pub use prefixes::{inject_prefixes, prefix_block, STANDARD_PREFIXES};
pub use retry::{ErrorKind, RetryPolicy, RetryState, Step};
pub use sanitizer::{sanitize, Sanitized, CLAUSE_KEYWORDS};
pub use transport::{HttpSparqlTransport, SparqlTransport, TransportError};
pub use validator::{validate, Verdict};
