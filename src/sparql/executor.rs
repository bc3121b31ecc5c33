//! SPARQL execution with sanitization, prefix injection and retries.

use std::sync::Arc;

use serde_json::Value;

use crate::sparql::prefixes::inject_prefixes;
use crate::sparql::retry::{ErrorKind, RetryPolicy, Step};
use crate::sparql::sanitizer::sanitize;
use crate::sparql::transport::SparqlTransport;

/// Why an execution gave up.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionFailure {
    /// Terminal classification: `QueryBadFormed` or `MaxRetriesExceeded`.
    pub kind: ErrorKind,
    /// Message of the last underlying error.
    pub message: String,
    /// Query as the caller supplied it, before sanitization.
    pub query: String,
    /// Number of attempts made.
    pub attempts: u32,
    /// Kind of the last transient error when retries ran out.
    pub last_error: Option<ErrorKind>,
}

/// Result of [`SparqlExecutor::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The endpoint's result document, unchanged.
    Success(Value),
    Failure(ExecutionFailure),
}

impl ExecutionOutcome {
    pub fn into_result(self) -> Result<Value, ExecutionFailure> {
        match self {
            ExecutionOutcome::Success(value) => Ok(value),
            ExecutionOutcome::Failure(failure) => Err(failure),
        }
    }
}

/// Runs queries against a [`SparqlTransport`] under a [`RetryPolicy`].
///
/// The executor holds no mutable state; retry counters live on the stack
/// of each [`execute`](Self::execute) call.
#[derive(Clone)]
pub struct SparqlExecutor {
    transport: Arc<dyn SparqlTransport>,
    policy: RetryPolicy,
}

impl SparqlExecutor {
    pub fn new(transport: Arc<dyn SparqlTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Sanitizes, prefixes and executes `query`.
    ///
    /// Never fails: every error is classified into
    /// [`ExecutionOutcome::Failure`].
    pub async fn execute(&self, query: &str) -> ExecutionOutcome {
        let sanitized = sanitize(query);
        for line in &sanitized.dropped {
            tracing::debug!(line = %line, "Dropped non-SPARQL line");
        }
        if !sanitized.dropped.is_empty() {
            tracing::warn!(dropped = sanitized.dropped.len(), "Sanitizer removed lines from query");
        }

        let prepared = inject_prefixes(&sanitized.text);
        let mut state = self.policy.start();

        loop {
            let err = match self.transport.query(&prepared).await {
                Ok(value) => return ExecutionOutcome::Success(value),
                Err(err) => err,
            };

            let kind = err.kind();
            let attempt = state.attempt + 1;
            tracing::warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                kind = %kind,
                error = %err,
                "SPARQL attempt failed"
            );

            match self.policy.on_failure(state, kind) {
                Step::Retry { delay, next } => {
                    tracing::debug!(delay_ms = delay.as_millis() as u64, "Backing off");
                    tokio::time::sleep(delay).await;
                    state = next;
                }
                Step::GiveUp { kind: terminal } => {
                    let (message, last_error) = match terminal {
                        ErrorKind::MaxRetriesExceeded => (
                            format!(
                                "Error executing query (attempt {attempt}/{}): {err}",
                                self.policy.max_attempts
                            ),
                            Some(kind),
                        ),
                        _ => (format!("SPARQL Query Syntax Error: {err}"), None),
                    };

                    return ExecutionOutcome::Failure(ExecutionFailure {
                        kind: terminal,
                        message,
                        query: query.to_string(),
                        attempts: attempt,
                        last_error,
                    });
                }
            }
        }
    }
}
