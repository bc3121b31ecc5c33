//! SPARQL service: validated execution and the built-in property listing.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromContext;
use crate::services::queries;
use crate::services::tool_error::ToolError;
use crate::sparql::{validate, SparqlExecutor};
use crate::wikidata;

/// Upper bound on property/value pairs returned by [`SparqlService::entity_properties`].
const PROPERTIES_LIMIT: u32 = 50;

/// Runs SPARQL on behalf of tools.
///
/// Caller-supplied text is validated before it reaches the executor;
/// built-in queries go straight to the executor.
#[derive(FromContext, Clone)]
pub struct SparqlService {
    executor: SparqlExecutor,
    config: Arc<Config>,
}

impl SparqlService {
    pub fn language(&self) -> &str {
        &self.config.wikidata.language
    }

    /// Validates and executes a caller-supplied query.
    pub async fn execute(&self, query: &str) -> Result<Value, ToolError> {
        let verdict = validate(query);
        if !verdict.valid {
            tracing::info!(error = ?verdict.error, "Rejected SPARQL query before execution");
            return Err(ToolError::validation(&verdict));
        }

        self.executor.execute(query).await.into_result().map_err(|failure| {
            tracing::warn!(
                kind = %failure.kind,
                attempts = failure.attempts,
                "SPARQL execution failed"
            );
            ToolError::execution(&failure)
        })
    }

    /// Property/value pairs of `entity_id`.
    pub async fn entity_properties(&self, entity_id: &str) -> Result<Value, ToolError> {
        let id = wikidata::entity_id(entity_id).map_err(ToolError::invalid_id)?;
        let query = queries::entity_properties(id, self.language(), PROPERTIES_LIMIT);

        self.executor
            .execute(&query)
            .await
            .into_result()
            .map_err(|failure| ToolError::properties_failed(id, &failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::config::RetryConfig;
    use crate::di::FromRef;
    use crate::error::AppError;
    use crate::sparql::{SparqlTransport, TransportError};
    use crate::wikidata::{EntityMetadata, WikidataApi};

    struct NoApi;

    #[async_trait]
    impl WikidataApi for NoApi {
        async fn search_entity(&self, _query: &str) -> Result<Option<String>, AppError> {
            unreachable!("search_entity")
        }

        async fn search_property(&self, _query: &str) -> Result<Option<String>, AppError> {
            unreachable!("search_property")
        }

        async fn get_entity_metadata(&self, _id: &str) -> Result<EntityMetadata, AppError> {
            unreachable!("get_entity_metadata")
        }
    }

    // Fails every call with the configured error, or succeeds when there is none.
    struct CountingTransport {
        calls: AtomicUsize,
        fail_with_bad_query: bool,
    }

    #[async_trait]
    impl SparqlTransport for CountingTransport {
        async fn query(&self, _query: &str) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_with_bad_query {
                Err(TransportError::BadQuery("400 Bad Request".into()))
            } else {
                Ok(json!({"head": {"vars": ["s"]}, "results": {"bindings": []}}))
            }
        }
    }

    fn service(fail_with_bad_query: bool) -> (SparqlService, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
            fail_with_bad_query,
        });
        let mut config = Config::default();
        config.retry = RetryConfig {
            max_attempts: 3,
            initial_backoff_ms: 1,
        };
        let ctx = Context::new(config, Arc::new(NoApi), transport.clone());
        (SparqlService::from_ref(&ctx), transport)
    }

    #[tokio::test]
    async fn test_invalid_query_never_reaches_transport() {
        let (service, transport) = service(false);

        let err = service.execute("SELECT ?s WHERE { ?s ?p ?o").await.unwrap_err();

        assert_eq!(err.error, "SPARQL query validation failed");
        assert_eq!(err.error_type.as_deref(), Some("ValidationError"));
        assert_eq!(
            err.details.as_deref(),
            Some("Unclosed opening bracket/parenthesis/brace: '{'")
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_syntax_error_is_reported_once() {
        let (service, transport) = service(true);

        let err = service.execute("SELECT ?s WHERE { ?s ?p ?o . }").await.unwrap_err();

        assert_eq!(err.error, "SPARQL query execution failed.");
        assert_eq!(err.error_type.as_deref(), Some("QueryBadFormed"));
        assert_eq!(err.query.as_deref(), Some("SELECT ?s WHERE { ?s ?p ?o . }"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entity_properties_rejects_bad_id() {
        let (service, transport) = service(false);

        let err = service.entity_properties("Albert Einstein").await.unwrap_err();

        assert_eq!(err.error_type.as_deref(), Some("InvalidId"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);

        let ok = service.entity_properties("Q937").await.unwrap();
        assert!(ok["results"]["bindings"].is_array());
    }
}
