//! Integration tests against the live Wikidata API and query service.
//!
//! These tests require network access to wikidata.org.
//! Run with: `cargo test --features integration --test wikidata_integration`

#![cfg(feature = "integration")]

use serial_test::serial;
use wikidata_mcp::config::Config;
use wikidata_mcp::context::Context;
use wikidata_mcp::services::{LookupService, SparqlService};
use wikidata_mcp::sparql::{ErrorKind, ExecutionOutcome, RetryPolicy, SparqlExecutor};
use wikidata_mcp::FromRef;

fn context() -> Context {
    Context::connect(Config::default()).expect("Failed to build HTTP clients")
}

// Requests run one at a time to stay well inside the public rate limits.
#[serial]
mod live_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_and_metadata() {
        let lookup = LookupService::from_ref(&context());

        let id = lookup.search_entity("Douglas Adams").await.unwrap();
        assert_eq!(id, "Q42");

        let metadata = lookup.metadata(&id).await.unwrap();
        assert_eq!(metadata.label, "Douglas Adams");

        let property = lookup.search_property("instance of").await.unwrap();
        assert_eq!(property, "P31");
    }

    #[tokio::test]
    async fn test_ask_without_prefixes() {
        let sparql = SparqlService::from_ref(&context());

        let result = sparql
            .execute("ASK { wd:Q42 wdt:P31 wd:Q5 . }")
            .await
            .unwrap();
        assert_eq!(result["boolean"], true);
    }

    #[tokio::test]
    async fn test_prose_is_stripped_before_execution() {
        let sparql = SparqlService::from_ref(&context());
        let query = "Here is a query that lists two humans.\n\
                     SELECT ?item WHERE {\n\
                     ?item wdt:P31 wd:Q5 .\n\
                     }\n\
                     LIMIT 2\n\
                     Hope this helps.";

        let result = sparql.execute(query).await.unwrap();
        assert!(result["results"]["bindings"].as_array().unwrap().len() <= 2);
    }

    #[tokio::test]
    async fn test_endpoint_syntax_error_is_terminal() {
        let ctx = context();
        let executor = SparqlExecutor::new(ctx.transport.clone(), RetryPolicy::default());

        // Passes line filtering but is not valid SPARQL.
        let outcome = executor.execute("SELECT ?s WHERE { ?s ?p }").await;

        let ExecutionOutcome::Failure(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, ErrorKind::QueryBadFormed);
        assert_eq!(failure.attempts, 1);
    }

    #[tokio::test]
    async fn test_find_entity_facts() {
        let lookup = LookupService::from_ref(&context());

        let facts = lookup
            .find_entity_facts("Albert Einstein", Some("date of birth"))
            .await
            .unwrap();

        assert_eq!(facts.entity.id, "Q937");
        assert_eq!(facts.property.unwrap().id, "P569");
        assert!(!facts.facts["results"]["bindings"]
            .as_array()
            .unwrap()
            .is_empty());
    }
}
