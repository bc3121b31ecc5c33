//! Remote SPARQL endpoint access.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::WikidataConfig;
use crate::sparql::retry::ErrorKind;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Failure reported by a [`SparqlTransport`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("SPARQL endpoint timed out: {0}")]
    Timeout(String),

    #[error("Could not reach SPARQL endpoint: {0}")]
    Connection(String),

    #[error("SPARQL endpoint rejected the query: {0}")]
    BadQuery(String),

    #[error("SPARQL request failed: {0}")]
    Other(String),
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Timeout(_) => ErrorKind::Timeout,
            TransportError::Connection(_) => ErrorKind::ConnectionError,
            TransportError::BadQuery(_) => ErrorKind::QueryBadFormed,
            TransportError::Other(_) => ErrorKind::Unknown,
        }
    }
}

/// Sends an assembled query to a SPARQL endpoint.
///
/// Implementations return the endpoint's JSON result document untouched:
/// `head` + `results.bindings` for SELECT, `head` + `boolean` for ASK.
#[async_trait]
pub trait SparqlTransport: Send + Sync {
    async fn query(&self, query: &str) -> Result<Value, TransportError>;
}

/// [`SparqlTransport`] over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpSparqlTransport {
    client: Client,
    endpoint: String,
    user_agent: String,
}

impl HttpSparqlTransport {
    pub fn new(client: Client, config: &WikidataConfig) -> Self {
        Self {
            client,
            endpoint: config.sparql_endpoint.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl SparqlTransport for HttpSparqlTransport {
    async fn query(&self, query: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .header(USER_AGENT, &self.user_agent)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_request_error)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| TransportError::Other(format!("endpoint returned non-JSON body: {e}")))
    }
}

fn classify_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

/// Maps a non-success response onto a transport error.
///
/// Blazegraph reports parse errors as 400 with a `MalformedQueryException`
/// stack trace, and query timeouts as 500 with `TimeoutException`.
fn classify_status(status: StatusCode, body: &str) -> TransportError {
    let detail = first_line(body);
    let message = format!("{status}: {detail}");

    if status == StatusCode::BAD_REQUEST || body.contains("MalformedQueryException") {
        TransportError::BadQuery(message)
    } else if body.contains("TimeoutException") || status == StatusCode::GATEWAY_TIMEOUT {
        TransportError::Timeout(message)
    } else {
        TransportError::Other(message)
    }
}

fn first_line(body: &str) -> &str {
    body.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("<empty body>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_query_is_bad_query() {
        let body = "SPARQL-QUERY: queryStr=SELECT\n\
                    java.util.concurrent.ExecutionException: \
                    org.openrdf.query.MalformedQueryException: Encountered \" \"}\" \"";
        let err = classify_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.kind(), ErrorKind::QueryBadFormed);

        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(err.kind(), ErrorKind::QueryBadFormed);
    }

    #[test]
    fn test_endpoint_timeout_is_timeout() {
        let body = "java.util.concurrent.TimeoutException\n\tat java.util.concurrent.FutureTask.get";
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(
            err.to_string(),
            "SPARQL endpoint timed out: 500 Internal Server Error: java.util.concurrent.TimeoutException"
        );
    }

    #[test]
    fn test_other_server_errors_are_unknown() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("<empty body>"));

        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded");
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }
}
