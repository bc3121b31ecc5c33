//! Structured error returned to MCP clients.

use serde::Serialize;

use crate::sparql::{ErrorKind, ExecutionFailure, Verdict};
use crate::wikidata::EntityMetadata;

const RETRY_LATER: &str = "Check your network connection or try a different search query.";

/// Step of a composite lookup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    EntitySearch,
    Metadata,
    PropertySearch,
    Sparql,
}

/// JSON error body every tool can return.
///
/// Always carries a plain-language `error` and an actionable `suggestion`;
/// the remaining fields are filled in where they apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error_type: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<PipelineStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_found: Option<EntityMetadata>,
    #[serde(
        rename = "error_searching_property",
        skip_serializing_if = "Option::is_none"
    )]
    pub cause: Option<Box<ToolError>>,
    pub suggestion: String,
}

impl ToolError {
    pub fn new(error: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            original_error_message: None,
            error_type: None,
            original_error_type: None,
            query: None,
            original_query: None,
            failed_step: None,
            context: None,
            entity_found: None,
            cause: None,
            suggestion: suggestion.into(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_entity(mut self, entity: EntityMetadata) -> Self {
        self.entity_found = Some(entity);
        self
    }

    pub fn with_cause(mut self, cause: ToolError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Marks the composite step this error came from. Keeps the first mark.
    pub fn at(mut self, step: PipelineStep) -> Self {
        self.failed_step.get_or_insert(step);
        self
    }

    // Search

    pub fn entity_search_failed(details: impl Into<String>) -> Self {
        Self::new("Failed to search Wikidata entity.", RETRY_LATER).with_details(details)
    }

    pub fn no_entity(query: &str) -> Self {
        Self::new(
            "No entity found on Wikidata.",
            "Try alternative spellings, more general or specific terms, or ensure the entity exists on Wikidata.",
        )
        .with_details(format!("The query '{query}' did not return any results."))
    }

    pub fn property_search_failed(details: impl Into<String>) -> Self {
        Self::new("Failed to search Wikidata property.", RETRY_LATER).with_details(details)
    }

    pub fn no_property(query: &str) -> Self {
        Self::new(
            "No property found on Wikidata.",
            "Try alternative spellings, or ensure the property exists on Wikidata (e.g., check common properties list).",
        )
        .with_details(format!(
            "The query '{query}' did not return any results for a property."
        ))
    }

    pub fn metadata_failed(entity_id: &str, details: impl Into<String>) -> Self {
        Self::new(
            format!("Failed to get metadata for entity ID '{entity_id}'."),
            "The entity ID might be invalid, the entity may not exist, or there could be an issue with the metadata service.",
        )
        .with_details(details)
    }

    // SPARQL

    /// Query rejected locally, before any network call.
    pub fn validation(verdict: &Verdict) -> Self {
        let mut err = Self::new(
            "SPARQL query validation failed",
            verdict
                .suggestion
                .clone()
                .unwrap_or_else(|| "Review the query syntax.".to_string()),
        );
        err.details = verdict.error.clone();
        err.error_type = Some("ValidationError".to_string());
        err
    }

    /// Execution of a caller-supplied query gave up.
    pub fn execution(failure: &ExecutionFailure) -> Self {
        let suggestion = match failure.kind {
            ErrorKind::QueryBadFormed => "The SPARQL query syntax is incorrect. Please check for typos, keyword misuse, or structural issues. Refer to SPARQL documentation or use a SPARQL validator for assistance.".to_string(),
            ErrorKind::Timeout => "The query execution timed out. Try simplifying the query, adding or adjusting LIMIT/OFFSET clauses, or reducing its complexity. Executing it at a later time might also help.".to_string(),
            ErrorKind::ConnectionError => "A network connection error occurred while trying to reach the SPARQL endpoint. Please check your internet connection and try again later.".to_string(),
            ErrorKind::MaxRetriesExceeded => format!(
                "The query failed after multiple retries due to repeated '{}'. This could be due to network issues or endpoint overload. Try again later. Original error: {}",
                failure.last_error.map_or("transient issues", ErrorKind::as_str),
                failure.message
            ),
            ErrorKind::Unknown => "Please review your query and the error details.".to_string(),
        };

        let mut err = Self::new("SPARQL query execution failed.", suggestion);
        err.original_error_message = Some(failure.message.clone());
        err.error_type = Some(failure.kind.to_string());
        err.original_error_type = failure.last_error;
        err.query = Some(failure.query.clone());
        err
    }

    /// Execution of the built-in properties query gave up.
    pub fn properties_failed(entity_id: &str, failure: &ExecutionFailure) -> Self {
        let suggestion = match failure.kind {
            ErrorKind::QueryBadFormed => "The underlying SPARQL query for fetching properties might be malformed (unlikely for default queries) or there's an issue with the entity ID affecting the query.",
            ErrorKind::Timeout | ErrorKind::ConnectionError | ErrorKind::MaxRetriesExceeded => {
                "Fetching properties failed due to network issues or timeout. Please try again later."
            }
            ErrorKind::Unknown => "Review the error details. If it's a query issue, the default query for properties might be failing for this entity.",
        };

        let mut err = Self::new(
            format!("Failed to get properties for entity ID '{entity_id}'."),
            suggestion,
        )
        .with_details(failure.message.clone());
        err.error_type = Some(failure.kind.to_string());
        err.original_error_type = failure.last_error;
        err.original_query = Some(failure.query.clone());
        err
    }

    /// An identifier failed its format check.
    pub fn invalid_id(err: impl std::fmt::Display) -> Self {
        let mut tool_err = Self::new(
            err.to_string(),
            "Use an identifier returned by search_wikidata_entity (Q…) or search_wikidata_property (P…).",
        );
        tool_err.error_type = Some("InvalidId".to_string());
        tool_err
    }

    /// A tool result could not be rendered as JSON.
    pub fn serialization(err: &serde_json::Error) -> Self {
        Self::new(
            "Failed to serialize tool result.",
            "This indicates an internal issue with the server's response formatting.",
        )
        .with_details(err.to_string())
    }
}
