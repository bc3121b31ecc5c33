//! Application error types with MCP protocol conversion.

use rmcp::model::ErrorCode;
use thiserror::Error;

/// Application-level errors for wikidata-mcp.
#[derive(Error, Debug)]
pub enum AppError {
    // Upstream errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Domain errors
    #[error("Entity {0} not found")]
    EntityNotFound(String),

    #[error("Invalid {kind} ID '{id}': expected {expected}")]
    InvalidId {
        kind: &'static str,
        id: String,
        expected: &'static str,
    },

    #[error("Resource {0} not found")]
    ResourceNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<AppError> for rmcp::model::ErrorData {
    fn from(err: AppError) -> Self {
        let (code, app_code) = match &err {
            AppError::Http(_) => (ErrorCode::INTERNAL_ERROR, "HTTP_ERROR"),
            AppError::EntityNotFound(_) => (ErrorCode::RESOURCE_NOT_FOUND, "ENTITY_NOT_FOUND"),
            AppError::InvalidId { .. } => (ErrorCode::INVALID_PARAMS, "INVALID_ID"),
            AppError::ResourceNotFound(_) => (ErrorCode::RESOURCE_NOT_FOUND, "RESOURCE_NOT_FOUND"),
            AppError::Serialization(_) => (ErrorCode::INTERNAL_ERROR, "SERIALIZATION_ERROR"),
            AppError::Config(_) => (ErrorCode::INTERNAL_ERROR, "CONFIG_ERROR"),
        };

        rmcp::model::ErrorData::new(code, format!("[{}] {}", app_code, err), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_data_carries_app_code() {
        let data: rmcp::model::ErrorData =
            AppError::ResourceNotFound("wikidata://nope".to_string()).into();
        assert_eq!(data.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(data.message, "[RESOURCE_NOT_FOUND] Resource wikidata://nope not found");
    }
}
