//! MCP protocol response helpers.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::services::ToolError;

/// Tool outcome rendered as a single JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub is_error: bool,
}

/// Tool response that serializes the success value or the [`ToolError`].
///
/// Failures become `isError` results carrying the error body, never
/// protocol-level errors, so clients always receive parseable JSON.
///
/// # Example
///
/// ```ignore
/// let id = service.search_entity("Douglas Adams").await;
/// Response(id).into()  // "\"Q42\"" or {"error": ..., "suggestion": ...}
/// ```
pub struct Response<T>(pub Result<T, ToolError>);

impl<T: Serialize> Response<T> {
    pub fn render(self) -> Rendered {
        let err = match self.0 {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(text) => {
                    return Rendered {
                        text,
                        is_error: false,
                    }
                }
                Err(e) => ToolError::serialization(&e),
            },
            Err(err) => err,
        };

        let text = serde_json::to_string(&err).unwrap_or_else(|_| {
            serde_json::json!({"error": err.error, "suggestion": err.suggestion}).to_string()
        });
        Rendered {
            text,
            is_error: true,
        }
    }
}

impl<T: Serialize> From<Response<T>> for Result<CallToolResult, rmcp::model::ErrorData> {
    fn from(response: Response<T>) -> Self {
        let rendered = response.render();
        let content = vec![Content::text(rendered.text)];
        Ok(if rendered.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_render_as_json_strings() {
        let rendered = Response(Ok("Q42".to_string())).render();
        assert_eq!(rendered.text, "\"Q42\"");
        assert!(!rendered.is_error);
    }

    #[test]
    fn test_errors_render_as_objects() {
        let rendered = Response::<String>(Err(ToolError::no_property("birthdate"))).render();
        assert!(rendered.is_error);

        let value: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
        assert_eq!(value["error"], "No property found on Wikidata.");
        assert!(value["suggestion"].is_string());
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result: Result<CallToolResult, rmcp::model::ErrorData> =
            Response::<()>(Err(ToolError::no_entity("x"))).into();
        assert_eq!(result.unwrap().is_error, Some(true));
    }
}
