//! MCP server implementation for Wikidata.

use std::sync::Arc;

use rmcp::{
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        ServerHandler,
    },
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        ListResourcesResult, PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    prompt_handler,
    service::RequestContext,
    tool_handler, ErrorData as McpError, RoleServer,
};

use crate::context::Context;
use crate::di::FromRef;
use crate::error::AppError;
use crate::mcp::resources;

/// Wikidata MCP Server.
///
/// Exposes entity search, metadata lookup and SPARQL execution as tools,
/// reference material as resources, and research workflows as prompts.
#[derive(Clone)]
pub struct McpServer {
    pub(crate) ctx: Arc<Context>,
    tool_router: ToolRouter<McpServer>,
    prompt_router: PromptRouter<McpServer>,
}

impl McpServer {
    /// Create a new Wikidata MCP server with the given context.
    pub fn new(ctx: Context) -> Self {
        tracing::info!("Initializing Wikidata MCP server");

        Self {
            ctx: Arc::new(ctx),
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Build the combined tool router from all tool modules.
    fn tool_router() -> ToolRouter<Self> {
        Self::search_tools() + Self::sparql_tools() + Self::composite_tools()
    }

    /// Resolve a dependency from the context.
    ///
    /// Services are built per call, so no state is shared between tool
    /// invocations.
    pub fn resolve<T: FromRef<Context>>(&self) -> T {
        T::from_ref(&self.ctx)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
#[prompt_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                r#"Wikidata MCP Server

Answers questions from Wikidata's knowledge graph instead of model memory.

## Lookup Tools

- **search_wikidata_entity** - Entity ID for a name (e.g., "Albert Einstein" -> "Q937")
- **search_wikidata_property** - Property ID for a name (e.g., "instance of" -> "P31")
- **get_wikidata_metadata** - Label and description of an entity

## SPARQL Tools

- **execute_wikidata_sparql** - Run a SPARQL query. Standard prefixes are added when none are declared; transient failures are retried.
- **get_wikidata_properties** - Property/value pairs of an entity

## Composite Tools

- **find_entity_facts** - Search, metadata and facts in one call, optionally for one property
- **get_related_entities** - Entities linked from an entity

## Resources

- **wikidata://common-properties** - Frequently used property IDs
- **wikidata://sparql-examples** - Example queries

Errors are JSON objects with `error` and `suggestion` fields.
"#
                .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list()))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        tracing::info!(uri = %uri, "Reading resource");

        let body = resources::read(&uri).ok_or_else(|| AppError::ResourceNotFound(uri.clone()))?;
        let text = serde_json::to_string_pretty(&body).map_err(AppError::from)?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::config::Config;
    use crate::sparql::{SparqlTransport, TransportError};
    use crate::wikidata::{EntityMetadata, WikidataApi};

    struct Offline;

    #[async_trait]
    impl WikidataApi for Offline {
        async fn search_entity(&self, _query: &str) -> Result<Option<String>, AppError> {
            Ok(None)
        }

        async fn search_property(&self, _query: &str) -> Result<Option<String>, AppError> {
            Ok(None)
        }

        async fn get_entity_metadata(&self, id: &str) -> Result<EntityMetadata, AppError> {
            Err(AppError::EntityNotFound(id.to_string()))
        }
    }

    #[async_trait]
    impl SparqlTransport for Offline {
        async fn query(&self, _query: &str) -> Result<Value, TransportError> {
            Err(TransportError::Connection("offline".into()))
        }
    }

    fn server() -> McpServer {
        McpServer::new(Context::new(
            Config::default(),
            Arc::new(Offline),
            Arc::new(Offline),
        ))
    }

    #[test]
    fn test_advertises_tools_prompts_and_resources() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_routes_every_tool() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "execute_wikidata_sparql",
                "find_entity_facts",
                "get_related_entities",
                "get_wikidata_metadata",
                "get_wikidata_properties",
                "search_wikidata_entity",
                "search_wikidata_property",
            ]
        );
    }
}
