//! Entity and property search tools.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router, ErrorData as McpError,
};
use serde::Deserialize;

use crate::mcp::protocol::Response;
use crate::mcp::server::McpServer;
use crate::services::LookupService;

/// Parameters for the search tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Name to search for (e.g., "Albert Einstein", "instance of").
    pub query: String,
}

/// Parameters for get_wikidata_metadata.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntityIdParams {
    /// Wikidata entity ID (e.g., Q937).
    pub entity_id: String,
}

#[tool_router(router = search_tools, vis = "pub(crate)")]
impl McpServer {
    #[tool(
        description = "Search for a Wikidata entity by name. Returns the entity ID (e.g., \"Q937\") as a JSON string."
    )]
    pub async fn search_wikidata_entity(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(query = %params.query, "Running search_wikidata_entity tool");

        let service = self.resolve::<LookupService>();
        Response(service.search_entity(&params.query).await).into()
    }

    #[tool(
        description = "Search for a Wikidata property by name. Returns the property ID (e.g., \"P31\") as a JSON string."
    )]
    pub async fn search_wikidata_property(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(query = %params.query, "Running search_wikidata_property tool");

        let service = self.resolve::<LookupService>();
        Response(service.search_property(&params.query).await).into()
    }

    #[tool(description = "Get the label and description of a Wikidata entity.")]
    pub async fn get_wikidata_metadata(
        &self,
        Parameters(params): Parameters<EntityIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(id = %params.entity_id, "Running get_wikidata_metadata tool");

        let service = self.resolve::<LookupService>();
        Response(service.metadata(&params.entity_id).await).into()
    }
}
