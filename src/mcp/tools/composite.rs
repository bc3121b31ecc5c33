//! Tools that chain search, metadata and SPARQL.

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

const DEFAULT_RELATED_LIMIT: u32 = 10;

/// Parameters for find_entity_facts.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindEntityFactsParams {
    /// Name of the entity to look up (e.g., "Albert Einstein").
    pub entity_name: String,
    /// Optional property name to restrict facts to (e.g., "date of birth").
    #[serde(default)]
    pub property_name: Option<String>,
}

/// Parameters for get_related_entities.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RelatedEntitiesParams {
    /// Wikidata entity ID (e.g., Q937).
    pub entity_id: String,
    /// Optional property ID of the relation (e.g., P31).
    #[serde(default)]
    pub relation_property: Option<String>,
    /// Maximum number of results (default: 10).
    #[serde(default)]
    pub limit: Option<u32>,
}

#[tool_router(router = composite_tools, vis = "pub(crate)")]
impl McpServer {
    #[tool(
        description = "Find an entity by name and return its metadata and facts, optionally restricted to one property."
    )]
    pub async fn find_entity_facts(
        &self,
        Parameters(params): Parameters<FindEntityFactsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            entity = %params.entity_name,
            property = ?params.property_name,
            "Running find_entity_facts tool"
        );

        let service = self.resolve::<LookupService>();
        let facts = service
            .find_entity_facts(&params.entity_name, params.property_name.as_deref())
            .await;
        Response(facts).into()
    }

    #[tool(description = "Find entities linked from a Wikidata entity, optionally over one relation property.")]
    pub async fn get_related_entities(
        &self,
        Parameters(params): Parameters<RelatedEntitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            id = %params.entity_id,
            relation = ?params.relation_property,
            "Running get_related_entities tool"
        );

        let service = self.resolve::<LookupService>();
        let related = service
            .related_entities(
                &params.entity_id,
                params.relation_property.as_deref(),
                params.limit.unwrap_or(DEFAULT_RELATED_LIMIT),
            )
            .await;
        Response(related).into()
    }
}
