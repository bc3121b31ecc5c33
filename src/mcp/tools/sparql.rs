//! SPARQL tools.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router, ErrorData as McpError,
};
use serde::Deserialize;

use crate::mcp::protocol::Response;
use crate::mcp::server::McpServer;
use crate::mcp::tools::search::EntityIdParams;
use crate::services::SparqlService;

/// Parameters for execute_wikidata_sparql.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSparqlParams {
    /// SPARQL query to run. Standard prefixes (wd, wdt, p, ps, wikibase, bd)
    /// are added when the query declares none.
    pub sparql_query: String,
}

#[tool_router(router = sparql_tools, vis = "pub(crate)")]
impl McpServer {
    #[tool(
        description = "Execute a SPARQL query against Wikidata. The query is checked for common syntax mistakes first; transient endpoint failures are retried."
    )]
    pub async fn execute_wikidata_sparql(
        &self,
        Parameters(params): Parameters<ExecuteSparqlParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(len = params.sparql_query.len(), "Running execute_wikidata_sparql tool");

        let service = self.resolve::<SparqlService>();
        Response(service.execute(&params.sparql_query).await).into()
    }

    #[tool(description = "Get property/value pairs of a Wikidata entity (up to 50, with labels).")]
    pub async fn get_wikidata_properties(
        &self,
        Parameters(params): Parameters<EntityIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(id = %params.entity_id, "Running get_wikidata_properties tool");

        let service = self.resolve::<SparqlService>();
        Response(service.entity_properties(&params.entity_id).await).into()
    }
}
