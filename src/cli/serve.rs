//! HTTP server command handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use color_eyre::Result;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::Context;
use crate::mcp::McpServer;

use super::App;

/// Path the MCP streamable HTTP endpoint is mounted at.
const MCP_PATH: &str = "/mcp";

async fn root() -> Json<Value> {
    Json(json!({
        "message": format!("Wikidata MCP Server is running. Use {MCP_PATH} for MCP connections."),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Routes: banner, health check, and the MCP endpoint.
///
/// Each MCP session gets its own server instance; sessions are tracked by
/// the rmcp session manager rather than process globals.
pub(crate) fn router(ctx: Context) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(McpServer::new(ctx.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest_service(MCP_PATH, service)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

impl App {
    /// Run the MCP server with streamable HTTP transport.
    pub async fn run_serve(&self, host: Option<&str>, port: Option<u16>) -> Result<()> {
        tracing::info!("Starting Wikidata HTTP server");

        let ctx = Context::load()?;
        let host = host.unwrap_or(&ctx.config.server.host).to_string();
        let port = port.unwrap_or(ctx.config.server.port);
        let app = router(ctx);

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid address {}:{}: {}", host, port, e))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to bind to {}: {}", addr, e))?;

        tracing::info!("Wikidata HTTP server listening on http://{}{}", addr, MCP_PATH);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "HTTP server error");
                color_eyre::eyre::eyre!("HTTP server error: {}", e)
            })?;

        tracing::info!("HTTP server shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use crate::config::Config;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_and_banner() {
        let ctx = Context::connect(Config::default()).unwrap();
        let app = router(ctx);

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
