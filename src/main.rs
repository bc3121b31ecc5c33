//! Wikidata MCP Server

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wikidata_mcp::cli::App;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let app = App::parse();

    // stdout carries the stdio MCP transport, so logs go to stderr
    let default = if app.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    app.run().await
}
