//! CLI module for wikidata-mcp.
//!
//! Subcommands:
//! - `mcp`: Run the MCP server (stdio transport)
//! - `serve`: Run the MCP server (HTTP transport)
//! - `validate`: Check and prepare a SPARQL query offline
//! - `query`: Run a SPARQL query against Wikidata

mod mcp;
mod query;
mod serve;

use clap::{Parser, Subcommand};

pub use query::QueryInput;

/// Wikidata MCP server
#[derive(Parser)]
#[command(name = "wikidata-mcp")]
#[command(about = "MCP server connecting language models to Wikidata")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the MCP server (stdio transport for local use)
    Mcp,

    /// Run the MCP server (HTTP transport for remote access)
    Serve {
        /// Host address to bind to [default: server.host from config]
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on [default: server.port from config]
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a SPARQL query and print it as it would be sent
    Validate(QueryInput),

    /// Run a SPARQL query against Wikidata and print the result
    Query(QueryInput),
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Mcp => self.run_mcp().await,
            Command::Serve { ref host, port } => self.run_serve(host.as_deref(), port).await,
            Command::Validate(ref input) => input.run_validate(),
            Command::Query(ref input) => input.run_query().await,
        }
    }
}
