//! wikidata-mcp - Wikidata MCP Server
//!
//! Connects language models to Wikidata through MCP tools: entity and
//! property search, metadata lookup, and SPARQL execution with query
//! cleanup, validation and retries.

pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod mcp;
pub mod services;
pub mod sparql;
pub mod wikidata;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
