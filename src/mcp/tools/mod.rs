//! MCP tool implementations organized by capability.

pub mod composite;
pub mod search;
pub mod sparql;
