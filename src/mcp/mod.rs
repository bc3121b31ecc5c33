//! Model Context Protocol (MCP) server implementation for Wikidata.
//!
//! ## Architecture
//!
//! The server uses compile-time dependency injection via the `Context` struct.
//! Services are resolved at tool execution time using `FromRef`.
//!
//! ## Modules
//!
//! - `server`: MCP server implementation with tool and prompt routers
//! - `tools`: Tool implementations organized by capability
//! - `resources`: Static reference resources
//! - `prompts`: Prompt templates
//! - `protocol`: Tool response rendering

mod prompts;
pub(crate) mod protocol;
mod resources;
pub(crate) mod server;
mod tools;

pub use protocol::{Rendered, Response};
pub use server::McpServer;
