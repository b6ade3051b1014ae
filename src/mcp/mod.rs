//! MCP server for triad scoring and retrieval
//!
//! One scorer, chosen at startup, and one shared in-memory index.

mod helpers;
mod params;
mod server;
mod types;

pub use server::run_mcp_server;
