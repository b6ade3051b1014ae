//! Helper functions for MCP tools

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use serde::Serialize;

use numtriad::TriadError;

/// Caller errors become invalid_params, everything else internal_error.
/// The error kind travels in the data field.
pub fn to_mcp_error(err: TriadError) -> McpError {
    let data = Some(serde_json::json!({ "kind": err.kind() }));
    match err {
        TriadError::InvalidInput(_)
        | TriadError::DuplicateDocument(_)
        | TriadError::DocumentNotFound(_) => McpError::invalid_params(err.to_string(), data),
        TriadError::ScorerUnavailable(_) | TriadError::Backend(_) => {
            McpError::internal_error(err.to_string(), data)
        }
    }
}

/// Pretty JSON tool result
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let output = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(output)]))
}
