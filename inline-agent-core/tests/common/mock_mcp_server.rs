//! Helpers for spawning the hotel-reservations mock MCP server

use inline_agent_core::mcp::{McpClient, McpServerConfig, McpTransport};

/// Path of the mock server binary built alongside the tests
pub fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_mock_mcp_server")
}

/// Server configuration that spawns the mock over stdio
pub fn config() -> McpServerConfig {
    McpServerConfig::new("hotel", McpTransport::stdio(binary()))
}

/// Client for the mock server (not yet connected)
pub fn client() -> McpClient {
    McpClient::new(config())
}
