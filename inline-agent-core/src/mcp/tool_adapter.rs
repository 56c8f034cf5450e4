use super::client::McpClient;
use super::McpToolDefinition;
use crate::schema::Signature;
use crate::tool::{DynTool, ToolError, ToolResult};
use futures::future::BoxFuture;
use serde_json::Value;

/// Adapter that exposes one MCP server tool as a locally invocable tool
pub struct McpToolAdapter {
    client: McpClient,
    definition: McpToolDefinition,
    /// Name reported to the agent (may carry a namespace prefix)
    exposed_name: String,
}

impl McpToolAdapter {
    pub fn new(client: McpClient, definition: McpToolDefinition, exposed_name: String) -> Self {
        Self {
            client,
            definition,
            exposed_name,
        }
    }
}

impl DynTool for McpToolAdapter {
    fn name(&self) -> &str {
        &self.exposed_name
    }

    fn documentation(&self) -> Option<&str> {
        let description = self.definition.description.as_str();
        Some(description).filter(|d| !d.is_empty())
    }

    fn signature(&self) -> Signature {
        self.definition.signature()
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn execute_raw(&self, input: Value) -> BoxFuture<'_, Result<ToolResult, ToolError>> {
        Box::pin(async move {
            // server-side name, never the prefixed one
            self.client
                .call_tool(self.definition.name.clone(), input)
                .await
                .map(ToolResult::Json)
                .map_err(|e| {
                    let server = self.client.name();
                    ToolError::Custom(format!("'{}' on {}: {}", self.exposed_name, server, e))
                })
        })
    }
}
