//! Test utilities for inline-agent-core.
//!
//! Mock collaborators for exercising action groups without AWS credentials
//! or a running MCP server.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! inline-agent-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use inline_agent_core::identity::Identity;
//! use inline_agent_core::test_utils::MockIdentityProvider;
//! use inline_agent_core::ExecutorResolver;
//!
//! # async fn example() {
//! let provider = MockIdentityProvider::new(Identity::new("111122223333", "us-west-2"));
//! let resolver = ExecutorResolver::new(provider.clone());
//!
//! let arn = resolver.lambda_arn("HotelFn").await.unwrap();
//! assert_eq!(arn, "arn:aws:lambda:us-west-2:111122223333:function:HotelFn");
//! assert_eq!(provider.call_count(), 1);
//! # }
//! ```

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::identity::{Identity, IdentityError, IdentityProvider};
use crate::mcp::{McpError, McpToolDefinition, McpToolSource};
use crate::schema::{FunctionDefinition, Signature};
use crate::tool::{DynTool, ToolError, ToolResult};

/// A mock identity provider that counts lookups.
///
/// Clones share the counter, so keep one clone to inspect after handing the
/// other to a resolver.
#[derive(Clone)]
pub struct MockIdentityProvider {
    response: Result<Identity, IdentityError>,
    call_count: Arc<Mutex<usize>>,
}

impl MockIdentityProvider {
    /// Provider that always succeeds with `identity`
    pub fn new(identity: Identity) -> Self {
        Self {
            response: Ok(identity),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Provider whose lookups always fail with [`IdentityError::Unavailable`]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(IdentityError::Unavailable(reason.into())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of lookups made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn identity(&self) -> Result<Identity, IdentityError> {
        *self.call_count.lock().unwrap() += 1;
        self.response.clone()
    }
}

/// A mock MCP tool source with a fixed catalog.
///
/// Every tool echoes its input back as JSON, tagged with the tool name.
///
/// ```rust
/// use inline_agent_core::mcp::{McpToolDefinition, McpToolSource};
/// use inline_agent_core::test_utils::MockMcpSource;
/// use serde_json::json;
///
/// let source = MockMcpSource::new("hotel")
///     .with_tool(McpToolDefinition::new("book_room", "Book a room", json!({})));
/// assert_eq!(source.name(), "hotel");
/// ```
#[derive(Clone)]
pub struct MockMcpSource {
    name: String,
    tools: Vec<McpToolDefinition>,
    failure: Option<String>,
}

impl MockMcpSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            failure: None,
        }
    }

    /// Add a tool to the catalog
    pub fn with_tool(mut self, tool: McpToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add a tool with no parameters
    pub fn with_simple_tool(self, name: &str, description: &str) -> Self {
        self.with_tool(McpToolDefinition::new(
            name,
            description,
            json!({"type": "object", "properties": {}}),
        ))
    }

    /// Make every catalog request fail as if the server were unreachable
    pub fn unreachable(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    fn check_reachable(&self) -> Result<(), McpError> {
        match &self.failure {
            Some(reason) => Err(McpError::Connection(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl McpToolSource for MockMcpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn callable_tools(&self) -> Result<Vec<Arc<dyn DynTool>>, McpError> {
        self.check_reachable()?;
        Ok(self
            .tools
            .iter()
            .map(|definition| {
                Arc::new(EchoTool(definition.clone())) as Arc<dyn DynTool>
            })
            .collect())
    }

    async fn function_schema(&self) -> Result<Vec<FunctionDefinition>, McpError> {
        self.check_reachable()?;
        Ok(self
            .tools
            .iter()
            .map(McpToolDefinition::to_function_definition)
            .collect())
    }
}

/// Catalog entry of a [`MockMcpSource`]
struct EchoTool(McpToolDefinition);

impl DynTool for EchoTool {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn documentation(&self) -> Option<&str> {
        Some(&self.0.description)
    }

    fn signature(&self) -> Signature {
        self.0.signature()
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn execute_raw(&self, input: Value) -> BoxFuture<'_, Result<ToolResult, ToolError>> {
        Box::pin(async move {
            let echoed = json!({"tool": self.0.name, "input": input});
            Ok(ToolResult::Json(echoed))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_identity_provider() {
        let provider = MockIdentityProvider::new(Identity::placeholder());
        let clone = provider.clone();

        assert_eq!(clone.identity().await.unwrap(), Identity::placeholder());
        assert_eq!(provider.call_count(), 1);

        let failing = MockIdentityProvider::failing("denied");
        assert!(failing.identity().await.is_err());
        assert_eq!(failing.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_mcp_source() {
        let source = MockMcpSource::new("hotel")
            .with_simple_tool("list_rooms", "List rooms")
            .with_simple_tool("book_room", "Book a room");

        let tools = source.callable_tools().await.unwrap();
        assert_eq!(tools.len(), 2);

        let result = tools[1].execute_raw(json!({"room": 12})).await.unwrap();
        assert_eq!(
            result,
            ToolResult::Json(json!({"tool": "book_room", "input": {"room": 12}}))
        );

        let functions = source.function_schema().await.unwrap();
        assert_eq!(functions[0].name, "list_rooms");
    }

    #[tokio::test]
    async fn test_unreachable_source() {
        let source = MockMcpSource::new("down").unreachable("connection refused");
        assert!(matches!(
            source.callable_tools().await,
            Err(McpError::Connection(_))
        ));
        assert!(source.function_schema().await.is_err());
    }
}
