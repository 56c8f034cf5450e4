//! MCP (Model Context Protocol) tool sources
//!
//! An MCP-backed action group does not list its tools inline. Each attached
//! [`McpToolSource`] exposes its own catalog: the callables merged into the
//! collection's tool map, and the function definitions merged into the
//! group's serialized function schema.
//!
//! With the `mcp` feature, [`McpClient`] implements the trait over the `rmcp`
//! crate, connecting to servers over stdio or streamable HTTP.
//!
//! ```rust,ignore
//! use inline_agent_core::mcp::{McpClient, McpServerConfig, McpTransport};
//! use inline_agent_core::ActionGroup;
//! use std::sync::Arc;
//!
//! let client = McpClient::new(McpServerConfig::new(
//!     "hotel",
//!     McpTransport::stdio("npx").args(["-y", "@example/hotel-mcp"]),
//! ));
//!
//! let group = ActionGroup::builder("HotelMcp")
//!     .mcp_client(Arc::new(client))
//!     .build()?;
//! ```

#[cfg(feature = "mcp")]
mod client;
#[cfg(feature = "mcp")]
pub(crate) mod tool_adapter;
#[cfg(feature = "mcp")]
mod transport;

#[cfg(feature = "mcp")]
pub use client::McpClient;
#[cfg(feature = "mcp")]
pub use transport::{HttpTransport, McpServerConfig, McpTransport, StdioTransport};

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::schema::{Confirmation, FunctionDefinition, ParameterDetail, Signature};
use crate::tool::DynTool;

#[derive(Debug, Error)]
pub enum McpError {
    /// Handshake failed, or the session is gone
    #[error("connection failed: {0}")]
    Connection(String),

    /// Unusable server settings, such as a malformed header
    #[error("invalid server config: {0}")]
    Config(String),

    #[error("tool call failed: {0}")]
    ToolExecution(String),

    /// The process could not be spawned or the HTTP client built
    #[error("transport unavailable: {0}")]
    Transport(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A handle to an external server that exposes its own tool catalog.
#[async_trait::async_trait]
pub trait McpToolSource: Send + Sync {
    /// Server name, used in log messages
    fn name(&self) -> &str;

    /// Locally invocable handles for every tool in the catalog
    async fn callable_tools(&self) -> Result<Vec<Arc<dyn DynTool>>, McpError>;

    /// Function definitions for every tool in the catalog
    async fn function_schema(&self) -> Result<Vec<FunctionDefinition>, McpError>;
}

/// One entry of a server's `tools/list` catalog
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolDefinition {
    /// Server-side name, without any namespace prefix
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl McpToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Parameter signature read from the input schema
    pub fn signature(&self) -> Signature {
        Signature::from_json_schema(&self.input_schema)
    }

    /// Convert to the wire function descriptor.
    ///
    /// Parameters follow the schema's property order. Descriptions come from
    /// each property's `description`; MCP tools never require confirmation.
    pub fn to_function_definition(&self) -> FunctionDefinition {
        let properties = self.input_schema.get("properties");

        let parameters = self
            .signature()
            .params()
            .iter()
            .map(|param| {
                let description = properties
                    .and_then(|props| props.get(&param.name))
                    .and_then(|prop| prop.get("description"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let detail = ParameterDetail {
                    param_type: param.param_type,
                    description,
                    required: !param.has_default,
                };
                (param.name.clone(), detail)
            })
            .collect();

        FunctionDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters,
            require_confirmation: Confirmation::Disabled,
        }
    }
}
