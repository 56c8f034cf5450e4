//! # inline-agent-core
//!
//! Action group configuration for Bedrock inline agents.
//!
//! An inline agent is handed its whole tool catalog with each request, as a
//! list of action groups. This crate models that catalog: it checks that each
//! group uses exactly one way of providing capabilities, derives how the
//! group is invoked, builds function schemas from tool documentation and
//! produces the wire payload the agent runtime expects.
//!
//! ## Quick Start
//!
//! ```ignore
//! use inline_agent_core::identity::StaticIdentityProvider;
//! use inline_agent_core::{ActionGroup, ActionGroups, BuiltinTool, ExecutorResolver};
//!
//! # async fn example() -> inline_agent_core::Result<()> {
//! let groups = ActionGroups::new([
//!     ActionGroup::builder("WeatherGroup").tool(GetWeather).build()?,
//!     ActionGroup::builder("UserInput").builtin(BuiltinTool::user_input()).build()?,
//! ])?;
//!
//! let resolver = ExecutorResolver::new(StaticIdentityProvider::placeholder());
//! let payload = groups.serialize(&resolver).await?;
//! let tools = groups.tool_map().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Capability Sources
//!
//! | Builder field | Executor | Wire executor |
//! |---|---|---|
//! | `tools` | `DirectInvoke` | `RETURN_CONTROL` |
//! | `mcp_clients` | `DirectInvoke` | `RETURN_CONTROL` |
//! | `lambda_name` + `function_schema` or `api_schema` | `RemoteFunction` | Lambda ARN |
//! | `builtin_tools` | `PlatformBuiltin` | none |
//!
//! ## Documenting Tools
//!
//! Tool documentation is split at `Parameters:` and `Returns:` (configurable
//! per group). Parameters are listed one per line at a common indentation;
//! deeper lines continue the previous description:
//!
//! ```text
//! Get weather for a location.
//!
//! Parameters:
//!     location: The city to get weather for
//!     unit: Temperature unit, either "f" or "c".
//!         Defaults to "f".
//!
//! Returns:
//!     A short weather summary
//! ```
//!
//! ## Feature Flags
//!
//! - `sts` - resolve account and region with AWS STS
//! - `mcp` - MCP client over stdio and streamable HTTP
//! - `test-utils` - mock identity provider and MCP source

pub mod action_group;
pub mod collection;
pub mod docstring;
pub mod error;
pub mod executor;
pub mod identity;
pub mod mcp;
pub mod schema;
pub mod tool;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use action_group::{
    ActionGroup, ActionGroupBuilder, BuiltinSignature, BuiltinTool, CapabilityField,
    CapabilitySource, ConfigurationError, LambdaSchema,
};
pub use collection::{ActionGroups, ToolMap};
pub use docstring::DocstringKeys;
pub use error::{Error, Result};
pub use executor::{Executor, ExecutorResolver};
pub use identity::{Identity, IdentityError, IdentityPolicy, IdentityProvider};
pub use mcp::{McpError, McpToolDefinition, McpToolSource};
pub use schema::{
    create_function_schema, Confirmation, FunctionDefinition, ParamType, SchemaError, Signature,
};
pub use tool::{box_tool, require_confirmation, DynTool, Tool, ToolError, ToolResult};
pub use wire::{ActionGroupExecutor, ActionGroupPayload, ApiSchema, FunctionSchema};
