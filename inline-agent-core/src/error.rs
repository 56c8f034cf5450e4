//! Top-level error type for inline-agent-core
//!
//! Each module reports its own error enum; this module flattens them into the
//! categories a caller acts on:
//!
//! - [`Error::Configuration`] - fix the action group definitions
//! - [`Error::Schema`] - fix a tool's documentation
//! - [`Error::Identity`] - fix AWS credentials or region, or opt into placeholders
//! - [`Error::Mcp`] - an MCP server could not be reached or queried
//! - [`Error::Tool`] - a tool invocation failed

use thiserror::Error;

use crate::action_group::ConfigurationError;
use crate::identity::IdentityError;
use crate::mcp::McpError;
use crate::schema::SchemaError;
use crate::tool::ToolError;

/// Top-level error type for inline-agent-core operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(ConfigurationError),

    #[error("schema error: {0}")]
    Schema(SchemaError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    #[error("tool error: {0}")]
    Tool(#[from] ToolError),
}

impl Error {
    /// Returns true if the action group configuration is invalid
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if a tool's documentation could not be turned into a schema
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns true if the account/region lookup failed
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity(_))
    }

    pub fn is_mcp(&self) -> bool {
        matches!(self, Self::Mcp(_))
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, Self::Tool(_))
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        match err {
            ConfigurationError::Schema(schema) => Self::Schema(schema),
            other => Self::Configuration(other),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// Result type alias using the top-level Error
pub type Result<T> = std::result::Result<T, Error>;
