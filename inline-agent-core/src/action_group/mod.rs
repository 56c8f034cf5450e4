//! Action groups: named units of agent capability
//!
//! An [`ActionGroup`] carries exactly one [`CapabilitySource`]. The builder
//! checks the five mutually exclusive capability fields (`tools`,
//! `function_schema`, `api_schema`, `mcp_clients`, `builtin_tools`) plus the
//! `lambda_name` binding, and only a consistent combination produces a group.
//!
//! ```rust
//! use inline_agent_core::{ActionGroup, Executor, FunctionDefinition};
//!
//! let group = ActionGroup::builder("HotelReservations")
//!     .description("Book and cancel hotel rooms")
//!     .lambda("HotelReservationsFn")
//!     .function(FunctionDefinition::new("cancel_booking", "Cancel a booking"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(group.executor(), Executor::RemoteFunction);
//! ```

mod builder;
mod builtin;

pub use builder::ActionGroupBuilder;
pub use builtin::{BuiltinSignature, BuiltinTool};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::docstring::DocstringKeys;
use crate::executor::Executor;
use crate::mcp::McpToolSource;
use crate::schema::{FunctionDefinition, SchemaError};
use crate::tool::DynTool;
use crate::wire::ApiSchema;

/// Longest name the agent runtime accepts for an action group
pub const MAX_NAME_LEN: usize = 100;

/// Builder-level capability fields, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityField {
    Tools,
    FunctionSchema,
    ApiSchema,
    McpClients,
    BuiltinTools,
    LambdaName,
}

impl CapabilityField {
    /// The five capability sources, excluding the `lambda_name` binding
    pub const SOURCES: [CapabilityField; 5] = [
        Self::Tools,
        Self::FunctionSchema,
        Self::ApiSchema,
        Self::McpClients,
        Self::BuiltinTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::FunctionSchema => "function_schema",
            Self::ApiSchema => "api_schema",
            Self::McpClients => "mcp_clients",
            Self::BuiltinTools => "builtin_tools",
            Self::LambdaName => "lambda_name",
        }
    }
}

impl fmt::Display for CapabilityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while assembling action groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No capability source was given
    #[error(
        "action group '{group}' requires one of tools, function_schema, api_schema, mcp_clients or builtin_tools"
    )]
    Missing { group: String },

    /// Two mutually exclusive fields were both given
    #[error("{field} is not supported when {present} is present")]
    Conflict {
        field: CapabilityField,
        present: CapabilityField,
    },

    /// `lambda_name` given without a schema describing the function
    #[error(
        "action group '{group}' sets lambda_name but neither function_schema nor api_schema"
    )]
    MissingLambdaSchema { group: String },

    /// A Lambda schema given without the function to bind it to
    #[error("{field} requires lambda_name")]
    MissingLambdaName { field: CapabilityField },

    #[error("invalid action group name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("duplicate action group name '{name}'")]
    DuplicateActionGroup { name: String },

    #[error("action group '{group}' defines tool '{tool}' more than once")]
    DuplicateTool { group: String, tool: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Schema of a Lambda-backed action group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaSchema {
    /// Function details
    Functions(Vec<FunctionDefinition>),
    /// OpenAPI document
    Api(ApiSchema),
}

/// Where an action group's capabilities come from
#[derive(Clone)]
pub enum CapabilitySource {
    /// In-process tools and the function definitions generated for them
    Tools {
        tools: Vec<Arc<dyn DynTool>>,
        functions: Vec<FunctionDefinition>,
    },
    /// A Lambda function described by a function or OpenAPI schema
    Lambda {
        lambda_name: String,
        schema: LambdaSchema,
    },
    /// MCP servers; tools and schema come from their catalogs
    Mcp {
        clients: Vec<Arc<dyn McpToolSource>>,
    },
    /// A platform-provided capability
    Builtin(BuiltinTool),
}

impl CapabilitySource {
    /// Builder field this source was populated from
    pub fn field(&self) -> CapabilityField {
        match self {
            Self::Tools { .. } => CapabilityField::Tools,
            Self::Lambda {
                schema: LambdaSchema::Functions(_),
                ..
            } => CapabilityField::FunctionSchema,
            Self::Lambda {
                schema: LambdaSchema::Api(_),
                ..
            } => CapabilityField::ApiSchema,
            Self::Mcp { .. } => CapabilityField::McpClients,
            Self::Builtin(_) => CapabilityField::BuiltinTools,
        }
    }
}

impl fmt::Debug for CapabilitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tools { tools, functions } => {
                let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
                f.debug_struct("Tools")
                    .field("tools", &names)
                    .field("functions", functions)
                    .finish()
            }
            Self::Lambda {
                lambda_name,
                schema,
            } => f
                .debug_struct("Lambda")
                .field("lambda_name", lambda_name)
                .field("schema", schema)
                .finish(),
            Self::Mcp { clients } => {
                let names: Vec<&str> = clients.iter().map(|c| c.name()).collect();
                f.debug_struct("Mcp").field("clients", &names).finish()
            }
            Self::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
        }
    }
}

/// A validated action group
#[derive(Debug, Clone)]
pub struct ActionGroup {
    name: String,
    description: Option<String>,
    source: CapabilitySource,
    keys: DocstringKeys,
}

impl ActionGroup {
    /// Start configuring an action group
    pub fn builder(name: impl Into<String>) -> ActionGroupBuilder {
        ActionGroupBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> &CapabilitySource {
        &self.source
    }

    /// Markers used to parse tool documentation for this group
    pub fn docstring_keys(&self) -> &DocstringKeys {
        &self.keys
    }

    /// How this group's capabilities are invoked
    pub fn executor(&self) -> Executor {
        match self.source {
            CapabilitySource::Lambda { .. } => Executor::RemoteFunction,
            CapabilitySource::Builtin(_) => Executor::PlatformBuiltin,
            _ => Executor::DirectInvoke,
        }
    }

    /// In-process tools, empty unless the group was built from `tools`
    pub fn tools(&self) -> &[Arc<dyn DynTool>] {
        match &self.source {
            CapabilitySource::Tools { tools, .. } => tools,
            _ => &[],
        }
    }

    /// Function definitions known without contacting any server
    pub fn functions(&self) -> Option<&[FunctionDefinition]> {
        match &self.source {
            CapabilitySource::Tools { functions, .. } => Some(functions),
            CapabilitySource::Lambda {
                schema: LambdaSchema::Functions(functions),
                ..
            } => Some(functions),
            _ => None,
        }
    }

    pub fn lambda_name(&self) -> Option<&str> {
        match &self.source {
            CapabilitySource::Lambda { lambda_name, .. } => Some(lambda_name),
            _ => None,
        }
    }

    pub fn api_schema(&self) -> Option<&ApiSchema> {
        match &self.source {
            CapabilitySource::Lambda {
                schema: LambdaSchema::Api(api),
                ..
            } => Some(api),
            _ => None,
        }
    }

    pub fn mcp_clients(&self) -> &[Arc<dyn McpToolSource>] {
        match &self.source {
            CapabilitySource::Mcp { clients } => clients,
            _ => &[],
        }
    }

    pub fn builtin_tool(&self) -> Option<&BuiltinTool> {
        match &self.source {
            CapabilitySource::Builtin(builtin) => Some(builtin),
            _ => None,
        }
    }
}

/// Check an action group name against the runtime's naming rules
pub(crate) fn validate_name(name: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason| ConfigurationError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 100 characters"));
    }
    if !first.is_ascii_alphanumeric() {
        return Err(invalid("name must start with a letter or digit"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(
            "name may only contain letters, digits, underscores and hyphens",
        ));
    }
    Ok(())
}
