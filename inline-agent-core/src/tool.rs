use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Signature;

/// What a tool hands back to the agent runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolResult {
    Text(String),
    Json(Value),
}

impl ToolResult {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Serialize `value` into a `Json` result
    pub fn json<T: Serialize>(value: T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Text as-is; JSON compactly encoded
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
}

impl From<String> for ToolResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ToolResult {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments did not match the tool's input type
    #[error("invalid input for '{tool}': {source}")]
    InvalidInput {
        tool: String,
        source: serde_json::Error,
    },

    #[error("could not encode tool output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        Self::Custom(message)
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self::Custom(message.to_owned())
    }
}

/// An in-process tool that can back an action group.
///
/// Besides a name, a tool carries documentation text (see [`crate::docstring`])
/// and a typed `Input`. The JSON schema of `Input` is the tool's signature:
/// parameters appear in field order, their wire types follow the field types,
/// and a field the caller may omit (`Option<T>`, `#[serde(default)]`) is
/// optional.
///
/// ```rust
/// use inline_agent_core::{Tool, ToolError, ToolResult};
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct WeatherInput {
///     location: String,
///     #[serde(default)]
///     unit: Option<String>,
/// }
///
/// struct GetWeather;
///
/// impl Tool for GetWeather {
///     type Input = WeatherInput;
///
///     fn name(&self) -> &str { "get_weather" }
///
///     fn documentation(&self) -> Option<&str> {
///         Some("Get weather.\n\nParameters:\n    location: the city\n    unit: defaults to f\n\nReturns:\n    weather string")
///     }
///
///     async fn execute(&self, input: WeatherInput) -> Result<ToolResult, ToolError> {
///         Ok(format!("Sunny in {}", input.location).into())
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    type Input: DeserializeOwned + JsonSchema;

    /// Function name reported to the runtime
    fn name(&self) -> &str;

    fn documentation(&self) -> Option<&str>;

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl std::future::Future<Output = Result<ToolResult, ToolError>> + Send;

    /// Parameters introspected from `Input`
    fn signature(&self) -> Signature {
        let schema = schemars::schema_for!(Self::Input);
        Signature::from_json_schema(&serde_json::to_value(schema).unwrap_or_default())
    }

    /// Use [`require_confirmation`] rather than overriding this
    fn requires_confirmation(&self) -> bool {
        false
    }
}

/// Object-safe view of a tool, taking untyped JSON arguments.
///
/// Blanket-provided for every [`Tool`] through [`box_tool`]; MCP-backed tools
/// implement it directly.
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn documentation(&self) -> Option<&str>;
    fn signature(&self) -> Signature;
    fn requires_confirmation(&self) -> bool;
    fn execute_raw(&self, input: Value) -> BoxFuture<'_, Result<ToolResult, ToolError>>;
}

pub fn box_tool<T: Tool + 'static>(tool: T) -> Box<dyn DynTool> {
    Box::new(Erased(tool))
}

/// Box several tools of different types at once.
///
/// ```ignore
/// use inline_agent_core::{box_tools, ActionGroup};
///
/// let group = ActionGroup::builder("WeatherGroup")
///     .tools(box_tools![GetWeather, GetForecast])
///     .build()?;
/// ```
#[macro_export]
macro_rules! box_tools {
    ($($tool:expr),* $(,)?) => {
        vec![$($crate::tool::box_tool($tool)),*]
    };
}

struct Erased<T>(T);

impl<T: Tool + 'static> DynTool for Erased<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn documentation(&self) -> Option<&str> {
        self.0.documentation()
    }

    fn signature(&self) -> Signature {
        self.0.signature()
    }

    fn requires_confirmation(&self) -> bool {
        self.0.requires_confirmation()
    }

    fn execute_raw(&self, input: Value) -> BoxFuture<'_, Result<ToolResult, ToolError>> {
        Box::pin(async move {
            let typed = serde_json::from_value::<T::Input>(input).map_err(|source| {
                ToolError::InvalidInput {
                    tool: self.0.name().to_string(),
                    source,
                }
            })?;
            self.0.execute(typed).await
        })
    }
}

/// A tool that the runtime must confirm with the user before invoking.
///
/// Created by [`require_confirmation`]; otherwise behaves exactly like the
/// wrapped tool.
pub struct RequireConfirmation<T>(T);

impl<T> RequireConfirmation<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Mark a tool as needing human confirmation before execution.
///
/// Its function definition will carry `requireConfirmation: ENABLED`.
pub fn require_confirmation<T: Tool>(tool: T) -> RequireConfirmation<T> {
    RequireConfirmation(tool)
}

impl<T: Tool> Tool for RequireConfirmation<T> {
    type Input = T::Input;

    fn name(&self) -> &str {
        self.0.name()
    }

    fn documentation(&self) -> Option<&str> {
        self.0.documentation()
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl std::future::Future<Output = Result<ToolResult, ToolError>> + Send {
        self.0.execute(input)
    }

    fn signature(&self) -> Signature {
        self.0.signature()
    }

    fn requires_confirmation(&self) -> bool {
        true
    }
}
