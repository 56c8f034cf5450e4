use std::collections::HashSet;
use std::sync::Arc;

use super::{
    validate_name, ActionGroup, BuiltinTool, CapabilityField, CapabilitySource,
    ConfigurationError, LambdaSchema,
};
use crate::docstring::DocstringKeys;
use crate::mcp::McpToolSource;
use crate::schema::{create_function_schema, FunctionDefinition};
use crate::tool::{box_tool, DynTool, Tool};
use crate::wire::ApiSchema;

/// Builder for an [`ActionGroup`]
///
/// Any combination of fields can be set; [`build`](Self::build) decides
/// whether the combination is valid.
///
/// # Example
///
/// ```ignore
/// use inline_agent_core::{box_tools, ActionGroup};
///
/// let group = ActionGroup::builder("WeatherGroup")
///     .description("Weather lookups")
///     .tools(box_tools![GetWeather, GetForecast])
///     .build()?;
/// ```
pub struct ActionGroupBuilder {
    name: String,
    description: Option<String>,
    tools: Vec<Arc<dyn DynTool>>,
    function_schema: Option<Vec<FunctionDefinition>>,
    api_schema: Option<ApiSchema>,
    mcp_clients: Vec<Arc<dyn McpToolSource>>,
    builtin_tool: Option<BuiltinTool>,
    lambda_name: Option<String>,
    keys: DocstringKeys,
}

impl ActionGroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tools: Vec::new(),
            function_schema: None,
            api_schema: None,
            mcp_clients: Vec::new(),
            builtin_tool: None,
            lambda_name: None,
            keys: DocstringKeys::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an in-process tool
    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::from(box_tool(tool)));
        self
    }

    /// Add several in-process tools, e.g. from [`box_tools!`](crate::box_tools)
    pub fn tools(mut self, tools: impl IntoIterator<Item = Box<dyn DynTool>>) -> Self {
        self.tools.extend(tools.into_iter().map(Arc::from));
        self
    }

    /// Add an already type-erased tool
    pub fn dyn_tool(mut self, tool: Arc<dyn DynTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Bind the group to a Lambda function, by name or full ARN
    pub fn lambda(mut self, lambda_name: impl Into<String>) -> Self {
        self.lambda_name = Some(lambda_name.into());
        self
    }

    /// Describe the Lambda function with function details
    pub fn function_schema(
        mut self,
        functions: impl IntoIterator<Item = FunctionDefinition>,
    ) -> Self {
        self.function_schema
            .get_or_insert_with(Vec::new)
            .extend(functions);
        self
    }

    /// Add one function to the Lambda function schema
    pub fn function(self, function: FunctionDefinition) -> Self {
        self.function_schema([function])
    }

    /// Describe the Lambda function with an OpenAPI document
    pub fn api_schema(mut self, schema: ApiSchema) -> Self {
        self.api_schema = Some(schema);
        self
    }

    pub fn mcp_client(mut self, client: Arc<dyn McpToolSource>) -> Self {
        self.mcp_clients.push(client);
        self
    }

    pub fn builtin(mut self, tool: BuiltinTool) -> Self {
        self.builtin_tool = Some(tool);
        self
    }

    /// Marker that opens the parameter section of tool documentation
    pub fn argument_key(mut self, key: impl Into<String>) -> Self {
        self.keys.argument_key = key.into();
        self
    }

    /// Marker that opens the returns section of tool documentation
    pub fn return_key(mut self, key: impl Into<String>) -> Self {
        self.keys.return_key = key.into();
        self
    }

    /// Whether a field holds a non-empty value
    fn is_set(&self, field: CapabilityField) -> bool {
        match field {
            CapabilityField::Tools => !self.tools.is_empty(),
            CapabilityField::FunctionSchema => {
                self.function_schema.as_ref().is_some_and(|f| !f.is_empty())
            }
            CapabilityField::ApiSchema => self.api_schema.is_some(),
            CapabilityField::McpClients => !self.mcp_clients.is_empty(),
            CapabilityField::BuiltinTools => self.builtin_tool.is_some(),
            CapabilityField::LambdaName => {
                self.lambda_name.as_deref().is_some_and(|n| !n.is_empty())
            }
        }
    }

    fn check_exclusivity(&self) -> Result<(), ConfigurationError> {
        let populated: Vec<CapabilityField> = CapabilityField::SOURCES
            .into_iter()
            .filter(|&field| self.is_set(field))
            .collect();

        if let [field, present, ..] = populated[..] {
            return Err(ConfigurationError::Conflict { field, present });
        }

        let lambda = self.is_set(CapabilityField::LambdaName);
        match (lambda, populated.first().copied()) {
            (true, Some(field @ CapabilityField::Tools))
            | (true, Some(field @ CapabilityField::McpClients))
            | (true, Some(field @ CapabilityField::BuiltinTools)) => {
                Err(ConfigurationError::Conflict {
                    field,
                    present: CapabilityField::LambdaName,
                })
            }
            (true, None) => Err(ConfigurationError::MissingLambdaSchema {
                group: self.name.clone(),
            }),
            (false, Some(field @ CapabilityField::FunctionSchema))
            | (false, Some(field @ CapabilityField::ApiSchema)) => {
                Err(ConfigurationError::MissingLambdaName { field })
            }
            (false, None) => Err(ConfigurationError::Missing {
                group: self.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Validate the configuration and build the group.
    ///
    /// Function definitions for in-process tools are generated here, so
    /// undocumented or badly documented tools fail the build.
    pub fn build(self) -> Result<ActionGroup, ConfigurationError> {
        validate_name(&self.name)?;
        self.check_exclusivity()?;

        let Self {
            name,
            description,
            tools,
            function_schema,
            api_schema,
            mcp_clients,
            builtin_tool,
            lambda_name,
            keys,
        } = self;

        let source = if !tools.is_empty() {
            let mut seen = HashSet::new();
            for tool in &tools {
                if !seen.insert(tool.name()) {
                    return Err(ConfigurationError::DuplicateTool {
                        group: name,
                        tool: tool.name().to_string(),
                    });
                }
            }

            let functions = tools
                .iter()
                .map(|tool| create_function_schema(tool.as_ref(), &keys))
                .collect::<Result<Vec<_>, _>>()?;

            CapabilitySource::Tools { tools, functions }
        } else if let Some(builtin) = builtin_tool {
            CapabilitySource::Builtin(builtin)
        } else if !mcp_clients.is_empty() {
            CapabilitySource::Mcp {
                clients: mcp_clients,
            }
        } else {
            let functions = function_schema.filter(|f| !f.is_empty());
            let schema = match (functions, api_schema) {
                (Some(functions), _) => LambdaSchema::Functions(functions),
                (None, Some(api)) => LambdaSchema::Api(api),
                (None, None) => return Err(ConfigurationError::Missing { group: name }),
            };
            CapabilitySource::Lambda {
                lambda_name: lambda_name.unwrap_or_default(),
                schema,
            }
        };

        log::debug!("built action group '{}' from {}", name, source.field());

        Ok(ActionGroup {
            name,
            description,
            source,
            keys,
        })
    }
}
