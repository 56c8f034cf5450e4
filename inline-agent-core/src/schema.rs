//! Function schemas for in-process tools
//!
//! A [`FunctionDefinition`] is the descriptor the agent runtime receives for
//! each callable in an action group. It is built from two independent inputs:
//!
//! - the tool's documentation text, parsed by [`crate::docstring`] for the
//!   function description and per-parameter descriptions
//! - the tool's [`Signature`], introspected from its input type, which decides
//!   parameter order, wire types and whether each parameter is required

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::docstring::{self, DocstringKeys};
use crate::tool::DynTool;

/// Errors raised while building a function schema from tool documentation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The tool has no documentation, or only whitespace
    #[error("function '{function}' has no documentation to build a schema from")]
    MissingDocumentation { function: String },

    /// The parameter section could not be parsed
    #[error(
        "malformed documentation for function '{function}' at line {line}: {reason}"
    )]
    MalformedDocumentation {
        function: String,
        /// 1-based line number within the parameter section
        line: usize,
        reason: String,
    },
}

/// Wire-format scalar type of a function parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    /// Map a JSON-schema type name onto the wire type table.
    ///
    /// Anything outside the table (objects, null, unknown names) becomes `string`.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            _ => Self::String,
        }
    }

    /// Resolve the wire type of a JSON-schema property.
    ///
    /// Nullable unions such as `["integer", "null"]` resolve to their first
    /// non-null member. Properties without a `type` (references, `anyOf`)
    /// default to `string`.
    pub fn from_json_schema(property: &Value) -> Self {
        match property.get("type") {
            Some(Value::String(name)) => Self::from_type_name(name),
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null")
                .map(Self::from_type_name)
                .unwrap_or_default(),
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of a callable's signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    pub name: String,
    pub param_type: ParamType,
    /// Whether the parameter can be omitted by the caller
    pub has_default: bool,
}

/// Ordered parameter list of a callable, independent of its documentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<SignatureParam>,
}

impl Signature {
    /// Create an empty signature
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter without a default value
    pub fn required(mut self, name: impl Into<String>, param_type: ParamType) -> Self {
        self.params.push(SignatureParam {
            name: name.into(),
            param_type,
            has_default: false,
        });
        self
    }

    /// Append a parameter that has a default value
    pub fn optional(mut self, name: impl Into<String>, param_type: ParamType) -> Self {
        self.params.push(SignatureParam {
            name: name.into(),
            param_type,
            has_default: true,
        });
        self
    }

    /// Introspect a signature from an object JSON schema.
    ///
    /// Properties are taken in schema order. A property is considered to have
    /// a default when it is absent from the schema's `required` list, which is
    /// how `schemars` renders `Option<T>` and `#[serde(default)]` fields.
    pub fn from_json_schema(schema: &Value) -> Self {
        let required: HashSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let params = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, property)| SignatureParam {
                        name: name.clone(),
                        param_type: ParamType::from_json_schema(property),
                        has_default: !required.contains(name.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { params }
    }

    pub fn params(&self) -> &[SignatureParam] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Whether the runtime must ask the user before invoking a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confirmation {
    Enabled,
    #[default]
    Disabled,
}

impl From<bool> for Confirmation {
    fn from(required: bool) -> Self {
        if required {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Wire description of a single function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDetail {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// Ordered `name -> detail` map, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(IndexMap<String, ParameterDetail>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter; replacing an existing name keeps its position
    pub fn insert(&mut self, name: impl Into<String>, detail: ParameterDetail) {
        self.0.insert(name.into(), detail);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDetail> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterDetail)> {
        self.0.iter().map(|(name, detail)| (name.as_str(), detail))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParameterDetail)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, ParameterDetail)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wire descriptor of one callable function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub require_confirmation: Confirmation,
}

impl FunctionDefinition {
    /// Create a definition with no parameters and confirmation disabled
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Parameters::new(),
            require_confirmation: Confirmation::Disabled,
        }
    }

    /// Add a parameter to the definition
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.parameters.insert(
            name,
            ParameterDetail {
                param_type,
                description: description.into(),
                required,
            },
        );
        self
    }

    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.require_confirmation = confirmation;
        self
    }
}

/// Build the wire descriptor for a tool from its documentation and signature.
///
/// Parameters follow the order of the tool's signature, not the order they are
/// documented in. A parameter with no documented description gets an empty
/// one. Documentation that is absent or blank is an error; the description is
/// never invented.
pub fn create_function_schema(
    tool: &dyn DynTool,
    keys: &DocstringKeys,
) -> Result<FunctionDefinition, SchemaError> {
    let name = tool.name();
    let documentation = tool
        .documentation()
        .filter(|doc| !doc.trim().is_empty())
        .ok_or_else(|| SchemaError::MissingDocumentation {
            function: name.to_string(),
        })?;

    let parsed = docstring::parse(name, documentation, keys)?;

    let parameters = tool
        .signature()
        .params()
        .iter()
        .map(|param| {
            let description = parsed.parameter(&param.name).unwrap_or_default();
            let detail = ParameterDetail {
                param_type: param.param_type,
                description: description.to_string(),
                required: !param.has_default,
            };
            (param.name.clone(), detail)
        })
        .collect();

    Ok(FunctionDefinition {
        name: name.to_string(),
        description: parsed.description,
        parameters,
        require_confirmation: tool.requires_confirmation().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{box_tool, require_confirmation, Tool, ToolError, ToolResult};
    use schemars::JsonSchema;
    use serde_json::json;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct WeatherInput {
        location: String,
        #[serde(default = "default_unit")]
        unit: String,
    }

    fn default_unit() -> String {
        "f".to_string()
    }

    struct GetWeather {
        doc: Option<&'static str>,
    }

    impl Tool for GetWeather {
        type Input = WeatherInput;

        fn name(&self) -> &str {
            "get_weather"
        }

        fn documentation(&self) -> Option<&str> {
            self.doc
        }

        async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
            Ok(format!("72 in {}", input.location).into())
        }
    }

    const WEATHER_DOC: &str = "Get weather.\n\nParameters:\n    location: the city\n    unit: defaults to f\n\nReturns:\n    weather string";

    fn default_schema(tool: &dyn DynTool) -> Result<FunctionDefinition, SchemaError> {
        create_function_schema(tool, &DocstringKeys::default())
    }

    #[test]
    fn test_param_type_table() {
        assert_eq!(ParamType::from_type_name("string"), ParamType::String);
        assert_eq!(ParamType::from_type_name("integer"), ParamType::Integer);
        assert_eq!(ParamType::from_type_name("number"), ParamType::Number);
        assert_eq!(ParamType::from_type_name("boolean"), ParamType::Boolean);
        assert_eq!(ParamType::from_type_name("array"), ParamType::Array);
        assert_eq!(ParamType::from_type_name("object"), ParamType::String);
        assert_eq!(ParamType::from_type_name("null"), ParamType::String);
    }

    #[test]
    fn test_param_type_nullable_union() {
        let property = json!({"type": ["integer", "null"]});
        assert_eq!(ParamType::from_json_schema(&property), ParamType::Integer);

        let property = json!({"type": ["null", "boolean"]});
        assert_eq!(ParamType::from_json_schema(&property), ParamType::Boolean);

        let property = json!({"$ref": "#/$defs/Location"});
        assert_eq!(ParamType::from_json_schema(&property), ParamType::String);
    }

    #[test]
    fn test_signature_from_json_schema_keeps_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "number"},
                "mid": {"type": "array"}
            },
            "required": ["zeta", "mid"]
        });

        let signature = Signature::from_json_schema(&schema);
        let names: Vec<&str> = signature.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(!signature.params()[0].has_default);
        assert!(signature.params()[1].has_default);
        assert_eq!(signature.params()[1].param_type, ParamType::Number);
        assert_eq!(signature.params()[2].param_type, ParamType::Array);
    }

    #[test]
    fn test_signature_from_schema_without_properties() {
        let signature = Signature::from_json_schema(&json!({"type": "null"}));
        assert!(signature.is_empty());
    }

    #[test]
    fn test_weather_round_trip() {
        let tool = box_tool(GetWeather {
            doc: Some(WEATHER_DOC),
        });
        let definition = default_schema(tool.as_ref()).unwrap();

        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({
                "name": "get_weather",
                "description": "Get weather. This function returns weather string",
                "parameters": {
                    "location": {"type": "string", "description": "the city", "required": true},
                    "unit": {"type": "string", "description": "defaults to f", "required": false}
                },
                "requireConfirmation": "DISABLED"
            })
        );
    }

    #[test]
    fn test_parameter_order_follows_signature() {
        let doc = "Get weather.\n\nParameters:\n    unit: defaults to f\n    location: the city\n";
        let tool = box_tool(GetWeather { doc: Some(doc) });
        let definition = default_schema(tool.as_ref()).unwrap();

        let names: Vec<&str> = definition.parameters.names().collect();
        assert_eq!(names, vec!["location", "unit"]);

        let value = serde_json::to_value(&definition).unwrap();
        let keys: Vec<&String> = value["parameters"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["location", "unit"]);
    }

    #[test]
    fn test_undocumented_parameter_gets_empty_description() {
        let doc = "Get weather.\n\nParameters:\n    location: the city\n";
        let tool = box_tool(GetWeather { doc: Some(doc) });
        let definition = default_schema(tool.as_ref()).unwrap();

        assert_eq!(definition.parameters.get("unit").unwrap().description, "");
        assert_eq!(definition.description, "Get weather.");
    }

    #[test]
    fn test_missing_documentation_is_an_error() {
        for doc in [None, Some(""), Some("   \n\t ")] {
            let tool = box_tool(GetWeather { doc });
            let err = default_schema(tool.as_ref()).unwrap_err();
            assert_eq!(
                err,
                SchemaError::MissingDocumentation {
                    function: "get_weather".to_string()
                }
            );
        }
    }

    #[test]
    fn test_confirmation_marker() {
        let tool = box_tool(require_confirmation(GetWeather {
            doc: Some(WEATHER_DOC),
        }));
        let definition = default_schema(tool.as_ref()).unwrap();
        assert_eq!(definition.require_confirmation, Confirmation::Enabled);
        let confirmation = definition.require_confirmation;
        assert_eq!(
            serde_json::to_value(confirmation).unwrap(),
            json!("ENABLED")
        );
    }

    #[test]
    fn test_create_function_schema_is_idempotent() {
        let tool = box_tool(GetWeather {
            doc: Some(WEATHER_DOC),
        });
        let keys = DocstringKeys::default();
        let first = create_function_schema(tool.as_ref(), &keys).unwrap();
        let second = create_function_schema(tool.as_ref(), &keys).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parameters_deserialize_keeps_order() {
        let value = json!({
            "b": {"type": "integer", "description": "second", "required": true},
            "a": {"type": "boolean"}
        });
        let parameters: Parameters = serde_json::from_value(value).unwrap();
        let names: Vec<&str> = parameters.names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(!parameters.get("a").unwrap().required);
        assert_eq!(parameters.get("b").unwrap().param_type, ParamType::Integer);
    }

    #[test]
    fn test_parameters_insert_replaces_in_place() {
        let mut parameters = Parameters::new();
        let detail = |description: &str| ParameterDetail {
            param_type: ParamType::String,
            description: description.to_string(),
            required: true,
        };
        parameters.insert("first", detail("one"));
        parameters.insert("second", detail("two"));
        parameters.insert("first", detail("uno"));

        let names: Vec<&str> = parameters.names().collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(parameters.get("first").unwrap().description, "uno");
    }
}
