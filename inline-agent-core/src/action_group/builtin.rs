use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Platform-provided capability selected by signature name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuiltinSignature {
    /// `AMAZON.UserInput`: the agent may ask the user for missing information
    UserInput,
    /// `AMAZON.CodeInterpreter`: sandboxed code execution
    CodeInterpreter,
    /// `ANTHROPIC.Computer`: computer use
    Computer,
    /// `ANTHROPIC.Bash`
    Bash,
    /// `ANTHROPIC.TextEditor`
    TextEditor,
    /// Any other signature string, passed through verbatim
    Custom(String),
}

impl BuiltinSignature {
    fn from_name(name: &str) -> Self {
        match name {
            "AMAZON.UserInput" => Self::UserInput,
            "AMAZON.CodeInterpreter" => Self::CodeInterpreter,
            "ANTHROPIC.Computer" => Self::Computer,
            "ANTHROPIC.Bash" => Self::Bash,
            "ANTHROPIC.TextEditor" => Self::TextEditor,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::UserInput => "AMAZON.UserInput",
            Self::CodeInterpreter => "AMAZON.CodeInterpreter",
            Self::Computer => "ANTHROPIC.Computer",
            Self::Bash => "ANTHROPIC.Bash",
            Self::TextEditor => "ANTHROPIC.TextEditor",
            Self::Custom(signature) => signature,
        }
    }
}

impl fmt::Display for BuiltinSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinSignature {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for BuiltinSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BuiltinSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_name(&String::deserialize(deserializer)?))
    }
}

/// Built-in tool selection: a signature plus optional signature parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTool {
    signature: BuiltinSignature,
    params: Option<Map<String, Value>>,
}

impl BuiltinTool {
    pub fn new(signature: BuiltinSignature) -> Self {
        Self {
            signature,
            params: None,
        }
    }

    pub fn user_input() -> Self {
        Self::new(BuiltinSignature::UserInput)
    }

    pub fn code_interpreter() -> Self {
        Self::new(BuiltinSignature::CodeInterpreter)
    }

    /// Computer use; the tool version goes in the `type` parameter
    pub fn computer(tool_type: impl Into<String>) -> Self {
        Self::new(BuiltinSignature::Computer)
            .with_param("type", tool_type.into())
    }

    pub fn bash(tool_type: impl Into<String>) -> Self {
        Self::new(BuiltinSignature::Bash)
            .with_param("type", tool_type.into())
    }

    pub fn text_editor(tool_type: impl Into<String>) -> Self {
        Self::new(BuiltinSignature::TextEditor)
            .with_param("type", tool_type.into())
    }

    /// Add an entry to `parentActionGroupSignatureParams`
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn signature(&self) -> &BuiltinSignature {
        &self.signature
    }

    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.params.as_ref()
    }
}
