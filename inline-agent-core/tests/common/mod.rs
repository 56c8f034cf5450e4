//! Tools and catalogs shared by the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use inline_agent_core::{
    DynTool, FunctionDefinition, McpError, McpToolDefinition, McpToolSource, Tool, ToolError,
    ToolResult,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[cfg(feature = "mcp")]
pub mod mock_mcp_server;

pub const WEATHER_DOC: &str = "Get weather.\n\nParameters:\n    location: the city\n    unit: defaults to f\n\nReturns:\n    weather string";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeatherInput {
    pub location: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "f".to_string()
}

/// Weather lookup documented with the default markers
pub struct GetWeather;

impl Tool for GetWeather {
    type Input = WeatherInput;

    fn name(&self) -> &str {
        "get_weather"
    }

    fn documentation(&self) -> Option<&str> {
        Some(WEATHER_DOC)
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let unit = input.unit.to_uppercase();
        Ok(format!("Sunny and 72{} in {}", unit, input.location).into())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ForecastInput {
    pub location: String,
    pub days: u8,
    #[serde(default)]
    pub hourly: bool,
}

/// Multi-day forecast; documents parameters out of signature order
pub struct GetForecast;

impl Tool for GetForecast {
    type Input = ForecastInput;

    fn name(&self) -> &str {
        "get_forecast"
    }

    fn documentation(&self) -> Option<&str> {
        Some(
            "Get a multi-day forecast.\n\
             \n\
             Parameters:\n\
             \x20   days (int): how many days ahead,\n\
             \x20       at most 10\n\
             \x20   location: the city\n\
             \n\
             Returns:\n\
             \x20   one line per day",
        )
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        ToolResult::json(json!({
            "location": input.location,
            "days": input.days,
            "hourly": input.hourly,
        }))
        .map_err(Into::into)
    }
}

/// A tool with no documentation at all
pub struct Undocumented;

impl Tool for Undocumented {
    type Input = WeatherInput;

    fn name(&self) -> &str {
        "undocumented"
    }

    fn documentation(&self) -> Option<&str> {
        None
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        Err(ToolError::Custom("never called".to_string()))
    }
}

// In-memory stand-in for an MCP server

/// An in-memory MCP tool source; each tool returns its own name
pub struct StaticCatalog {
    name: String,
    tools: Vec<McpToolDefinition>,
}

impl StaticCatalog {
    pub fn new(name: &str, tools: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            tools: tools
                .iter()
                .map(|(tool, description)| {
                    McpToolDefinition::new(*tool, *description, json!({"type": "object"}))
                })
                .collect(),
        }
    }
}

struct CatalogTool(String);

impl DynTool for CatalogTool {
    fn name(&self) -> &str {
        &self.0
    }

    fn documentation(&self) -> Option<&str> {
        None
    }

    fn signature(&self) -> inline_agent_core::Signature {
        inline_agent_core::Signature::new()
    }

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn execute_raw(
        &self,
        _input: serde_json::Value,
    ) -> futures::future::BoxFuture<'_, Result<ToolResult, ToolError>> {
        Box::pin(async move { Ok(ToolResult::text(self.0.clone())) })
    }
}

#[async_trait]
impl McpToolSource for StaticCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn callable_tools(&self) -> Result<Vec<Arc<dyn DynTool>>, McpError> {
        Ok(self
            .tools
            .iter()
            .map(|tool| {
                Arc::new(CatalogTool(tool.name.clone())) as Arc<dyn DynTool>
            })
            .collect())
    }

    async fn function_schema(&self) -> Result<Vec<FunctionDefinition>, McpError> {
        Ok(self
            .tools
            .iter()
            .map(McpToolDefinition::to_function_definition)
            .collect())
    }
}
