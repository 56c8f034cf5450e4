// Example building an inline agent's tool catalog from documented tools
//
// Shows how to:
// - Document a tool so its function schema is generated from the text
// - Mix in-process tools, a Lambda-backed group and a built-in capability
// - Print the payload an inline agent request would carry
//
// No AWS access is needed: a fixed identity stands in for STS.
//
// Run with: cargo run --example weather_action_groups

use inline_agent_core::identity::{Identity, StaticIdentityProvider};
use inline_agent_core::{
    box_tools, require_confirmation, ActionGroup, ActionGroups, BuiltinTool, ExecutorResolver,
    FunctionDefinition, ParamType, Tool, ToolError, ToolResult,
};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
struct WeatherInput {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

struct GetWeather;

impl Tool for GetWeather {
    type Input = WeatherInput;

    fn name(&self) -> &str {
        "get_weather"
    }

    fn documentation(&self) -> Option<&str> {
        Some(
            "Get the current weather for a location.

Parameters:
    location: City name, e.g. Seattle
    unit (str): Temperature unit, f or c.
        Defaults to f.

Returns:
    A one-line weather summary",
        )
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let unit = input.unit.unwrap_or_else(|| "f".to_string()).to_uppercase();
        let summary = format!("Light rain, 54{} in {}", unit, input.location);
        Ok(summary.into())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AlertInput {
    location: String,
    message: String,
}

struct SendWeatherAlert;

impl Tool for SendWeatherAlert {
    type Input = AlertInput;

    fn name(&self) -> &str {
        "send_weather_alert"
    }

    fn documentation(&self) -> Option<&str> {
        Some(
            "Send a weather alert to subscribers.

Parameters:
    location: Area the alert covers
    message: Alert text",
        )
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let receipt = format!("Alert sent for {}: {}", input.location, input.message);
        Ok(receipt.into())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let weather_tools = box_tools![GetWeather, require_confirmation(SendWeatherAlert)];
    let monthly = FunctionDefinition::new("monthly_averages", "Average temperature per month")
        .with_parameter("location", ParamType::String, "City name", true)
        .with_parameter("year", ParamType::Integer, "Calendar year", false);

    let groups = ActionGroups::new([
        ActionGroup::builder("WeatherGroup")
            .description("Current conditions and alerts")
            .tools(weather_tools)
            .build()?,
        ActionGroup::builder("Climate")
            .description("Historical climate data")
            .lambda("ClimateHistory")
            .function(monthly)
            .build()?,
        ActionGroup::builder("UserInput")
            .builtin(BuiltinTool::user_input())
            .build()?,
    ])?;

    let identity = Identity::new("111122223333", "us-west-2");
    let resolver = ExecutorResolver::new(StaticIdentityProvider::new(identity));

    let payload = groups.serialize(&resolver).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    // The runtime returns control for in-process tools; dispatch by name
    let tools = groups.tool_map().await?;
    println!("\nLocal tools: {:?}", tools.names());

    if let Some(weather) = tools.get("get_weather") {
        let result = weather
            .execute_raw(serde_json::json!({"location": "Seattle"}))
            .await?;
        println!("get_weather -> {}", result.as_text());
    }

    Ok(())
}
