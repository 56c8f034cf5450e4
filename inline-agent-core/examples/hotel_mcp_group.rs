// Example exposing an MCP server's tools as an action group
//
// The server's tool catalog becomes the group's function schema, and its
// tools are callable in-process when the runtime returns control.
//
// Pass the server command as arguments, e.g.:
//
// cargo run --example hotel_mcp_group --features mcp -- npx -y @example/hotel-mcp

use std::sync::Arc;

use inline_agent_core::identity::StaticIdentityProvider;
use inline_agent_core::mcp::{McpClient, McpServerConfig, McpTransport};
use inline_agent_core::{ActionGroup, ActionGroups, ExecutorResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        anyhow::bail!("usage: hotel_mcp_group <command> [args...]");
    };

    let transport = McpTransport::stdio(command).args(args);
    let config = McpServerConfig::new("hotel", transport)
        .with_namespace("hotel");
    let client = McpClient::new(config);

    let group = ActionGroup::builder("HotelMcp")
        .description("Hotel tools served over MCP")
        .mcp_client(Arc::new(client.clone()))
        .build()?;
    let groups = ActionGroups::new([group])?;

    let resolver = ExecutorResolver::new(StaticIdentityProvider::placeholder());
    let payload = groups.serialize(&resolver).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let tools = groups.tool_map().await?;
    println!("\nCallable tools: {:?}", tools.names());

    client.disconnect().await?;
    Ok(())
}
