use std::sync::Arc;

use rmcp::model::CallToolRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::streamable_http_client::{
    StreamableHttpClientTransport, StreamableHttpClientTransportConfig,
};
use rmcp::transport::TokioChildProcess;
use rmcp::{RoleClient, ServiceExt};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};

use super::tool_adapter::McpToolAdapter;
use super::transport::{HttpTransport, StdioTransport};
use super::{McpError, McpServerConfig, McpToolDefinition, McpToolSource, McpTransport};
use crate::schema::FunctionDefinition;
use crate::tool::DynTool;

type Session = RunningService<RoleClient, ()>;

/// MCP client usable as an action group tool source.
///
/// The server is started (or dialled) on first use. Clones share one session
/// and its tool catalog, which is listed once per session.
#[derive(Clone)]
pub struct McpClient {
    config: Arc<McpServerConfig>,
    session: Arc<RwLock<Option<Session>>>,
    catalog: Arc<Mutex<Option<Vec<McpToolDefinition>>>>,
}

impl McpClient {
    pub fn new(config: McpServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            catalog: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Open the session if there is none yet
    pub async fn connect(&self) -> Result<(), McpError> {
        let mut slot = self.session.write().await;
        if slot.is_none() {
            let session = match &self.config.transport {
                McpTransport::Stdio(stdio) => self.open_stdio(stdio).await?,
                McpTransport::Http(http) => self.open_http(http).await?,
            };
            log::debug!("MCP session with '{}' established", self.config.name);
            *slot = Some(session);
        }
        Ok(())
    }

    async fn open_stdio(&self, stdio: &StdioTransport) -> Result<Session, McpError> {
        let child = TokioChildProcess::new(stdio.command()).map_err(|e| {
            McpError::Transport(format!("could not spawn '{}': {}", stdio.program, e))
        })?;
        ().serve(child).await.map_err(|e| self.handshake_failed(e))
    }

    async fn open_http(&self, http: &HttpTransport) -> Result<Session, McpError> {
        let client = reqwest::Client::builder()
            .default_headers(http.header_map()?)
            .build()
            .map_err(|e| {
                McpError::Transport(format!("could not build HTTP client: {}", e))
            })?;
        let transport = StreamableHttpClientTransport::with_client(
            client,
            StreamableHttpClientTransportConfig::with_uri(http.url.clone()),
        );
        ().serve(transport)
            .await
            .map_err(|e| self.handshake_failed(e))
    }

    fn handshake_failed(&self, e: impl std::fmt::Display) -> McpError {
        let name = &self.config.name;
        McpError::Connection(format!("handshake with '{name}' failed: {e}"))
    }

    /// Connect if needed and borrow the live session
    async fn session(&self) -> Result<RwLockReadGuard<'_, Session>, McpError> {
        self.connect().await?;
        let slot = self.session.read().await;
        RwLockReadGuard::try_map(slot, |slot| slot.as_ref()).map_err(|_| {
            McpError::Connection(format!("session with '{}' was closed", self.config.name))
        })
    }

    /// Every page of the server's catalog, minus filtered tools, with
    /// server-side names. Fetched on the first call after connecting.
    pub async fn list_tools(&self) -> Result<Vec<McpToolDefinition>, McpError> {
        let mut catalog = self.catalog.lock().await;
        if let Some(tools) = catalog.as_ref() {
            return Ok(tools.clone());
        }
        let tools = self.fetch_tools().await?;
        log::debug!("'{}' lists {} tool(s)", self.config.name, tools.len());
        *catalog = Some(tools.clone());
        Ok(tools)
    }

    async fn fetch_tools(&self) -> Result<Vec<McpToolDefinition>, McpError> {
        let tools = self
            .session()
            .await?
            .list_all_tools()
            .await
            .map_err(|e| McpError::Protocol(format!("tools/list failed: {}", e)))?;

        Ok(tools
            .into_iter()
            .filter(|tool| self.config.admits(&tool.name))
            .map(|tool| McpToolDefinition {
                name: tool.name.to_string(),
                description: tool.description.unwrap_or_default().to_string(),
                input_schema: Value::Object((*tool.input_schema).clone()),
            })
            .collect())
    }

    /// Invoke a tool by its server-side name and return the raw result
    pub async fn call_tool(&self, name: String, arguments: Value) -> Result<Value, McpError> {
        let request = CallToolRequestParam {
            name: name.into(),
            arguments: arguments.as_object().cloned(),
        };
        let result = self
            .session()
            .await?
            .call_tool(request)
            .await
            .map_err(|e| McpError::ToolExecution(e.to_string()))?;
        Ok(serde_json::to_value(result)?)
    }

    /// Close the session. The next call opens a new one.
    pub async fn disconnect(&self) -> Result<(), McpError> {
        self.catalog.lock().await.take();
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        session.cancel().await.map_err(|e| {
            McpError::Connection(format!("closing '{}' failed: {}", self.config.name, e))
        })?;
        Ok(())
    }

    pub(crate) fn exposed_name(&self, tool: &str) -> String {
        self.config.exposed_name(tool)
    }
}

#[async_trait::async_trait]
impl McpToolSource for McpClient {
    fn name(&self) -> &str {
        self.name()
    }

    async fn callable_tools(&self) -> Result<Vec<Arc<dyn DynTool>>, McpError> {
        let definitions = self.list_tools().await?;
        let mut tools: Vec<Arc<dyn DynTool>> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let exposed = self.exposed_name(&definition.name);
            let adapter = McpToolAdapter::new(self.clone(), definition, exposed);
            tools.push(Arc::new(adapter));
        }
        Ok(tools)
    }

    async fn function_schema(&self) -> Result<Vec<FunctionDefinition>, McpError> {
        let definitions = self.list_tools().await?;
        Ok(definitions
            .iter()
            .map(|definition| FunctionDefinition {
                name: self.exposed_name(&definition.name),
                ..definition.to_function_definition()
            })
            .collect())
    }
}
