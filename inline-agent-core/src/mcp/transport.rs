use std::collections::{BTreeMap, HashSet};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::process::Command;

use super::McpError;

/// How to reach one MCP server and which of its tools to expose
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Label used in logs and errors
    pub name: String,
    pub transport: McpTransport,
    selection: ToolSelection,
    prefix: Option<String>,
}

/// Allow and deny lists over server-side tool names
#[derive(Debug, Clone, Default)]
struct ToolSelection {
    allow: Option<HashSet<String>>,
    deny: HashSet<String>,
}

impl ToolSelection {
    fn admits(&self, tool: &str) -> bool {
        let allowed = match &self.allow {
            Some(allow) => allow.contains(tool),
            None => true,
        };
        allowed && !self.deny.contains(tool)
    }
}

impl McpServerConfig {
    /// Tools keep the names the server lists unless a namespace is set.
    ///
    /// ```
    /// # use inline_agent_core::mcp::{McpServerConfig, McpTransport};
    /// let config = McpServerConfig::new(
    ///     "hotel",
    ///     McpTransport::stdio("npx").args(["-y", "@example/hotel-mcp"]),
    /// );
    /// ```
    pub fn new(name: impl Into<String>, transport: impl Into<McpTransport>) -> Self {
        Self {
            name: name.into(),
            transport: transport.into(),
            selection: ToolSelection::default(),
            prefix: None,
        }
    }

    /// Prefix every exposed tool name with `namespace` and an underscore.
    ///
    /// ```
    /// # use inline_agent_core::mcp::{McpServerConfig, McpTransport};
    /// let config = McpServerConfig::new("hotel-reservations", McpTransport::stdio("hotel-mcp"))
    ///     .with_namespace("hotel");
    /// // book_room is exposed as hotel_book_room
    /// ```
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let mut prefix = namespace.into();
        if !prefix.ends_with('_') {
            prefix.push('_');
        }
        self.prefix = Some(prefix);
        self
    }

    /// Expose only these tools. Repeated calls widen the list.
    pub fn only_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection
            .allow
            .get_or_insert_with(HashSet::new)
            .extend(tools.into_iter().map(Into::into));
        self
    }

    /// Never expose these tools, even if allowed by `only_tools`
    pub fn exclude_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection
            .deny
            .extend(tools.into_iter().map(Into::into));
        self
    }

    /// Whether a tool, by its server-side name, is exposed
    pub(crate) fn admits(&self, tool: &str) -> bool {
        self.selection.admits(tool)
    }

    /// Name the agent sees for a server-side tool
    pub(crate) fn exposed_name(&self, tool: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, tool),
            None => tool.to_string(),
        }
    }
}

/// Transport used to talk to an MCP server
#[derive(Debug, Clone)]
pub enum McpTransport {
    /// Child process speaking JSON-RPC over stdin/stdout
    Stdio(StdioTransport),
    /// Streamable HTTP endpoint (typically ending in `/mcp`)
    Http(HttpTransport),
}

impl McpTransport {
    pub fn stdio(program: impl Into<String>) -> StdioTransport {
        StdioTransport {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn http(url: impl Into<String>) -> HttpTransport {
        HttpTransport {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// Process to spawn for a stdio server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdioTransport {
    pub program: String,
    pub args: Vec<String>,
    /// Added to the inherited environment
    pub env: BTreeMap<String, String>,
}

impl StdioTransport {
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.env);
        command
    }
}

/// Endpoint and request headers for an HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransport {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl HttpTransport {
    /// Send a header with every request (e.g. `Authorization`)
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, McpError> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                    McpError::Config(format!("invalid header name '{}': {}", name, e))
                })?;
                let value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                    McpError::Config(format!("invalid value for header '{}': {}", name, e))
                })?;
                Ok((name, value))
            })
            .collect()
    }
}

impl From<StdioTransport> for McpTransport {
    fn from(stdio: StdioTransport) -> Self {
        Self::Stdio(stdio)
    }
}

impl From<HttpTransport> for McpTransport {
    fn from(http: HttpTransport) -> Self {
        Self::Http(http)
    }
}
