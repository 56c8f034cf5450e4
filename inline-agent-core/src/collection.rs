//! The full set of action groups handed to an inline agent

use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::Arc;

use crate::action_group::{ActionGroup, CapabilitySource, ConfigurationError, LambdaSchema};
use crate::error::Result;
use crate::executor::ExecutorResolver;
use crate::mcp::McpError;
use crate::tool::DynTool;
use crate::wire::{ActionGroupPayload, FunctionSchema};

/// Locally invocable tools by name
#[derive(Clone, Default)]
pub struct ToolMap(HashMap<String, Arc<dyn DynTool>>);

impl ToolMap {
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynTool>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert(&mut self, tool: Arc<dyn DynTool>) {
        let name = tool.name().to_string();
        if self.0.insert(name.clone(), tool).is_some() {
            log::warn!(
                "tool '{}' is defined more than once; the later definition wins",
                name
            );
        }
    }
}

impl std::fmt::Debug for ToolMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// An ordered collection of action groups with unique names
#[derive(Debug, Clone, Default)]
pub struct ActionGroups {
    groups: Vec<ActionGroup>,
}

impl ActionGroups {
    /// Collect groups, rejecting duplicate names
    pub fn new(groups: impl IntoIterator<Item = ActionGroup>) -> Result<Self> {
        let groups: Vec<ActionGroup> = groups.into_iter().collect();

        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.name()) {
                return Err(ConfigurationError::DuplicateActionGroup {
                    name: group.name().to_string(),
                }
                .into());
            }
        }

        Ok(Self { groups })
    }

    pub fn get(&self, name: &str) -> Option<&ActionGroup> {
        self.groups.iter().find(|group| group.name() == name)
    }

    /// Every tool the caller can invoke in-process.
    ///
    /// Only tool groups and the catalogs of MCP groups contribute; Lambda and
    /// built-in groups run elsewhere. On a name collision the later tool wins.
    pub async fn tool_map(&self) -> std::result::Result<ToolMap, McpError> {
        let mut map = ToolMap::default();

        for group in &self.groups {
            match group.source() {
                CapabilitySource::Tools { tools, .. } => {
                    for tool in tools {
                        map.insert(Arc::clone(tool));
                    }
                }
                CapabilitySource::Mcp { clients } => {
                    for client in clients {
                        for tool in client.callable_tools().await? {
                            map.insert(tool);
                        }
                    }
                }
                CapabilitySource::Lambda { .. } | CapabilitySource::Builtin(_) => {}
            }
        }

        Ok(map)
    }

    /// Wire payloads for every group, in order
    pub async fn serialize(&self, resolver: &ExecutorResolver) -> Result<Vec<ActionGroupPayload>> {
        let mut payloads = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let mut payload =
                ActionGroupPayload::named(group.name(), group.description().map(str::to_string));
            payload.action_group_executor = resolver.resolve(group).await?;

            match group.source() {
                CapabilitySource::Tools { functions, .. } => {
                    payload.function_schema = Some(FunctionSchema {
                        functions: functions.clone(),
                    });
                }
                CapabilitySource::Lambda { schema, .. } => match schema {
                    LambdaSchema::Functions(functions) => {
                        payload.function_schema = Some(FunctionSchema {
                            functions: functions.clone(),
                        });
                    }
                    LambdaSchema::Api(api) => payload.api_schema = Some(api.clone()),
                },
                CapabilitySource::Mcp { clients } => {
                    let mut functions = Vec::new();
                    for client in clients {
                        functions.extend(client.function_schema().await?);
                    }
                    payload.function_schema = Some(FunctionSchema { functions });
                }
                CapabilitySource::Builtin(builtin) => {
                    payload.parent_action_group_signature = Some(builtin.signature().to_string());
                    payload.parent_action_group_signature_params = builtin.params().cloned();
                }
            }

            payloads.push(payload);
        }

        Ok(payloads)
    }
}

impl Deref for ActionGroups {
    type Target = [ActionGroup];

    fn deref(&self) -> &Self::Target {
        &self.groups
    }
}

impl IntoIterator for ActionGroups {
    type Item = ActionGroup;
    type IntoIter = std::vec::IntoIter<ActionGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionGroups {
    type Item = &'a ActionGroup;
    type IntoIter = std::slice::Iter<'a, ActionGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
