use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use super::adapter::GitHubAdapter;
use super::toolsets::*;
use crate::error::{GitHubError, OperationError};
use crate::mcp_core::tools::Tool;

pub type ToolHandlerFunc =
    Box<dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value, OperationError>> + Send + Sync>;

/// Named tools and their handlers. Built once at startup and read-only
/// afterwards.
pub struct ToolRegistry {
    tools: Vec<Tool>,
    handlers: HashMap<String, ToolHandlerFunc>,
    toolsets: ToolsetGroup,
}

impl ToolRegistry {
    pub fn new(enabled_toolsets: &[String], read_only: bool, adapter: GitHubAdapter) -> Self {
        info!("Initializing tool registry with toolsets: {:?}", enabled_toolsets);

        let mut registry = Self {
            tools: Vec::new(),
            handlers: HashMap::new(),
            toolsets: ToolsetGroup::new(),
        };

        // Context tools are always enabled
        registry.register_toolset(super::context::create_context_toolset(adapter.clone()));

        let all = enabled_toolsets.iter().any(|name| name == "all");
        for &name in ALL_TOOLSETS {
            if name == "context" || registry.toolsets.has_toolset(name) {
                continue;
            }
            if all || enabled_toolsets.iter().any(|enabled| enabled == name) {
                let toolset = match name {
                    "users" => super::users::create_users_toolset(adapter.clone()),
                    "issues" => super::issues::create_issues_toolset(adapter.clone(), read_only),
                    "statuses" => super::statuses::create_statuses_toolset(adapter.clone()),
                    _ => continue,
                };
                registry.register_toolset(toolset);
            }
        }

        for name in enabled_toolsets {
            if name != "all" && !ALL_TOOLSETS.contains(&name.as_str()) {
                warn!("Unknown toolset: {}", name);
            }
        }

        info!("Tool registry initialized with {} tools", registry.tools.len());
        registry
    }

    fn register_toolset(&mut self, mut toolset: Toolset) {
        debug!("Registering toolset: {} ({})", toolset.name, toolset.description);

        let tool_names = toolset.get_tool_names();
        for (tool, handler) in toolset.tools.drain(..) {
            if self.handlers.contains_key(&tool.name) {
                debug!("Tool {} already registered, skipping", tool.name);
                continue;
            }

            debug!("Registering tool: {}", tool.name);
            self.handlers.insert(tool.name.clone(), handler);
            self.tools.push(tool);
        }

        self.toolsets.add_toolset(toolset.name, toolset.description, tool_names);
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<Value, OperationError> {
        debug!("Calling tool: {} with args: {:?}", name, arguments);

        let handler = self.handlers.get(name).ok_or_else(|| {
            OperationError::new(
                "tools/call",
                format!("name={}", name),
                GitHubError::Validation(format!("Tool not found: {}", name)),
            )
        })?;

        match handler(arguments).await {
            Ok(result) => {
                debug!("Tool {} executed successfully", name);
                Ok(result)
            }
            Err(e) => {
                error!("Tool {} execution failed: {}", name, e);
                Err(e)
            }
        }
    }

    pub fn get_toolset_names(&self) -> Vec<String> {
        self.toolsets.get_toolset_names()
    }

    pub fn get_toolset_tools(&self, toolset_name: &str) -> Option<Vec<String>> {
        self.toolsets.get_toolset_tools(toolset_name)
    }

    pub fn get_toolset_description(&self, toolset_name: &str) -> Option<&str> {
        self.toolsets.get_toolset_description(toolset_name)
    }
}

/// Runs an argument parser for `tool`, attributing any failure to the tool
/// and the raw arguments it received.
pub(crate) fn parse_arguments<T>(
    tool: &'static str,
    args: &Map<String, Value>,
    parse: impl FnOnce(&Map<String, Value>) -> Result<T, GitHubError>,
) -> Result<T, OperationError> {
    parse(args).map_err(|source| OperationError::new(tool, Value::Object(args.clone()).to_string(), source))
}

pub(crate) fn to_json<T: Serialize>(tool: &'static str, value: T) -> Result<Value, OperationError> {
    serde_json::to_value(value).map_err(|e| OperationError::new(tool, String::new(), e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{GitHubClient, GitHubConfig};
    use std::sync::Arc;

    fn adapter() -> GitHubAdapter {
        let client = GitHubClient::new(GitHubConfig {
            token: None,
            host: None,
            user_agent: "registry-tests".to_string(),
        })
        .unwrap();
        GitHubAdapter::new(Arc::new(client))
    }

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list_tools().into_iter().map(|tool| tool.name).collect()
    }

    #[test]
    fn selected_toolsets_plus_context_are_registered() {
        let registry = ToolRegistry::new(&["users".to_string(), "bogus".to_string()], false, adapter());

        assert_eq!(registry.get_toolset_names(), vec!["context", "users"]);
        assert_eq!(
            names(&registry),
            vec!["get_self_info", "get_user_info", "list_followers", "list_repositories"]
        );
        assert_eq!(
            registry.get_toolset_tools("context"),
            Some(vec!["get_self_info".to_string()])
        );
    }

    #[test]
    fn registered_toolsets_keep_their_descriptions() {
        let registry = ToolRegistry::new(&["all".to_string()], false, adapter());

        for name in ALL_TOOLSETS {
            let description = registry.get_toolset_description(name).unwrap();
            assert!(!description.is_empty(), "{} has no description", name);
        }
        assert_eq!(registry.get_toolset_description("bogus"), None);
    }

    #[test]
    fn read_only_drops_mutating_tools() {
        let registry = ToolRegistry::new(&["issues".to_string()], true, adapter());

        assert_eq!(names(&registry), vec!["get_self_info", "get_repo_issues"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let registry = ToolRegistry::new(&["all".to_string()], false, adapter());

        let err = registry.call_tool("delete_repo", Map::new()).await.unwrap_err();
        assert!(err.is_validation());
    }
}
