use crate::mcp_core::tools::Tool;
use std::collections::HashMap;

use super::registry::ToolHandlerFunc;

pub struct Toolset {
    pub name: String,
    pub description: String,
    pub tools: Vec<(Tool, ToolHandlerFunc)>,
}

impl Toolset {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            tools: Vec::new(),
        }
    }

    pub fn add_tool(&mut self, tool: Tool, handler: ToolHandlerFunc) {
        self.tools.push((tool, handler));
    }

    pub fn get_tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|(tool, _)| tool.name.clone()).collect()
    }
}

#[derive(Debug)]
struct ToolsetEntry {
    description: String,
    tool_names: Vec<String>,
}

/// Description and tool names of each registered toolset.
#[derive(Debug, Default)]
pub struct ToolsetGroup {
    toolsets: HashMap<String, ToolsetEntry>,
}

impl ToolsetGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_toolset(&mut self, name: String, description: String, tool_names: Vec<String>) {
        self.toolsets.insert(name, ToolsetEntry { description, tool_names });
    }

    pub fn has_toolset(&self, name: &str) -> bool {
        self.toolsets.contains_key(name)
    }

    pub fn get_toolset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.toolsets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_toolset_tools(&self, toolset_name: &str) -> Option<Vec<String>> {
        self.toolsets.get(toolset_name).map(|entry| entry.tool_names.clone())
    }

    pub fn get_toolset_description(&self, toolset_name: &str) -> Option<&str> {
        self.toolsets.get(toolset_name).map(|entry| entry.description.as_str())
    }
}

/// Toolsets that can be selected with `--toolsets`. `context` is always on.
pub const ALL_TOOLSETS: &[&str] = &["context", "users", "issues", "statuses"];
