use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::adapter::GitHubAdapter;
use super::registry::{to_json, ToolHandlerFunc};
use super::toolsets::Toolset;
use crate::error::OperationError;
use crate::mcp_core::tools::Tool;

pub fn create_context_toolset(adapter: GitHubAdapter) -> Toolset {
    let mut toolset = Toolset::new("context", "Context tools for getting current user information");

    let tool = Tool {
        name: "get_self_info".to_string(),
        description: "Get profile information about the authenticated GitHub account".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |_args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let me = adapter.get_self_info().await?;
            to_json("get_self_info", me)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
    toolset
}
