use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::adapter::GitHubAdapter;
use super::registry::{parse_arguments, to_json, ToolHandlerFunc};
use super::toolsets::Toolset;
use crate::error::OperationError;
use crate::mcp_core::tools::Tool;
use crate::server::required_param;

pub fn create_statuses_toolset(adapter: GitHubAdapter) -> Toolset {
    let mut toolset = Toolset::new("statuses", "Commit status tools");

    let tool = Tool {
        name: "get_commit_statuses".to_string(),
        description: "Get commit statuses for a specific commit SHA in a repository".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "owner": {
                    "type": "string",
                    "description": "Repository owner"
                },
                "repo": {
                    "type": "string",
                    "description": "Repository name"
                },
                "sha": {
                    "type": "string",
                    "description": "Commit SHA"
                }
            },
            "required": ["owner", "repo", "sha"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let (owner, repo, sha): (String, String, String) =
                parse_arguments("get_commit_statuses", &args, |args| {
                    Ok((
                        required_param(args, "owner")?,
                        required_param(args, "repo")?,
                        required_param(args, "sha")?,
                    ))
                })?;

            let statuses = adapter.get_commit_statuses(&owner, &repo, &sha).await?;
            to_json("get_commit_statuses", statuses)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
    toolset
}
