use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::adapter::GitHubAdapter;
use super::registry::{parse_arguments, to_json, ToolHandlerFunc};
use super::toolsets::Toolset;
use crate::error::OperationError;
use crate::github::types::IssueState;
use crate::mcp_core::tools::Tool;
use crate::server::{optional_param, optional_param_with_default, required_param};

pub fn create_issues_toolset(adapter: GitHubAdapter, read_only: bool) -> Toolset {
    let mut toolset = Toolset::new("issues", "Issue listing and creation tools");

    add_get_repo_issues_tool(&mut toolset, adapter.clone());

    if !read_only {
        add_create_issue_tool(&mut toolset, adapter);
    }

    toolset
}

fn add_get_repo_issues_tool(toolset: &mut Toolset, adapter: GitHubAdapter) {
    let tool = Tool {
        name: "get_repo_issues".to_string(),
        description: "Get issues for a repository".to_string(),
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
                "state": {
                    "type": "string",
                    "description": "Issue state",
                    "enum": ["open", "closed", "all"],
                    "default": "open"
                }
            },
            "required": ["owner", "repo"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let (owner, repo, state): (String, String, IssueState) =
                parse_arguments("get_repo_issues", &args, |args| {
                    let state: String = optional_param_with_default(args, "state", "open".to_string())?;
                    Ok((
                        required_param(args, "owner")?,
                        required_param(args, "repo")?,
                        state.parse()?,
                    ))
                })?;

            let issues = adapter.get_repo_issues(&owner, &repo, state).await?;
            to_json("get_repo_issues", issues)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
}

fn add_create_issue_tool(toolset: &mut Toolset, adapter: GitHubAdapter) {
    let tool = Tool {
        name: "create_issue".to_string(),
        description: "Create a new issue in a repository".to_string(),
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
                "title": {
                    "type": "string",
                    "description": "Issue title",
                    "minLength": 1
                },
                "body": {
                    "type": "string",
                    "description": "Issue body"
                },
                "labels": {
                    "type": "array",
                    "description": "Labels to add",
                    "items": {"type": "string"}
                }
            },
            "required": ["owner", "repo", "title", "body"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let (owner, repo, title, body, labels): (String, String, String, String, Option<Vec<String>>) =
                parse_arguments("create_issue", &args, |args| {
                    Ok((
                        required_param(args, "owner")?,
                        required_param(args, "repo")?,
                        required_param(args, "title")?,
                        required_param(args, "body")?,
                        optional_param(args, "labels")?,
                    ))
                })?;

            let issue = adapter.create_issue(&owner, &repo, &title, &body, labels).await?;
            to_json("create_issue", issue)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
}
