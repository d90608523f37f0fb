use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::adapter::{GitHubAdapter, DEFAULT_FOLLOWERS_LIMIT, DEFAULT_REPOSITORIES_LIMIT};
use super::registry::{parse_arguments, to_json, ToolHandlerFunc};
use super::toolsets::Toolset;
use crate::error::OperationError;
use crate::mcp_core::tools::Tool;
use crate::server::{limit_param, required_param};

pub fn create_users_toolset(adapter: GitHubAdapter) -> Toolset {
    let mut toolset = Toolset::new("users", "User profile, follower and repository tools");

    add_get_user_info_tool(&mut toolset, adapter.clone());
    add_list_followers_tool(&mut toolset, adapter.clone());
    add_list_repositories_tool(&mut toolset, adapter);

    toolset
}

fn add_get_user_info_tool(toolset: &mut Toolset, adapter: GitHubAdapter) {
    let tool = Tool {
        name: "get_user_info".to_string(),
        description: "Get information about a GitHub user".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "username": {
                    "type": "string",
                    "description": "GitHub login of the user"
                }
            },
            "required": ["username"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let username: String = parse_arguments("get_user_info", &args, |args| required_param(args, "username"))?;

            let user = adapter.get_user_info(&username).await?;
            to_json("get_user_info", user)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
}

fn add_list_followers_tool(toolset: &mut Toolset, adapter: GitHubAdapter) {
    let tool = Tool {
        name: "list_followers".to_string(),
        description: "List followers for a GitHub user (up to limit)".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "username": {
                    "type": "string",
                    "description": "GitHub login of the user"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of followers to return",
                    "minimum": 0,
                    "default": DEFAULT_FOLLOWERS_LIMIT
                }
            },
            "required": ["username"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let (username, limit): (String, usize) = parse_arguments("list_followers", &args, |args| {
                Ok((
                    required_param(args, "username")?,
                    limit_param(args, "limit", DEFAULT_FOLLOWERS_LIMIT)?,
                ))
            })?;

            let followers = adapter.list_followers(&username, limit).await?;
            to_json("list_followers", followers)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
}

fn add_list_repositories_tool(toolset: &mut Toolset, adapter: GitHubAdapter) {
    let tool = Tool {
        name: "list_repositories".to_string(),
        description: "List repositories for a GitHub user (up to limit)".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "username": {
                    "type": "string",
                    "description": "GitHub login of the user"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of repositories to return",
                    "minimum": 0,
                    "default": DEFAULT_REPOSITORIES_LIMIT
                }
            },
            "required": ["username"]
        }),
    };

    let handler: ToolHandlerFunc = Box::new(move |args: Map<String, Value>| {
        let adapter = adapter.clone();

        Box::pin(async move {
            let (username, limit): (String, usize) = parse_arguments("list_repositories", &args, |args| {
                Ok((
                    required_param(args, "username")?,
                    limit_param(args, "limit", DEFAULT_REPOSITORIES_LIMIT)?,
                ))
            })?;

            let repos = adapter.list_repositories(&username, limit).await?;
            to_json("list_repositories", repos)
        }) as BoxFuture<'static, Result<Value, OperationError>>
    });

    toolset.add_tool(tool, handler);
}
