#![allow(dead_code)]

use github_tools_mcp::{GitHubAdapter, GitHubClient, GitHubConfig, GitHubMcpServer, GitHubServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Prefix under which a mock server on an arbitrary host serves the REST API.
pub const API: &str = "/api/v3";

pub fn client_for(server: &MockServer) -> Arc<GitHubClient> {
    let client = GitHubClient::new(GitHubConfig {
        token: Some(TOKEN.to_string()),
        host: Some(server.uri()),
        user_agent: "github-tools-mcp-tests".to_string(),
    })
    .expect("client");
    Arc::new(client)
}

pub fn adapter_for(server: &MockServer) -> GitHubAdapter {
    GitHubAdapter::new(client_for(server))
}

pub fn server_config(read_only: bool) -> GitHubServerConfig {
    GitHubServerConfig {
        version: "0.0.0-test".to_string(),
        host: None,
        token: Some(TOKEN.to_string()),
        enabled_toolsets: vec!["all".to_string()],
        read_only,
        enable_command_logging: true,
        request_timeout: None,
    }
}

pub fn mcp_server_for(server: &MockServer, read_only: bool) -> GitHubMcpServer {
    GitHubMcpServer::with_client(server_config(read_only), client_for(server))
}

pub fn user_json(login: &str) -> Value {
    json!({
        "id": 583231,
        "login": login,
        "name": "The Octocat",
        "bio": "Mascot",
        "html_url": format!("https://github.com/{}", login),
        "followers_url": format!("https://api.github.com/users/{}/followers", login),
        "following_url": format!("https://api.github.com/users/{}/following{{/other_user}}", login),
        "repos_url": format!("https://api.github.com/users/{}/repos", login),
        "events_url": format!("https://api.github.com/users/{}/events{{/privacy}}", login),
        "received_events_url": format!("https://api.github.com/users/{}/received_events", login),
        "type": "User",
        "site_admin": false,
        "public_repos": 8,
        "public_gists": 8,
        "followers": 3938,
        "following": 9
    })
}

pub fn follower_json(id: u64, login: &str) -> Value {
    json!({ "id": id, "login": login })
}

pub fn repo_json(id: u64, name: &str, stars: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": format!("{} description", name),
        "html_url": format!("https://github.com/octocat/{}", name),
        "stargazers_count": stars,
        "forks_count": 3,
        "language": "Rust"
    })
}

pub fn issue_json(number: u64, title: &str, state: &str) -> Value {
    json!({
        "id": 1000 + number,
        "number": number,
        "title": title,
        "body": "details",
        "user": { "id": 1, "login": "reporter" },
        "labels": [],
        "state": state,
        "html_url": format!("https://github.com/octocat/hello-world/issues/{}", number),
        "created_at": "2011-04-22T13:33:48Z"
    })
}

pub fn status_json(id: u64, context: &str, state: &str) -> Value {
    json!({
        "id": id,
        "context": context,
        "state": state,
        "description": format!("{} is {}", context, state),
        "target_url": null,
        "created_at": "2012-07-20T01:19:13Z"
    })
}
