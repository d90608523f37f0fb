use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::error::{GitHubError, OperationError};
use crate::github::types::IssueState;
use crate::mcp_core::resources::{ResourceContents, ResourceTemplate};
use crate::tools::adapter::{GitHubAdapter, DEFAULT_FOLLOWERS_LIMIT, DEFAULT_REPOSITORIES_LIMIT};
use crate::tools::registry::to_json;

pub const RESOURCE_SCHEME: &str = "github://";

type Params = HashMap<String, String>;

pub type ResourceHandlerFunc =
    Box<dyn Fn(Params) -> BoxFuture<'static, Result<Value, OperationError>> + Send + Sync>;

struct RegisteredResource {
    template: ResourceTemplate,
    pattern: UriTemplate,
    handler: ResourceHandlerFunc,
}

/// URI-templated read-only aliases over the adapter operations.
pub struct ResourceRegistry {
    resources: Vec<RegisteredResource>,
}

impl ResourceRegistry {
    pub fn new(adapter: GitHubAdapter) -> Self {
        let mut registry = Self { resources: Vec::new() };
        registry.register_handlers(adapter);
        registry
    }

    fn register_handlers(&mut self, adapter: GitHubAdapter) {
        info!("Registering resource handlers");

        let client = adapter.clone();
        self.register(
            "github://user/{username}",
            "User profile",
            "A user's GitHub profile information",
            Box::new(move |params: Params| {
                let adapter = client.clone();
                Box::pin(async move {
                    let user = adapter.get_user_info(param(&params, "username")).await?;
                    to_json("get_user_info", user)
                }) as BoxFuture<'static, Result<Value, OperationError>>
            }),
        );

        let client = adapter.clone();
        self.register(
            "github://followers/{username}",
            "User followers",
            "A user's followers",
            Box::new(move |params: Params| {
                let adapter = client.clone();
                Box::pin(async move {
                    let followers = adapter
                        .list_followers(param(&params, "username"), DEFAULT_FOLLOWERS_LIMIT)
                        .await?;
                    to_json("list_followers", followers)
                }) as BoxFuture<'static, Result<Value, OperationError>>
            }),
        );

        let client = adapter.clone();
        self.register(
            "github://repos/{username}",
            "User repositories",
            "A user's repositories",
            Box::new(move |params: Params| {
                let adapter = client.clone();
                Box::pin(async move {
                    let repos = adapter
                        .list_repositories(param(&params, "username"), DEFAULT_REPOSITORIES_LIMIT)
                        .await?;
                    to_json("list_repositories", repos)
                }) as BoxFuture<'static, Result<Value, OperationError>>
            }),
        );

        let client = adapter.clone();
        self.register(
            "github://issues/{owner}/{repo}",
            "Repository issues",
            "Open issues of a repository",
            Box::new(move |params: Params| {
                let adapter = client.clone();
                Box::pin(async move {
                    let issues = adapter
                        .get_repo_issues(param(&params, "owner"), param(&params, "repo"), IssueState::Open)
                        .await?;
                    to_json("get_repo_issues", issues)
                }) as BoxFuture<'static, Result<Value, OperationError>>
            }),
        );

        let client = adapter;
        self.register(
            "github://commit-status/{owner}/{repo}/{sha}",
            "Commit statuses",
            "Statuses reported for a specific commit SHA",
            Box::new(move |params: Params| {
                let adapter = client.clone();
                Box::pin(async move {
                    let statuses = adapter
                        .get_commit_statuses(param(&params, "owner"), param(&params, "repo"), param(&params, "sha"))
                        .await?;
                    to_json("get_commit_statuses", statuses)
                }) as BoxFuture<'static, Result<Value, OperationError>>
            }),
        );

        info!("Registered {} resource handlers", self.resources.len());
    }

    fn register(&mut self, uri_template: &str, name: &str, description: &str, handler: ResourceHandlerFunc) {
        self.resources.push(RegisteredResource {
            template: ResourceTemplate {
                uri_template: uri_template.to_string(),
                name: name.to_string(),
                description: Some(description.to_string()),
                mime_type: Some(mime::APPLICATION_JSON.to_string()),
            },
            pattern: UriTemplate::parse(uri_template),
            handler,
        });
    }

    pub fn list_templates(&self) -> Vec<ResourceTemplate> {
        self.resources.iter().map(|r| r.template.clone()).collect()
    }

    pub async fn read_resource(&self, uri: &str) -> Result<Value, OperationError> {
        debug!("Reading resource: {}", uri);

        let (resource, params) = self
            .resources
            .iter()
            .find_map(|r| r.pattern.match_uri(uri).map(|params| (r, params)))
            .ok_or_else(|| {
                OperationError::new(
                    "resources/read",
                    format!("uri={}", uri),
                    GitHubError::NotFound(format!("No resource matches URI: {}", uri)),
                )
            })?;

        debug!("Resource {} matched {}", uri, resource.template.uri_template);
        let value = (resource.handler)(params).await.map_err(|e| {
            error!("Resource read failed: {}", e);
            e
        })?;

        let contents = ResourceContents {
            uri: uri.to_string(),
            mime_type: mime::APPLICATION_JSON.to_string(),
            text: value.to_string(),
        };
        let contents = to_json("resources/read", contents)?;

        Ok(serde_json::json!({ "contents": [contents] }))
    }
}

fn param<'a>(params: &'a Params, name: &str) -> &'a str {
    params.get(name).map(String::as_str).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A `github://` URI template whose variables each capture exactly one
/// path segment.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(template: &str) -> Self {
        let path = template.strip_prefix(RESOURCE_SCHEME).unwrap_or(template);
        let segments = path
            .split('/')
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Variable(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self { segments }
    }

    pub fn match_uri(&self, uri: &str) -> Option<HashMap<String, String>> {
        let path = uri.strip_prefix(RESOURCE_SCHEME)?;
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Variable(name) => {
                    let value = urlencoding::decode(part).ok()?;
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }

        Some(params)
    }
}
