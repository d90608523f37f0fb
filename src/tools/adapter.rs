//! Typed GitHub operations behind every tool and resource.
//!
//! Each operation validates its input locally, issues the remote calls it
//! needs through the shared [`GitHubClient`], and projects the response into
//! one of the fixed shapes in [`super::projections`]. Failures are wrapped in
//! an [`OperationError`] naming the operation and its input.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error};

use super::projections::*;
use crate::error::{GitHubError, OperationError};
use crate::github::types::{IssueState, NewIssue};
use crate::github::{collect_all, collect_bounded, GitHubClient};

pub const DEFAULT_FOLLOWERS_LIMIT: usize = 10;
pub const DEFAULT_REPOSITORIES_LIMIT: usize = 5;

/// Largest page GitHub serves on list endpoints.
const MAX_PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct GitHubAdapter {
    client: Arc<GitHubClient>,
}

impl GitHubAdapter {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }

    pub async fn get_self_info(&self) -> Result<SelfInfo, OperationError> {
        run("get_self_info", String::new(), async {
            let user = self.client.get_authenticated_user().await?;
            Ok(SelfInfo::from(user))
        })
        .await
    }

    pub async fn get_user_info(&self, username: &str) -> Result<UserInfo, OperationError> {
        run("get_user_info", format!("username={}", username), async {
            require_non_empty("username", username)?;
            let user = self.client.get_user(username).await?;
            Ok(UserInfo::from(user))
        })
        .await
    }

    pub async fn list_followers(&self, username: &str, limit: usize) -> Result<Vec<String>, OperationError> {
        let input = format!("username={}, limit={}", username, limit);
        run("list_followers", input, async {
            require_non_empty("username", username)?;
            if limit == 0 {
                self.client.get_user(username).await?;
                return Ok(Vec::new());
            }

            let pages = self.client.followers(username, page_size(limit))?;
            let followers = collect_bounded(pages, limit).await?;
            Ok(followers.into_iter().map(|follower| follower.login).collect())
        })
        .await
    }

    pub async fn list_repositories(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RepositorySummary>, OperationError> {
        let input = format!("username={}, limit={}", username, limit);
        run("list_repositories", input, async {
            require_non_empty("username", username)?;
            if limit == 0 {
                self.client.get_user(username).await?;
                return Ok(Vec::new());
            }

            let pages = self.client.user_repositories(username, page_size(limit))?;
            let repos = collect_bounded(pages, limit).await?;
            Ok(repos.into_iter().map(RepositorySummary::from).collect())
        })
        .await
    }

    pub async fn get_repo_issues(
        &self,
        owner: &str,
        repo: &str,
        state: IssueState,
    ) -> Result<Vec<IssueSummary>, OperationError> {
        let input = format!("owner={}, repo={}, state={}", owner, repo, state.as_str());
        run("get_repo_issues", input, async {
            require_non_empty("owner", owner)?;
            require_non_empty("repo", repo)?;

            let pages = self.client.repository_issues(owner, repo, state)?;
            let issues = collect_all(pages).await?;
            Ok(issues.into_iter().map(IssueSummary::from).collect())
        })
        .await
    }

    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        labels: Option<Vec<String>>,
    ) -> Result<CreatedIssue, OperationError> {
        let labels = labels.unwrap_or_default();
        let input = format!("owner={}, repo={}, title={:?}, labels={:?}", owner, repo, title, labels);
        run("create_issue", input, async {
            require_non_empty("owner", owner)?;
            require_non_empty("repo", repo)?;
            require_non_empty("title", title)?;
            if labels.iter().any(|label| label.trim().is_empty()) {
                return Err(GitHubError::Validation("labels must not be blank".to_string()));
            }

            let new_issue = NewIssue {
                title,
                body,
                labels: &labels,
            };
            let issue = self.client.create_issue(owner, repo, &new_issue).await?;
            Ok(CreatedIssue::from(issue))
        })
        .await
    }

    pub async fn get_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CommitStatusSummary>, OperationError> {
        let input = format!("owner={}, repo={}, sha={}", owner, repo, sha);
        run("get_commit_statuses", input, async {
            require_non_empty("owner", owner)?;
            require_non_empty("repo", repo)?;
            require_commit_ref(sha)?;

            let resolved = self.client.resolve_commit(owner, repo, sha).await?;
            let pages = self.client.commit_statuses(owner, repo, &resolved)?;
            let statuses = collect_all(pages).await?;
            Ok(statuses.into_iter().map(CommitStatusSummary::from).collect())
        })
        .await
    }
}

async fn run<T, F>(operation: &'static str, input: String, call: F) -> Result<T, OperationError>
where
    F: Future<Output = Result<T, GitHubError>>,
{
    debug!(operation, input = %input, "Calling GitHub");

    call.await.map_err(|source| {
        let err = OperationError::new(operation, input, source);
        error!("{}", err);
        err
    })
}

fn page_size(limit: usize) -> u8 {
    limit.min(MAX_PAGE_SIZE) as u8
}

fn require_non_empty(field: &str, value: &str) -> Result<(), GitHubError> {
    if value.trim().is_empty() {
        return Err(GitHubError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_commit_ref(sha: &str) -> Result<(), GitHubError> {
    require_non_empty("sha", sha)?;
    if sha.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(GitHubError::Validation(format!("'{}' is not a commit identifier", sha)));
    }
    Ok(())
}
