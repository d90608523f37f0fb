//! Fixed-field output shapes for every tool.
//!
//! Each projection is filled by an explicit `From` conversion from the raw
//! GitHub model, so the set of fields a tool returns is visible here and
//! nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::types::{CommitStatus, Issue, Repository, User};

/// Profile of the authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfInfo {
    pub name: Option<String>,
    pub login: String,
    pub followers: Option<u32>,
    pub following: Option<u32>,
    pub public_repos: Option<u32>,
    pub public_gists: Option<u32>,
    pub followers_url: String,
    pub following_url: String,
    pub repos_url: String,
    pub events_url: String,
    pub received_events_url: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub site_admin: bool,
}

impl From<User> for SelfInfo {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            login: user.login,
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            public_gists: user.public_gists,
            followers_url: user.followers_url,
            following_url: user.following_url,
            repos_url: user.repos_url,
            events_url: user.events_url,
            received_events_url: user.received_events_url,
            account_type: user.r#type,
            site_admin: user.site_admin,
        }
    }
}

/// Public profile of any account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: Option<String>,
    pub login: String,
    pub bio: Option<String>,
    pub public_repos: Option<u32>,
    pub followers: Option<u32>,
    pub following: Option<u32>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            login: user.login,
            bio: user.bio,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
}

impl From<Repository> for RepositorySummary {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    /// Login of the reporting account.
    pub user: String,
}

impl From<Issue> for IssueSummary {
    fn from(issue: Issue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            created_at: issue.created_at,
            user: issue.user.login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub url: String,
}

impl From<Issue> for CreatedIssue {
    fn from(issue: Issue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            url: issue.html_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitStatusSummary {
    pub context: String,
    pub state: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CommitStatus> for CommitStatusSummary {
    fn from(status: CommitStatus) -> Self {
        Self {
            context: status.context,
            state: status.state,
            description: status.description,
            created_at: status.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_user() -> User {
        serde_json::from_value(json!({
            "id": 1,
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "html_url": "https://github.com/octocat",
            "followers_url": "https://api.github.com/users/octocat/followers",
            "following_url": "https://api.github.com/users/octocat/following{/other_user}",
            "repos_url": "https://api.github.com/users/octocat/repos",
            "events_url": "https://api.github.com/users/octocat/events{/privacy}",
            "received_events_url": "https://api.github.com/users/octocat/received_events",
            "type": "User",
            "site_admin": false,
            "public_repos": 8,
            "public_gists": 8,
            "followers": 3938,
            "following": 9
        }))
        .unwrap()
    }

    #[test]
    fn self_info_has_thirteen_fields() {
        let value = serde_json::to_value(SelfInfo::from(sample_user())).unwrap();
        let fields = value.as_object().unwrap();

        assert_eq!(fields.len(), 13);
        assert_eq!(fields["type"], "User");
        assert_eq!(fields["site_admin"], false);
        assert!(!fields.contains_key("bio"));
    }

    #[test]
    fn user_info_has_six_fields() {
        let value = serde_json::to_value(UserInfo::from(sample_user())).unwrap();
        let fields = value.as_object().unwrap();

        assert_eq!(fields.len(), 6);
        assert_eq!(fields["login"], "octocat");
        assert_eq!(fields["bio"], serde_json::Value::Null);
        assert!(!fields.contains_key("followers_url"));
    }
}
