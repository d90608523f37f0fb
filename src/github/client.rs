use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::pagination::{paginate, PageStream};
use super::types::*;
use crate::error::{GitHubError, Result};

const API_VERSION: &str = "2022-11-28";

#[derive(Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub host: Option<String>,
    pub user_agent: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Authenticated handle to the GitHub REST API.
///
/// Built once at startup and shared read-only between all operations.
pub struct GitHubClient {
    client: reqwest::Client,
    rest_base: Url,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let rest_base = Self::parse_api_host(&config.host)?;

        let mut headers = HeaderMap::new();
        match &config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| GitHubError::Authentication("token contains invalid characters".to_string()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("No GitHub token configured; requests will be unauthenticated"),
        }
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| GitHubError::Validation(format!("invalid user agent: {}", config.user_agent)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        info!("GitHub client initialized for {}", rest_base);

        Ok(Self { client, rest_base })
    }

    pub fn rest_base(&self) -> &Url {
        &self.rest_base
    }

    fn parse_api_host(host: &Option<String>) -> Result<Url> {
        match host.as_deref().map(str::trim) {
            None | Some("") => Self::dotcom_url(),
            Some(host) => {
                let url = Url::parse(host)
                    .map_err(|_| GitHubError::Validation(format!("Invalid host URL: {}", host)))?;

                let hostname = url
                    .host_str()
                    .ok_or_else(|| GitHubError::Validation(format!("Invalid hostname in URL: {}", host)))?;

                if hostname == "github.com" || hostname.ends_with(".github.com") {
                    Self::dotcom_url()
                } else if hostname.ends_with("ghe.com") {
                    Self::ghec_url(hostname)
                } else {
                    Self::ghes_url(&url)
                }
            }
        }
    }

    fn dotcom_url() -> Result<Url> {
        Ok(Url::parse("https://api.github.com/")?)
    }

    fn ghec_url(hostname: &str) -> Result<Url> {
        Ok(Url::parse(&format!("https://api.{}/", hostname))?)
    }

    fn ghes_url(url: &Url) -> Result<Url> {
        let hostname = url
            .host_str()
            .ok_or_else(|| GitHubError::Validation("Invalid hostname in GHES URL".to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", hostname, port),
            None => hostname.to_string(),
        };

        Ok(Url::parse(&format!("{}://{}/api/v3/", url.scheme(), authority))?)
    }

    /// Builds an API URL from path segments, percent-encoding each one.
    ///
    /// Dot segments are refused: `Url::join` would collapse them and address
    /// a different endpoint than the one requested.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments.iter().find(|segment| matches!(**segment, "." | "..")) {
            return Err(GitHubError::NotFound(format!("no resource named '{}'", segment)));
        }

        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(self.rest_base.join(&path)?)
    }

    fn paged_endpoint(&self, segments: &[&str], per_page: u8, extra: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint(segments)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("per_page", &per_page.clamp(1, 100).to_string());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    // User operations
    pub async fn get_authenticated_user(&self) -> Result<User> {
        let url = self.endpoint(&["user"])?;
        self.get_json(url).await
    }

    pub async fn get_user(&self, username: &str) -> Result<User> {
        let url = self.endpoint(&["users", username])?;
        self.get_json(url).await
    }

    pub fn followers(&self, username: &str, per_page: u8) -> Result<PageStream<SimpleUser>> {
        let url = self.paged_endpoint(&["users", username, "followers"], per_page, &[])?;
        Ok(paginate(self.client.clone(), url))
    }

    pub fn user_repositories(&self, username: &str, per_page: u8) -> Result<PageStream<Repository>> {
        let url = self.paged_endpoint(&["users", username, "repos"], per_page, &[])?;
        Ok(paginate(self.client.clone(), url))
    }

    // Issue operations
    pub fn repository_issues(&self, owner: &str, repo: &str, state: IssueState) -> Result<PageStream<Issue>> {
        let url = self.paged_endpoint(
            &["repos", owner, repo, "issues"],
            100,
            &[("state", state.as_str())],
        )?;
        Ok(paginate(self.client.clone(), url))
    }

    pub async fn create_issue(&self, owner: &str, repo: &str, new_issue: &NewIssue<'_>) -> Result<Issue> {
        let url = self.endpoint(&["repos", owner, repo, "issues"])?;
        debug!("POST {}", url);

        let response = send(self.client.post(url).json(new_issue)).await?;
        Ok(response.json().await?)
    }

    // Commit status operations

    /// Resolves a commit reference to its full SHA, failing with `NotFound`
    /// when the repository has no such commit.
    pub async fn resolve_commit(&self, owner: &str, repo: &str, reference: &str) -> Result<String> {
        let url = self.endpoint(&["repos", owner, repo, "commits", reference])?;
        debug!("GET {} (sha)", url);

        let request = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/vnd.github.sha"));

        let response = match send(request).await {
            Ok(response) => response,
            // GitHub answers 422 "No commit found for SHA" for unknown commits.
            Err(GitHubError::Validation(detail)) => return Err(GitHubError::NotFound(detail)),
            Err(e) => return Err(e),
        };

        Ok(response.text().await?.trim().to_string())
    }

    pub fn commit_statuses(&self, owner: &str, repo: &str, sha: &str) -> Result<PageStream<CommitStatus>> {
        let url = self.paged_endpoint(&["repos", owner, repo, "commits", sha, "statuses"], 100, &[])?;
        Ok(paginate(self.client.clone(), url))
    }
}

/// Sends a request and turns any non-success status into a classified error.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;

    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_for_response(response).await)
    }
}

async fn error_for_response(response: Response) -> GitHubError {
    let status = response.status();
    let headers = response.headers();
    // Primary limits zero the remaining counter; secondary limits send retry-after.
    let rate_limited = headers
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        == Some("0")
        || headers.contains_key(RETRY_AFTER);
    let path = response.url().path().to_string();

    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    classify_status(status, rate_limited, format!("{} ({} {})", message, status.as_u16(), path))
}

pub(crate) fn classify_status(status: StatusCode, rate_limited: bool, detail: String) -> GitHubError {
    match status {
        StatusCode::UNAUTHORIZED => GitHubError::Authentication(detail),
        StatusCode::FORBIDDEN if rate_limited => GitHubError::RemoteUnavailable(detail),
        StatusCode::FORBIDDEN => GitHubError::Authentication(detail),
        StatusCode::NOT_FOUND | StatusCode::GONE => GitHubError::NotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => GitHubError::Validation(detail),
        _ => GitHubError::RemoteUnavailable(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_for(host: Option<&str>) -> String {
        GitHubClient::parse_api_host(&host.map(str::to_string))
            .unwrap()
            .to_string()
    }

    #[test]
    fn resolves_api_base_for_each_host_kind() {
        assert_eq!(base_for(None), "https://api.github.com/");
        assert_eq!(base_for(Some("")), "https://api.github.com/");
        assert_eq!(base_for(Some("https://github.com")), "https://api.github.com/");
        assert_eq!(base_for(Some("https://acme.ghe.com")), "https://api.acme.ghe.com/");
        assert_eq!(
            base_for(Some("https://git.example.org")),
            "https://git.example.org/api/v3/"
        );
        assert_eq!(
            base_for(Some("http://127.0.0.1:8080")),
            "http://127.0.0.1:8080/api/v3/"
        );
    }

    #[test]
    fn rejects_unparseable_host() {
        let err = GitHubClient::parse_api_host(&Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, GitHubError::Validation(_)));
    }

    #[test]
    fn classifies_http_statuses() {
        let kind = |status, limited| classify_status(status, limited, String::new()).kind();

        assert_eq!(kind(StatusCode::UNAUTHORIZED, false), "authentication_error");
        assert_eq!(kind(StatusCode::FORBIDDEN, false), "authentication_error");
        assert_eq!(kind(StatusCode::FORBIDDEN, true), "remote_unavailable");
        assert_eq!(kind(StatusCode::NOT_FOUND, false), "not_found");
        assert_eq!(kind(StatusCode::GONE, false), "not_found");
        assert_eq!(kind(StatusCode::UNPROCESSABLE_ENTITY, false), "validation_error");
        assert_eq!(kind(StatusCode::TOO_MANY_REQUESTS, false), "remote_unavailable");
        assert_eq!(kind(StatusCode::BAD_GATEWAY, false), "remote_unavailable");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let client = GitHubClient::new(GitHubConfig {
            token: None,
            host: None,
            user_agent: "test".to_string(),
        })
        .unwrap();

        let url = client.endpoint(&["repos", "octo cat", "hello/world"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/octo%20cat/hello%2Fworld");

        let url = client.endpoint(&["users", "...", "repos"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/.../repos");
    }

    #[test]
    fn endpoint_refuses_dot_segments() {
        let client = GitHubClient::new(GitHubConfig {
            token: None,
            host: None,
            user_agent: "test".to_string(),
        })
        .unwrap();

        let cases: [&[&str]; 3] = [
            &["users", ".."],
            &["repos", "..", "..", "issues"],
            &["repos", "o", ".", "issues"],
        ];
        for segments in cases {
            let err = client.endpoint(segments).unwrap_err();
            assert!(matches!(err, GitHubError::NotFound(_)), "{:?}", segments);
        }
    }
}
