use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("GitHub API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GitHubError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GitHubError::Authentication(_) => "authentication_error",
            GitHubError::NotFound(_) => "not_found",
            GitHubError::Validation(_) => "validation_error",
            GitHubError::RemoteUnavailable(_) => "remote_unavailable",
            GitHubError::Internal(_) => "internal_error",
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GitHubError::RemoteUnavailable(format!("unexpected response body: {}", err))
        } else {
            GitHubError::RemoteUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(err: serde_json::Error) -> Self {
        GitHubError::Internal(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for GitHubError {
    fn from(err: url::ParseError) -> Self {
        GitHubError::Validation(format!("invalid URL: {}", err))
    }
}

/// A failure of one adapter operation, annotated with the operation's name
/// and the input it was called with.
#[derive(Error, Debug)]
#[error("{operation}({input}) failed: {source}")]
pub struct OperationError {
    pub operation: &'static str,
    pub input: String,
    #[source]
    pub source: GitHubError,
}

impl OperationError {
    pub fn new(operation: &'static str, input: impl Into<String>, source: GitHubError) -> Self {
        Self {
            operation,
            input: input.into(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.source, GitHubError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
