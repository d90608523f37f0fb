pub mod config;
pub mod error;
pub mod github;
pub mod mcp_core;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::{GitHubError, OperationError};
pub use github::{GitHubClient, GitHubConfig};
pub use server::{GitHubMcpServer, GitHubServerConfig};
pub use tools::GitHubAdapter;
