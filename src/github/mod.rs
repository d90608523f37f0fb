pub mod client;
pub mod pagination;
pub mod types;

pub use client::{GitHubClient, GitHubConfig};
pub use pagination::{collect_all, collect_bounded, PageStream};
