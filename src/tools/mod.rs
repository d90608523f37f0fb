pub mod adapter;
pub mod context;
pub mod issues;
pub mod projections;
pub mod registry;
pub mod statuses;
pub mod toolsets;
pub mod users;

pub use adapter::GitHubAdapter;
pub use registry::*;
pub use toolsets::*;
