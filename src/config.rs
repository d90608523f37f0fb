use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "github-tools-mcp";
pub const ENV_PREFIX: &str = "GITHUB_MCP";

/// Token variables, in lookup order.
pub const TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GITHUB_PERSONAL_ACCESS_TOKEN"];

/// Settings that may come from the config file or `GITHUB_MCP_*` variables.
/// Command-line flags override both.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub host: Option<String>,
    pub toolsets: String,
    pub read_only: bool,
    pub enable_command_logging: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            toolsets: "all".to_string(),
            read_only: false,
            enable_command_logging: false,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path` (which must exist) or, when `None`, from the
    /// default config file if present, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env_vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    pub fn enabled_toolsets(&self) -> Vec<String> {
        parse_toolsets(&self.toolsets)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Splits a comma separated toolset list. `all` wins over anything else.
pub fn parse_toolsets(value: &str) -> Vec<String> {
    let names: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() || names.iter().any(|name| name == "all") {
        vec!["all".to_string()]
    } else {
        names
    }
}

/// The API token, read from the process environment (after `.env` loading).
pub fn github_token() -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}
