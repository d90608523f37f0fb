use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use github_tools_mcp::config::{self, Settings};
use github_tools_mcp::{GitHubMcpServer, GitHubServerConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("github-tools-mcp")
        .version(VERSION)
        .about("An MCP server exposing GitHub user, repository, issue and commit status tools")
        .subcommand(
            Command::new("stdio")
                .about("Start stdio server")
                .long_about("Start a server that communicates via standard input/output streams using JSON-RPC messages")
                .arg(
                    Arg::new("toolsets")
                        .long("toolsets")
                        .value_name("TOOLSETS")
                        .help("Comma separated list of groups of tools to allow (context, users, issues, statuses, all)")
                        .action(ArgAction::Set)
                )
                .arg(
                    Arg::new("read-only")
                        .long("read-only")
                        .help("Restrict the server to read-only operations")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("FILE")
                        .help("Path to a TOML settings file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set)
                )
                .arg(
                    Arg::new("request-timeout")
                        .long("request-timeout")
                        .value_name("SECONDS")
                        .help("Abort a tool call or resource read after this many seconds")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set)
                )
                .arg(
                    Arg::new("enable-command-logging")
                        .long("enable-command-logging")
                        .help("Enable logging of all command requests and responses")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("gh-host")
                        .long("gh-host")
                        .value_name("HOST")
                        .help("Specify the GitHub hostname (for GitHub Enterprise etc.)")
                        .action(ArgAction::Set)
                )
        )
        .get_matches();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    init_logging()?;

    match matches.subcommand() {
        Some(("stdio", sub_matches)) => {
            let settings = Settings::load(sub_matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

            let token = config::github_token();
            if token.is_none() {
                warn!(
                    "None of {} is set; authenticated calls will fail",
                    config::TOKEN_VARS.join(", ")
                );
            }

            let enabled_toolsets = match sub_matches.get_one::<String>("toolsets") {
                Some(toolsets) => config::parse_toolsets(toolsets),
                None => settings.enabled_toolsets(),
            };

            let config = GitHubServerConfig {
                version: VERSION.to_string(),
                host: sub_matches.get_one::<String>("gh-host").cloned().or(settings.host),
                token,
                enabled_toolsets,
                read_only: sub_matches.get_flag("read-only") || settings.read_only,
                enable_command_logging: sub_matches.get_flag("enable-command-logging")
                    || settings.enable_command_logging,
                request_timeout: sub_matches
                    .get_one::<u64>("request-timeout")
                    .copied()
                    .or(settings.request_timeout_secs)
                    .map(Duration::from_secs),
            };

            info!("Starting GitHub MCP Server v{}", VERSION);
            info!("Configuration: {:?}", config);

            let server = Arc::new(GitHubMcpServer::new(config)?);
            server.run_stdio().await?;
        }
        _ => {
            eprintln!("No subcommand specified. Use 'stdio' to start the server.");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = env::var("RUST_LOG")
        .unwrap_or_else(|_| "github_tools_mcp=info".to_string());

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter))
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
        )
        .init();

    Ok(())
}
