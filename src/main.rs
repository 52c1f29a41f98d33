//! graphiti-mcp CLI - Entry point
//!
//! Usage: graphiti-mcp <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use graphiti_mcp::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output (JSON, tables)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Config(args) => graphiti_mcp::cli::config::run(args),
        Commands::Check(args) => graphiti_mcp::cli::check::run(args).await,
        Commands::McpConfig(args) => graphiti_mcp::cli::mcp_config::run(args),
    }
}
