//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod check;
pub mod config;
pub mod mcp_config;

pub use args::ServerArgs;

/// graphiti-mcp - graph backend setup for the Graphiti memory server
///
/// Resolves which graph database the server uses (Kuzu, Neo4j or FalkorDB)
/// from environment variables and flags, checks it, and writes MCP client config.
#[derive(Parser, Debug)]
#[command(name = "graphiti-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logs unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved server configuration
    Config(config::ConfigArgs),

    /// Verify environment, configuration and database connectivity
    Check(check::CheckArgs),

    /// Generate the MCP client configuration (Cursor, Claude Desktop)
    McpConfig(mcp_config::McpConfigArgs),
}
