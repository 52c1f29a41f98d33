//! `graphiti-mcp mcp-config` command
//!
//! Writes the JSON an MCP client needs to launch the memory server.
//!
//! # Usage
//! ```bash
//! graphiti-mcp mcp-config --database-type kuzu            # Writes ./mcp_config_example.json
//! graphiti-mcp mcp-config --server-dir ~/graphiti/mcp_server
//! graphiti-mcp mcp-config --stdout > ~/.cursor/mcp.json
//! ```

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Confirm;
use tracing::warn;

use super::args::ServerArgs;
use super::check::{print_info, print_success, print_warning};
use crate::config::{GraphitiConfig, ProcessEnv};
use crate::mcp::client_config::{CONFIG_FILE_NAME, LAUNCHER_PLACEHOLDER};
use crate::mcp::{find_launcher_default, LaunchOptions, McpClientConfig, Transport};

#[derive(Args, Debug)]
pub struct McpConfigArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Directory of the memory server project (default: current directory)
    #[arg(long)]
    pub server_dir: Option<PathBuf>,

    /// Where to write the file (default: <server-dir>/mcp_config_example.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Launcher executable (default: uv found on PATH)
    #[arg(long)]
    pub launcher: Option<PathBuf>,

    /// Transport the client should use
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Print the JSON to stdout only, write nothing
    #[arg(long)]
    pub stdout: bool,

    /// Overwrite an existing file without asking
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: McpConfigArgs) -> Result<()> {
    let config = GraphitiConfig::from_cli_and_env(&args.server, &ProcessEnv)?;

    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let server_dir = absolute(&cwd, args.server_dir.as_deref().unwrap_or(Path::new(".")));

    let launcher = match args.launcher.or_else(find_launcher_default) {
        Some(launcher) => launcher,
        None => {
            warn!("uv launcher not found on PATH or in common locations");
            if !args.stdout {
                print_warning("Could not find uv binary. Please update the path manually.");
            }
            PathBuf::from(LAUNCHER_PLACEHOLDER)
        }
    };

    let options = LaunchOptions {
        server_dir: server_dir.clone(),
        launcher,
        transport: args.transport,
    };
    let document = McpClientConfig::for_server(&options, &config);

    if args.stdout {
        println!("{}", document.to_json_pretty()?);
        return Ok(());
    }

    let output = args
        .output
        .map(|p| absolute(&cwd, &p))
        .unwrap_or_else(|| server_dir.join(CONFIG_FILE_NAME));

    if output.exists() && !args.force && !confirm_overwrite(&output)? {
        print_info(&format!("Not overwriting {}", output.display()));
        return Ok(());
    }

    document.save_to(&output)?;
    print_success(&format!("MCP configuration saved to: {}", output.display()));
    print_info("Copy this configuration to your MCP client:");
    print_info("  Cursor: ~/.cursor/mcp.json");
    print_info(
        "  Claude Desktop: ~/Library/Application Support/Claude/claude_desktop_config.json",
    );
    println!();
    println!("{}", document.to_json_pretty()?);

    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    Ok(Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", path.display()))
        .default(false)
        .interact()?)
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    // Drop `.` components so `--server-dir .` gives a clean path
    joined.components().collect()
}
