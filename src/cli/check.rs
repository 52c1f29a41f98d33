//! `graphiti-mcp check` command
//!
//! Verifies a memory server setup before it is wired into an MCP client:
//! environment, configuration resolution, driver creation, connectivity.
//!
//! # Usage
//! ```bash
//! graphiti-mcp check                           # Uses DATABASE_TYPE etc.
//! graphiti-mcp check --database-type kuzu
//! graphiti-mcp check --skip-connectivity
//! ```

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::args::{provided, ServerArgs};
use crate::config::backend::KUZU_DB_VAR;
use crate::config::{
    DatabaseType, EnvSource, GraphitiConfig, ProcessEnv, DATABASE_TYPE_VAR, KUZU_IN_MEMORY,
    OPENAI_API_KEY_VAR,
};
use crate::driver::{create_graph_driver, GraphDriver};

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Do not try to reach the database
    #[arg(long)]
    pub skip_connectivity: bool,
}

pub async fn run(args: CheckArgs) -> Result<()> {
    print_header("Graphiti MCP Setup Verification");

    let mut checker = SetupChecker::default();
    if !checker.check_environment(&args.server, &ProcessEnv) {
        print_error("Environment not configured. Set required variables:");
        print_info(&format!("  export {}=\"your-key-here\"", OPENAI_API_KEY_VAR));
        print_info(&format!("  export {}=\"kuzu\"", DATABASE_TYPE_VAR));
        print_info(&format!(
            "  export {}=\"{}\"  # or path to database",
            KUZU_DB_VAR, KUZU_IN_MEMORY
        ));
        bail!("environment check failed");
    }

    checker
        .check_backend(&args.server, &ProcessEnv, !args.skip_connectivity)
        .await;

    if checker.print_summary() {
        Ok(())
    } else {
        bail!("{} check(s) failed", checker.errors.len())
    }
}

/// Collects check outcomes and prints them as they happen
#[derive(Debug, Default)]
pub struct SetupChecker {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub success_count: usize,
    pub test_count: usize,
}

impl SetupChecker {
    /// Count one check
    pub fn record<E: std::fmt::Display>(
        &mut self,
        description: &str,
        outcome: Result<(), E>,
    ) -> bool {
        self.test_count += 1;
        match outcome {
            Ok(()) => {
                print_success(description);
                self.success_count += 1;
                true
            }
            Err(e) => {
                let message = format!("{}: {}", description, e);
                print_error(&message);
                self.errors.push(message);
                false
            }
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        print_warning(&message);
        self.warnings.push(message);
    }

    /// Look at the variables the server needs before resolving anything.
    ///
    /// Returns false when the run cannot continue.
    pub fn check_environment(&mut self, args: &ServerArgs, env: &impl EnvSource) -> bool {
        print_info("Checking environment variables...");

        match env.get_non_empty(OPENAI_API_KEY_VAR) {
            Some(key) if key.starts_with("sk-") => {
                print_success(&format!("{} is set", OPENAI_API_KEY_VAR))
            }
            _ => {
                print_error(&format!("{} is not set or invalid", OPENAI_API_KEY_VAR));
                print_info(&format!(
                    "  Set it with: export {}=\"your-key-here\"",
                    OPENAI_API_KEY_VAR
                ));
                return false;
            }
        }

        let (database_type, source) = selected_database_type(args, env);
        print_success(&format!("Database type: {} ({})", database_type, source));

        if database_type.eq_ignore_ascii_case(DatabaseType::Kuzu.as_str()) {
            let kuzu_db = provided(&args.kuzu_db)
                .map(str::to_string)
                .or_else(|| env.get_non_empty(KUZU_DB_VAR))
                .unwrap_or_else(|| KUZU_IN_MEMORY.to_string());
            print_success(&format!("{}: {}", KUZU_DB_VAR, kuzu_db));

            if kuzu_db == KUZU_IN_MEMORY {
                self.warn("Kuzu runs in memory; the graph is lost when the server exits");
            } else if Path::new(&kuzu_db).exists() {
                print_success(&format!("Database directory exists: {}", kuzu_db));
            } else {
                print_info(&format!("Database will be created at: {}", kuzu_db));
            }
        }

        true
    }

    /// Resolve the configuration, build the driver, probe it and close it
    pub async fn check_backend(
        &mut self,
        args: &ServerArgs,
        env: &impl EnvSource,
        connectivity: bool,
    ) {
        print_info("Resolving configuration...");
        let config = match GraphitiConfig::from_cli_and_env(args, env) {
            Ok(config) => {
                self.record::<String>("Configuration resolves", Ok(()));
                config
            }
            Err(e) => {
                self.record("Configuration resolves", Err(e));
                return;
            }
        };

        if config.destroy_graph {
            self.warn("--destroy-graph is set; the server will clear all data on startup");
        }

        print_info("Testing driver creation...");
        let description = format!("{} driver created", config.database_type);
        let driver = match create_graph_driver(&config) {
            Ok(driver) => {
                self.record::<String>(&description, Ok(()));
                driver
            }
            Err(e) => {
                self.record(&description, Err(e));
                return;
            }
        };

        if connectivity {
            let description = format!("{} reachable at {}", driver.provider(), driver.location());
            let outcome = driver.verify_connectivity().await;
            self.record(&description, outcome);
        }

        let outcome = driver.close().await;
        self.record("Driver closes cleanly", outcome);
    }

    /// Print totals; true when nothing failed
    pub fn print_summary(&self) -> bool {
        print_header("Test Summary");

        println!("Tests run: {}", self.test_count);
        println!("Successes: {}", self.success_count.to_string().green());
        println!("Failures: {}", self.errors.len().to_string().red());
        println!("Warnings: {}", self.warnings.len().to_string().yellow());

        if !self.errors.is_empty() {
            println!("\n{}", "Errors:".red());
            for error in &self.errors {
                println!("  - {}", error);
            }
        }

        if !self.warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for warning in &self.warnings {
                println!("  - {}", warning);
            }
        }

        if self.errors.is_empty() {
            println!(
                "\n{}",
                "✓ All checks passed! Your MCP setup is ready.".green().bold()
            );
            println!("\n{}", "Next steps:".blue());
            println!("  1. Run `graphiti-mcp mcp-config` and copy the output to your client");
            println!("  2. Replace \"your-openai-api-key-here\" with your actual API key");
            println!("  3. Restart Cursor or Claude Desktop");
            true
        } else {
            println!(
                "\n{}",
                "✗ Some checks failed. Please fix the errors above.".red().bold()
            );
            false
        }
    }
}

/// Backend name as given, and where it was given
fn selected_database_type(args: &ServerArgs, env: &impl EnvSource) -> (String, &'static str) {
    if let Some(database_type) = args.database_type {
        return (database_type.to_string(), "--database-type");
    }
    match env.get_non_empty(DATABASE_TYPE_VAR) {
        Some(value) => (value, DATABASE_TYPE_VAR),
        None => (DatabaseType::default().to_string(), "default"),
    }
}

fn print_header(text: &str) {
    let rule = "=".repeat(60);
    println!("\n{}", rule.blue().bold());
    println!("{}", text.blue().bold());
    println!("{}\n", rule.blue().bold());
}

pub(crate) fn print_success(text: &str) {
    println!("{}", format!("✓ {}", text).green());
}

pub(crate) fn print_error(text: &str) {
    println!("{}", format!("✗ {}", text).red());
}

pub(crate) fn print_warning(text: &str) {
    println!("{}", format!("⚠ {}", text).yellow());
}

pub(crate) fn print_info(text: &str) {
    println!("{}", format!("ℹ {}", text).blue());
}
