//! `graphiti-mcp config` command
//!
//! Prints the configuration the server would run with. Secrets are masked.
//!
//! # Usage
//! ```bash
//! graphiti-mcp config                          # Table
//! graphiti-mcp config --database-type kuzu     # With CLI overrides applied
//! graphiti-mcp config --format json            # Machine-readable
//! ```

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::args::ServerArgs;
use crate::config::{DatabaseType, GraphitiConfig, ProcessEnv};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Toml,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config = GraphitiConfig::from_cli_and_env(&args.server, &ProcessEnv)?;
    println!("{}", render(&config, args.format)?);
    Ok(())
}

/// Format `config` with secrets masked
pub fn render(config: &GraphitiConfig, format: OutputFormat) -> Result<String> {
    let config = config.redacted();

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&config).context("Failed to serialize config as JSON")
        }
        OutputFormat::Toml => {
            toml::to_string_pretty(&config).context("Failed to serialize config as TOML")
        }
        OutputFormat::Table => Ok(Table::new(rows(&config)).with(Style::rounded()).to_string()),
    }
}

fn rows(config: &GraphitiConfig) -> Vec<Row> {
    let mut rows = vec![
        Row {
            key: "database_type",
            value: config.database_type.to_string(),
        },
        Row {
            key: "database",
            value: config.database_location().to_string(),
        },
    ];

    // Only the selected backend's settings matter
    match config.database_type {
        DatabaseType::Neo4j => {
            rows.push(Row {
                key: "neo4j.user",
                value: config.neo4j.user.clone(),
            });
            rows.push(Row {
                key: "neo4j.password",
                value: config.neo4j.password.clone(),
            });
        }
        DatabaseType::FalkorDb => rows.push(Row {
            key: "falkordb.password",
            value: config
                .falkordb
                .password
                .clone()
                .unwrap_or_else(|| "(not set)".to_string()),
        }),
        DatabaseType::Kuzu => {}
    }

    rows.extend([
        Row {
            key: "group_id",
            value: config.group_id.clone(),
        },
        Row {
            key: "use_custom_entities",
            value: config.use_custom_entities.to_string(),
        },
        Row {
            key: "destroy_graph",
            value: config.destroy_graph.to_string(),
        },
        Row {
            key: "llm.model",
            value: config.llm.model.clone(),
        },
        Row {
            key: "llm.small_model",
            value: config.llm.small_model.clone(),
        },
        Row {
            key: "llm.temperature",
            value: config.llm.temperature.to_string(),
        },
        Row {
            key: "llm.api_key",
            value: config
                .llm
                .api_key
                .clone()
                .unwrap_or_else(|| "(not set)".to_string()),
        },
        Row {
            key: "telemetry_enabled",
            value: config.telemetry_enabled.to_string(),
        },
    ]);

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> GraphitiConfig {
        let env: HashMap<&str, &str> = [
            ("DATABASE_TYPE", "neo4j"),
            ("NEO4J_PASSWORD", "hunter2"),
            ("OPENAI_API_KEY", "sk-secret"),
        ]
        .into();
        GraphitiConfig::from_env(&env).unwrap()
    }

    #[test]
    fn test_json_is_redacted() {
        let out = render(&config(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["database_type"], "neo4j");
        assert_eq!(value["neo4j"]["password"], "********");
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("sk-secret"));
    }

    #[test]
    fn test_toml_output() {
        let out = render(&config(), OutputFormat::Toml).unwrap();

        assert!(out.contains("database_type = \"neo4j\""));
        assert!(out.contains("[kuzu]"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn test_table_shows_selected_backend_only() {
        let out = render(&config(), OutputFormat::Table).unwrap();

        assert!(out.contains("bolt://localhost:7687"));
        assert!(out.contains("neo4j.user"));
        assert!(!out.contains("falkordb.password"));
        assert!(!out.contains("hunter2"));
    }
}
