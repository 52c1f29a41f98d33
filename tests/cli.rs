//! Binary-level tests for the graphiti-mcp CLI

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG_VARS: &[&str] = &[
    "DATABASE_TYPE",
    "KUZU_DB",
    "NEO4J_URI",
    "NEO4J_USER",
    "NEO4J_PASSWORD",
    "FALKORDB_URI",
    "FALKORDB_PASSWORD",
    "OPENAI_API_KEY",
    "MODEL_NAME",
    "SMALL_MODEL_NAME",
    "LLM_TEMPERATURE",
    "GRAPHITI_TELEMETRY_ENABLED",
    "RUST_LOG",
];

/// The binary with none of the configuration variables inherited
fn graphiti_mcp() -> Command {
    let mut cmd = Command::cargo_bin("graphiti-mcp").unwrap();
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_config_json_from_env() {
    let output = graphiti_mcp()
        .env("DATABASE_TYPE", "kuzu")
        .env("KUZU_DB", "./data/test.kuzu")
        .args(["config", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["database_type"], "kuzu");
    assert_eq!(value["kuzu"]["db"], "./data/test.kuzu");
}

#[test]
fn test_cli_database_type_overrides_env() {
    graphiti_mcp()
        .env("DATABASE_TYPE", "neo4j")
        .env("NEO4J_URI", "bolt://localhost:7687")
        .env("NEO4J_USER", "neo4j")
        .env("NEO4J_PASSWORD", "password")
        .args(["config", "--format", "json", "--database-type", "kuzu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"database_type\": \"kuzu\""));
}

#[test]
fn test_defaults_to_neo4j() {
    graphiti_mcp()
        .args(["config", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database_type = \"neo4j\""));
}

#[test]
fn test_rejects_unknown_cli_database_type() {
    graphiti_mcp()
        .args(["config", "--database-type", "invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_rejects_unknown_env_database_type() {
    graphiti_mcp()
        .env("DATABASE_TYPE", "sqlite")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported DATABASE_TYPE: sqlite"));
}

#[test]
fn test_config_table_hides_password() {
    graphiti_mcp()
        .env("DATABASE_TYPE", "neo4j")
        .env("NEO4J_PASSWORD", "hunter2")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("neo4j.password"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_mcp_config_stdout() {
    let dir = tempdir().unwrap();

    let output = graphiti_mcp()
        .args(["mcp-config", "--stdout", "--database-type", "kuzu"])
        .arg("--server-dir")
        .arg(dir.path())
        .args(["--launcher", "/opt/bin/uv"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let server = &value["mcpServers"]["graphiti-memory"];
    assert_eq!(server["command"], "/opt/bin/uv");
    assert_eq!(server["args"][4], "kuzu");
    assert!(!dir.path().join("mcp_config_example.json").exists());
}

#[test]
fn test_mcp_config_writes_file() {
    let dir = tempdir().unwrap();

    graphiti_mcp()
        .current_dir(dir.path())
        .args(["mcp-config", "--database-type", "kuzu", "--launcher", "uv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP configuration saved to"));

    let written = std::fs::read_to_string(dir.path().join("mcp_config_example.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        value["mcpServers"]["graphiti-memory"]["env"]["GRAPHITI_TELEMETRY_ENABLED"],
        "false"
    );
}

#[test]
fn test_mcp_config_existing_file_needs_force() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("mcp_config_example.json");
    std::fs::write(&existing, "{}").unwrap();

    graphiti_mcp()
        .current_dir(dir.path())
        .args(["mcp-config", "--launcher", "uv"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "{}");

    graphiti_mcp()
        .current_dir(dir.path())
        .args(["mcp-config", "--launcher", "uv", "--force"])
        .assert()
        .success();
    assert_ne!(std::fs::read_to_string(&existing).unwrap(), "{}");
}

#[test]
fn test_check_fails_without_api_key() {
    graphiti_mcp()
        .env("DATABASE_TYPE", "kuzu")
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("OPENAI_API_KEY is not set or invalid"));
}

#[test]
fn test_check_passes_for_kuzu() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("data").join("graphiti.kuzu");

    graphiti_mcp()
        .env("OPENAI_API_KEY", "sk-test")
        .env("DATABASE_TYPE", "kuzu")
        .env("KUZU_DB", &db)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_rejects_nan_temperature() {
    graphiti_mcp()
        .env("DATABASE_TYPE", "kuzu")
        .args(["config", "--temperature", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for --temperature: NaN"));
}

#[test]
fn test_database_type_flag_ignores_case() {
    graphiti_mcp()
        .args(["config", "--format", "json", "--database-type", "KUZU"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"database_type\": \"kuzu\""));
}
