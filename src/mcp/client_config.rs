//! MCP client configuration
//!
//! Builds the `mcpServers` document that Cursor, Claude Desktop and other MCP
//! clients read to launch the memory server as a child process.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::backend::{
    FALKORDB_URI_VAR, KUZU_DB_VAR, NEO4J_PASSWORD_VAR, NEO4J_URI_VAR, NEO4J_USER_VAR,
};
use crate::config::{
    DatabaseType, GraphitiConfig, MODEL_NAME_VAR, OPENAI_API_KEY_VAR, TELEMETRY_VAR,
};

/// Key under `mcpServers`
pub const SERVER_NAME: &str = "graphiti-memory";

/// Script the launcher runs inside the server directory
pub const SERVER_SCRIPT: &str = "graphiti_mcp_server.py";

/// Default file name for the generated document
pub const CONFIG_FILE_NAME: &str = "mcp_config_example.json";

/// Written when the launcher cannot be found
pub const LAUNCHER_PLACEHOLDER: &str = "/path/to/uv";

const LAUNCHER_BINARY: &str = "uv";
const API_KEY_PLACEHOLDER: &str = "your-openai-api-key-here";
const NEO4J_PASSWORD_PLACEHOLDER: &str = "your-neo4j-password-here";

/// Top-level document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpClientConfig {
    pub mcp_servers: BTreeMap<String, McpServerEntry>,
}

/// How a client starts one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerEntry {
    pub transport: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Transport the client uses to talk to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Transport {
    #[default]
    Stdio,
    Sse,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
        }
    }
}

/// Inputs for [`McpClientConfig::for_server`]
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Directory holding the server project
    pub server_dir: PathBuf,
    /// Launcher executable (uv)
    pub launcher: PathBuf,
    pub transport: Transport,
}

impl McpClientConfig {
    /// Document launching the server with the backend `config` selects
    pub fn for_server(options: &LaunchOptions, config: &GraphitiConfig) -> Self {
        let server_dir = options.server_dir.display().to_string();
        let database_type = config.database_type;

        let mut args = vec![
            "run".to_string(),
            "--directory".to_string(),
            server_dir,
        ];
        if let Some(extra) = package_extra(database_type) {
            args.push("--extra".to_string());
            args.push(extra.to_string());
        }
        args.extend(
            [
                SERVER_SCRIPT,
                "--transport",
                options.transport.as_str(),
                "--database-type",
                database_type.as_str(),
            ]
            .map(String::from),
        );

        let mut env = BTreeMap::new();
        env.insert(OPENAI_API_KEY_VAR.to_string(), API_KEY_PLACEHOLDER.to_string());
        env.insert(MODEL_NAME_VAR.to_string(), config.llm.model.clone());
        env.insert(TELEMETRY_VAR.to_string(), "false".to_string());

        match database_type {
            DatabaseType::Kuzu => {
                let db = options.server_dir.join("data").join("graphiti.kuzu");
                env.insert(KUZU_DB_VAR.to_string(), db.display().to_string());
            }
            DatabaseType::Neo4j => {
                env.insert(NEO4J_URI_VAR.to_string(), config.neo4j.uri.clone());
                env.insert(NEO4J_USER_VAR.to_string(), config.neo4j.user.clone());
                env.insert(
                    NEO4J_PASSWORD_VAR.to_string(),
                    NEO4J_PASSWORD_PLACEHOLDER.to_string(),
                );
            }
            DatabaseType::FalkorDb => {
                env.insert(FALKORDB_URI_VAR.to_string(), config.falkordb.uri.clone());
            }
        }

        let entry = McpServerEntry {
            transport: options.transport.as_str().to_string(),
            command: options.launcher.display().to_string(),
            args,
            env,
        };

        let mut mcp_servers = BTreeMap::new();
        mcp_servers.insert(SERVER_NAME.to_string(), entry);
        Self { mcp_servers }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize MCP config")
    }

    /// Write the document, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, self.to_json_pretty()? + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn server(&self) -> Option<&McpServerEntry> {
        self.mcp_servers.get(SERVER_NAME)
    }
}

/// Optional dependency group the server needs for a backend
fn package_extra(database_type: DatabaseType) -> Option<&'static str> {
    match database_type {
        DatabaseType::Neo4j => None,
        DatabaseType::FalkorDb => Some("falkordb"),
        DatabaseType::Kuzu => Some("kuzu"),
    }
}

/// Locate the `uv` launcher.
///
/// Looks through `path_var` (normally `$PATH`) first, then the usual install
/// locations under `home`.
pub fn find_launcher(path_var: Option<OsString>, home: Option<&Path>) -> Option<PathBuf> {
    let from_path = path_var
        .iter()
        .flat_map(|p| std::env::split_paths(p).collect::<Vec<_>>())
        .map(|dir| dir.join(LAUNCHER_BINARY))
        .find(|candidate| candidate.is_file());
    if from_path.is_some() {
        return from_path;
    }

    let mut common = Vec::new();
    if let Some(home) = home {
        common.push(home.join(".local").join("bin").join(LAUNCHER_BINARY));
        common.push(home.join(".cargo").join("bin").join(LAUNCHER_BINARY));
    }
    common.push(PathBuf::from("/usr/local/bin").join(LAUNCHER_BINARY));

    let found = common.into_iter().find(|candidate| candidate.is_file());
    debug!("Launcher lookup outside PATH: {:?}", found);
    found
}

/// [`find_launcher`] against the real `$PATH` and home directory
pub fn find_launcher_default() -> Option<PathBuf> {
    let home = directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf());
    find_launcher(std::env::var_os("PATH"), home.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn config(database_type: &str) -> GraphitiConfig {
        let env: HashMap<&str, &str> = [
            ("DATABASE_TYPE", database_type),
            ("MODEL_NAME", "gpt-4o-mini"),
            ("NEO4J_URI", "bolt://db:7687"),
        ]
        .into();
        GraphitiConfig::from_env(&env).unwrap()
    }

    fn options(dir: &Path) -> LaunchOptions {
        LaunchOptions {
            server_dir: dir.to_path_buf(),
            launcher: PathBuf::from("/usr/bin/uv"),
            transport: Transport::Stdio,
        }
    }

    #[test]
    fn test_kuzu_document() {
        let server_dir = PathBuf::from("/srv/graphiti/mcp_server");
        let doc = McpClientConfig::for_server(&options(&server_dir), &config("kuzu"));
        let json = serde_json::to_value(&doc).unwrap();

        let server = &json["mcpServers"]["graphiti-memory"];
        assert_eq!(server["transport"], "stdio");
        assert_eq!(server["command"], "/usr/bin/uv");
        assert_eq!(
            server["args"],
            serde_json::json!([
                "run",
                "--directory",
                "/srv/graphiti/mcp_server",
                "--extra",
                "kuzu",
                "graphiti_mcp_server.py",
                "--transport",
                "stdio",
                "--database-type",
                "kuzu"
            ])
        );
        assert_eq!(server["env"]["MODEL_NAME"], "gpt-4o-mini");
        assert_eq!(server["env"]["GRAPHITI_TELEMETRY_ENABLED"], "false");
        assert_eq!(server["env"]["OPENAI_API_KEY"], "your-openai-api-key-here");
        assert_eq!(
            server["env"]["KUZU_DB"],
            server_dir.join("data").join("graphiti.kuzu").display().to_string()
        );
    }

    #[test]
    fn test_neo4j_document_has_no_extra() {
        let doc = McpClientConfig::for_server(&options(Path::new("/srv")), &config("neo4j"));
        let server = doc.server().unwrap();

        assert!(!server.args.contains(&"--extra".to_string()));
        assert_eq!(server.env.get("NEO4J_URI").map(String::as_str), Some("bolt://db:7687"));
        assert!(!server.env.contains_key("KUZU_DB"));
        assert_ne!(server.env.get("NEO4J_PASSWORD").map(String::as_str), Some("password"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let doc = McpClientConfig::for_server(&options(dir.path()), &config("falkordb"));

        doc.save_to(&path).unwrap();
        let loaded: McpClientConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(loaded, doc);
        assert!(loaded.server().unwrap().args.contains(&"falkordb".to_string()));
    }

    #[test]
    fn test_save_names_directory_it_cannot_create() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let doc = McpClientConfig::for_server(&options(dir.path()), &config("kuzu"));

        let err = doc.save_to(&blocker.join("sub").join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create directory"));
        assert!(err.to_string().contains("blocker"));
    }

    #[test]
    fn test_find_launcher_on_path() {
        let dir = tempdir().unwrap();
        let uv = dir.path().join("uv");
        std::fs::write(&uv, "").unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_launcher(Some(path_var), None), Some(uv));
    }

    #[test]
    fn test_find_launcher_in_home() {
        let home = tempdir().unwrap();
        let bin = home.path().join(".local").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("uv"), "").unwrap();

        let empty = tempdir().unwrap();
        let path_var = std::env::join_paths([empty.path()]).unwrap();

        assert_eq!(
            find_launcher(Some(path_var), Some(home.path())),
            Some(bin.join("uv"))
        );
    }
}
