//! Per-backend connection settings
//!
//! Each holder reads its own variables and falls back to a safe default.
//! Nothing here checks whether a path exists or a server answers; that is
//! left to the driver built from these values.

use serde::{Deserialize, Serialize};

use super::env::EnvSource;

pub const KUZU_DB_VAR: &str = "KUZU_DB";
pub const NEO4J_URI_VAR: &str = "NEO4J_URI";
pub const NEO4J_USER_VAR: &str = "NEO4J_USER";
pub const NEO4J_PASSWORD_VAR: &str = "NEO4J_PASSWORD";
pub const FALKORDB_URI_VAR: &str = "FALKORDB_URI";
pub const FALKORDB_PASSWORD_VAR: &str = "FALKORDB_PASSWORD";

/// Location marker that makes Kuzu keep the whole database in memory
pub const KUZU_IN_MEMORY: &str = ":memory:";

/// Embedded Kuzu settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KuzuConfig {
    /// Database directory, or `:memory:`
    #[serde(default = "default_kuzu_db")]
    pub db: String,
}

impl Default for KuzuConfig {
    fn default() -> Self {
        Self {
            db: default_kuzu_db(),
        }
    }
}

fn default_kuzu_db() -> String {
    KUZU_IN_MEMORY.to_string()
}

impl KuzuConfig {
    pub fn new(db: impl Into<String>) -> Self {
        Self { db: db.into() }
    }

    /// Read `KUZU_DB`
    pub fn from_env(env: &impl EnvSource) -> Self {
        match env.get_non_empty(KUZU_DB_VAR) {
            Some(db) => Self { db },
            None => Self::default(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.db == KUZU_IN_MEMORY
    }
}

/// Neo4j connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neo4jConfig {
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,

    #[serde(default = "default_neo4j_user")]
    pub user: String,

    #[serde(default = "default_neo4j_password")]
    pub password: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            password: default_neo4j_password(),
        }
    }
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_neo4j_password() -> String {
    "password".to_string()
}

impl Neo4jConfig {
    /// Read `NEO4J_URI`, `NEO4J_USER` and `NEO4J_PASSWORD`
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            uri: env.get_non_empty(NEO4J_URI_VAR).unwrap_or_else(default_neo4j_uri),
            user: env.get_non_empty(NEO4J_USER_VAR).unwrap_or_else(default_neo4j_user),
            password: env
                .get_non_empty(NEO4J_PASSWORD_VAR)
                .unwrap_or_else(default_neo4j_password),
        }
    }
}

/// FalkorDB connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalkorDbConfig {
    #[serde(default = "default_falkordb_uri")]
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for FalkorDbConfig {
    fn default() -> Self {
        Self {
            uri: default_falkordb_uri(),
            password: None,
        }
    }
}

fn default_falkordb_uri() -> String {
    "redis://localhost:6379".to_string()
}

impl FalkorDbConfig {
    /// Read `FALKORDB_URI` and `FALKORDB_PASSWORD`
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            uri: env
                .get_non_empty(FALKORDB_URI_VAR)
                .unwrap_or_else(default_falkordb_uri),
            password: env.get_non_empty(FALKORDB_PASSWORD_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_kuzu_default() {
        let config = KuzuConfig::default();
        assert_eq!(config.db, ":memory:");
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_kuzu_from_env_unset() {
        let env: HashMap<&str, &str> = HashMap::new();
        assert_eq!(KuzuConfig::from_env(&env).db, ":memory:");
    }

    #[test]
    fn test_kuzu_from_env_empty_falls_back() {
        let env: HashMap<&str, &str> = [("KUZU_DB", "")].into();
        assert_eq!(KuzuConfig::from_env(&env).db, ":memory:");
    }

    #[test]
    fn test_kuzu_from_env_custom_path() {
        let env: HashMap<&str, &str> = [("KUZU_DB", "./data/test.kuzu")].into();
        let config = KuzuConfig::from_env(&env);

        assert_eq!(config.db, "./data/test.kuzu");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_kuzu_from_env_explicit_memory() {
        let env: HashMap<&str, &str> = [("KUZU_DB", ":memory:")].into();
        assert!(KuzuConfig::from_env(&env).is_in_memory());
    }

    #[test]
    fn test_neo4j_from_env() {
        let env: HashMap<&str, &str> = [
            ("NEO4J_URI", "bolt://db.internal:7687"),
            ("NEO4J_USER", "graphiti"),
        ]
        .into();
        let config = Neo4jConfig::from_env(&env);

        assert_eq!(config.uri, "bolt://db.internal:7687");
        assert_eq!(config.user, "graphiti");
        assert_eq!(config.password, "password");
    }

    #[test]
    fn test_falkordb_defaults() {
        let env: HashMap<&str, &str> = HashMap::new();
        let config = FalkorDbConfig::from_env(&env);

        assert_eq!(config, FalkorDbConfig::default());
        assert_eq!(config.password, None);
    }
}
