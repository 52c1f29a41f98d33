//! Supported graph database backends

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::DATABASE_TYPE_VAR;

/// Graph database backend the server talks to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Networked Neo4j server (bolt)
    #[default]
    #[value(name = "neo4j")]
    Neo4j,
    /// Networked FalkorDB server (redis protocol)
    #[value(name = "falkordb")]
    FalkorDb,
    /// Embedded Kuzu engine, on disk or in memory
    #[value(name = "kuzu")]
    Kuzu,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 3] = [
        DatabaseType::Neo4j,
        DatabaseType::FalkorDb,
        DatabaseType::Kuzu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Neo4j => "neo4j",
            DatabaseType::FalkorDb => "falkordb",
            DatabaseType::Kuzu => "kuzu",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = ConfigError;

    /// Parse a backend name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DatabaseType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnsupportedDatabaseType {
                variable: DATABASE_TYPE_VAR,
                value: s.to_string(),
            })
    }
}
