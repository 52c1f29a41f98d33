//! Server arguments shared by every command that resolves a configuration

use clap::Args;

use crate::config::DatabaseType;

/// Memory server options.
///
/// Every field is optional: anything left out keeps the value resolved from
/// the environment. Empty strings count as left out.
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Graph database backend
    #[arg(long, value_enum, ignore_case = true)]
    pub database_type: Option<DatabaseType>,

    /// Namespace for the graph; episodes and search are scoped to it
    #[arg(long)]
    pub group_id: Option<String>,

    /// Enable the custom entity types during extraction
    #[arg(long)]
    pub use_custom_entities: bool,

    /// Clear the whole graph on startup
    #[arg(long)]
    pub destroy_graph: bool,

    /// Model for entity extraction and the main LLM calls
    #[arg(long)]
    pub model: Option<String>,

    /// Model for small, cheap LLM calls
    #[arg(long)]
    pub small_model: Option<String>,

    /// LLM sampling temperature (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Kuzu database path, or ":memory:"
    #[arg(long)]
    pub kuzu_db: Option<String>,
}

impl ServerArgs {
    /// Convenience for the most common override
    pub fn with_database_type(database_type: DatabaseType) -> Self {
        Self {
            database_type: Some(database_type),
            ..Self::default()
        }
    }
}

/// `Some` only for a value that was actually given
pub(crate) fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
