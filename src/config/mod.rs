//! Configuration module
//!
//! Resolves the server configuration from an [`EnvSource`] and, optionally,
//! parsed CLI arguments.
//!
//! Precedence: CLI > environment > built-in default.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cli::args::{provided, ServerArgs};

pub mod backend;
pub mod database_type;
pub mod env;
pub mod error;

pub use backend::{FalkorDbConfig, KuzuConfig, Neo4jConfig, KUZU_IN_MEMORY};
pub use database_type::DatabaseType;
pub use env::{EnvSource, ProcessEnv};
pub use error::{ConfigError, ConfigResult};

pub const DATABASE_TYPE_VAR: &str = "DATABASE_TYPE";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_NAME_VAR: &str = "MODEL_NAME";
pub const SMALL_MODEL_NAME_VAR: &str = "SMALL_MODEL_NAME";
pub const LLM_TEMPERATURE_VAR: &str = "LLM_TEMPERATURE";
pub const TELEMETRY_VAR: &str = "GRAPHITI_TELEMETRY_ENABLED";

/// Sampling temperatures the LLM client accepts
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

const REDACTED: &str = "********";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphitiConfig {
    pub database_type: DatabaseType,

    #[serde(default)]
    pub kuzu: KuzuConfig,

    #[serde(default)]
    pub neo4j: Neo4jConfig,

    #[serde(default)]
    pub falkordb: FalkorDbConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default = "default_group_id")]
    pub group_id: String,

    #[serde(default)]
    pub use_custom_entities: bool,

    #[serde(default)]
    pub destroy_graph: bool,

    #[serde(default = "default_true")]
    pub telemetry_enabled: bool,
}

fn default_group_id() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

/// LLM client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_small_model")]
    pub small_model: String,

    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            small_model: default_small_model(),
            temperature: 0.0,
        }
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_small_model() -> String {
    "gpt-4.1-nano".to_string()
}

impl LlmConfig {
    /// Read `OPENAI_API_KEY`, `MODEL_NAME`, `SMALL_MODEL_NAME`, `LLM_TEMPERATURE`
    pub fn from_env(env: &impl EnvSource) -> ConfigResult<Self> {
        let temperature = match env.get_non_empty(LLM_TEMPERATURE_VAR) {
            Some(raw) => parse_temperature(LLM_TEMPERATURE_VAR, &raw)?,
            None => 0.0,
        };

        Ok(Self {
            api_key: env.get_non_empty(OPENAI_API_KEY_VAR),
            model: env.get_non_empty(MODEL_NAME_VAR).unwrap_or_else(default_model),
            small_model: env
                .get_non_empty(SMALL_MODEL_NAME_VAR)
                .unwrap_or_else(default_small_model),
            temperature,
        })
    }
}

fn parse_temperature(variable: &'static str, raw: &str) -> ConfigResult<f32> {
    let invalid = || ConfigError::InvalidValue {
        variable,
        value: raw.to_string(),
    };
    let temperature = raw.trim().parse::<f32>().map_err(|_| invalid())?;
    check_temperature(variable, temperature).map_err(|_| invalid())
}

/// NaN and infinities fall outside the range too
fn check_temperature(variable: &'static str, temperature: f32) -> ConfigResult<f32> {
    if TEMPERATURE_RANGE.contains(&temperature) {
        Ok(temperature)
    } else {
        Err(ConfigError::InvalidValue {
            variable,
            value: temperature.to_string(),
        })
    }
}

fn parse_flag(variable: &'static str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            value: raw.to_string(),
        }),
    }
}

impl GraphitiConfig {
    /// Resolve purely from the environment.
    ///
    /// `DATABASE_TYPE` is required here; there is no default selection.
    pub fn from_env(env: &impl EnvSource) -> ConfigResult<Self> {
        let raw = env
            .get_non_empty(DATABASE_TYPE_VAR)
            .ok_or(ConfigError::MissingVariable(DATABASE_TYPE_VAR))?;
        let database_type: DatabaseType = raw.parse()?;

        Self::for_database_type(database_type, env)
    }

    /// Resolve from the environment, then apply every CLI value that was given.
    ///
    /// Without a selection in either place the default backend (neo4j) is
    /// used. An unsupported selection in the environment is still an error.
    pub fn from_cli_and_env(args: &ServerArgs, env: &impl EnvSource) -> ConfigResult<Self> {
        let mut config = match Self::from_env(env) {
            Ok(config) => config,
            Err(ConfigError::MissingVariable(DATABASE_TYPE_VAR)) => {
                let fallback = args.database_type.unwrap_or_default();
                if args.database_type.is_none() {
                    warn!(
                        "{} not set and no --database-type given, using {}",
                        DATABASE_TYPE_VAR, fallback
                    );
                }
                Self::for_database_type(fallback, env)?
            }
            Err(e) => return Err(e),
        };

        config.apply_cli(args)?;
        debug!(
            database_type = %config.database_type,
            group_id = %config.group_id,
            "Resolved configuration"
        );

        Ok(config)
    }

    /// Build every settings holder from the environment for a known selection
    fn for_database_type(database_type: DatabaseType, env: &impl EnvSource) -> ConfigResult<Self> {
        let telemetry_enabled = match env.get_non_empty(TELEMETRY_VAR) {
            Some(raw) => parse_flag(TELEMETRY_VAR, &raw)?,
            None => true,
        };

        Ok(Self {
            database_type,
            kuzu: KuzuConfig::from_env(env),
            neo4j: Neo4jConfig::from_env(env),
            falkordb: FalkorDbConfig::from_env(env),
            llm: LlmConfig::from_env(env)?,
            group_id: default_group_id(),
            use_custom_entities: false,
            destroy_graph: false,
            telemetry_enabled,
        })
    }

    fn apply_cli(&mut self, args: &ServerArgs) -> ConfigResult<()> {
        if let Some(database_type) = args.database_type {
            if database_type != self.database_type {
                debug!(
                    "--database-type {} overrides {}={}",
                    database_type, DATABASE_TYPE_VAR, self.database_type
                );
            }
            self.database_type = database_type;
        }
        if let Some(group_id) = provided(&args.group_id) {
            self.group_id = group_id.to_string();
        }
        if args.use_custom_entities {
            self.use_custom_entities = true;
        }
        if args.destroy_graph {
            self.destroy_graph = true;
        }
        if let Some(model) = provided(&args.model) {
            self.llm.model = model.to_string();
        }
        if let Some(small_model) = provided(&args.small_model) {
            self.llm.small_model = small_model.to_string();
        }
        if let Some(temperature) = args.temperature {
            self.llm.temperature = check_temperature("--temperature", temperature)?;
        }
        if let Some(db) = provided(&args.kuzu_db) {
            self.kuzu = KuzuConfig::new(db);
        }
        Ok(())
    }

    /// Change the backend selection by name.
    ///
    /// Leaves the configuration untouched when the name is not supported.
    pub fn set_database_type(&mut self, value: &str) -> ConfigResult<()> {
        self.database_type = value.parse()?;
        Ok(())
    }

    /// Human-readable location of the selected backend
    pub fn database_location(&self) -> &str {
        match self.database_type {
            DatabaseType::Kuzu => &self.kuzu.db,
            DatabaseType::Neo4j => &self.neo4j.uri,
            DatabaseType::FalkorDb => &self.falkordb.uri,
        }
    }

    /// Copy with passwords and keys masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.neo4j.password = REDACTED.to_string();
        if copy.falkordb.password.is_some() {
            copy.falkordb.password = Some(REDACTED.to_string());
        }
        if copy.llm.api_key.is_some() {
            copy.llm.api_key = Some(REDACTED.to_string());
        }
        copy
    }
}
