//! graphiti-mcp - graph backend selection for the Graphiti memory server
//!
//! The memory server can store its graph in an embedded Kuzu database or on a
//! Neo4j / FalkorDB server. This crate decides which one from environment
//! variables and CLI flags, and builds the matching driver.
//!
//! ## Key Concepts
//!
//! - **Precedence**: CLI flag > environment variable > built-in default
//! - **Injected environment**: configuration is read through [`EnvSource`],
//!   so resolution never depends on hidden global state
//! - **Closed backend set**: [`DatabaseType`] is matched exhaustively by
//!   [`create_graph_driver`]
//!
//! ```
//! use std::collections::HashMap;
//! use graphiti_mcp::{create_graph_driver, GraphDriver, GraphitiConfig, DatabaseType};
//!
//! let env: HashMap<&str, &str> = [("DATABASE_TYPE", "kuzu")].into();
//! let config = GraphitiConfig::from_env(&env).unwrap();
//! let driver = create_graph_driver(&config).unwrap();
//! assert_eq!(driver.provider(), DatabaseType::Kuzu);
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod mcp;

pub use cli::ServerArgs;
pub use config::{ConfigError, DatabaseType, EnvSource, GraphitiConfig, ProcessEnv};
pub use driver::{create_graph_driver, DriverError, GraphDriver, GraphDriverHandle};
pub use mcp::McpClientConfig;
