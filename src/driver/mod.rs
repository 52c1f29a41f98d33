//! Graph database drivers
//!
//! Maps a resolved [`GraphitiConfig`] to a concrete driver.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              GraphDriverHandle               │
//! │  ┌────────────┬─────────────┬─────────────┐  │
//! │  │ KuzuDriver │ Neo4jDriver │ FalkorDriver│  │
//! │  │ (embedded) │   (bolt)    │   (redis)   │  │
//! │  └────────────┴─────────────┴─────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Drivers own connection parameters and their lifecycle (probe, close).
//! Query execution belongs to the graph engine client, not to this crate.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{debug, info};
use url::Url;

use crate::config::{DatabaseType, GraphitiConfig};

pub mod falkordb;
pub mod kuzu;
pub mod neo4j;

pub use falkordb::FalkorDriver;
pub use kuzu::KuzuDriver;
pub use neo4j::Neo4jDriver;

/// How long a connectivity probe waits for a TCP handshake
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Errors raised by a driver. Configuration code passes them through untouched.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Invalid {backend} URI '{uri}': {reason}")]
    InvalidUri {
        backend: DatabaseType,
        uri: String,
        reason: String,
    },

    #[error("Cannot reach {backend} at {address}: {source}")]
    Unreachable {
        backend: DatabaseType,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {timeout:?} connecting to {backend} at {address}")]
    Timeout {
        backend: DatabaseType,
        address: String,
        timeout: Duration,
    },

    #[error("Cannot prepare Kuzu database at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} driver is closed")]
    Closed(DatabaseType),
}

/// Lifecycle shared by every backend driver
#[async_trait]
pub trait GraphDriver: Send + Sync {
    /// Backend this driver talks to
    fn provider(&self) -> DatabaseType;

    /// Where the data lives (path, `:memory:` or server address)
    fn location(&self) -> String;

    /// Check that the backend can be used
    async fn verify_connectivity(&self) -> DriverResult<()>;

    /// Release the driver. Closing twice is a no-op.
    async fn close(&self) -> DriverResult<()>;

    fn is_closed(&self) -> bool;
}

/// Driver for whichever backend the configuration selected
#[derive(Debug)]
pub enum GraphDriverHandle {
    Kuzu(KuzuDriver),
    Neo4j(Neo4jDriver),
    FalkorDb(FalkorDriver),
}

/// Build the driver for `config.database_type`.
///
/// Only the settings of the selected backend are read.
pub fn create_graph_driver(config: &GraphitiConfig) -> DriverResult<GraphDriverHandle> {
    let driver = match config.database_type {
        DatabaseType::Kuzu => GraphDriverHandle::Kuzu(KuzuDriver::new(&config.kuzu.db)),
        DatabaseType::Neo4j => GraphDriverHandle::Neo4j(Neo4jDriver::new(
            &config.neo4j.uri,
            &config.neo4j.user,
            &config.neo4j.password,
        )?),
        DatabaseType::FalkorDb => GraphDriverHandle::FalkorDb(FalkorDriver::new(
            &config.falkordb.uri,
            config.falkordb.password.clone(),
        )?),
    };

    info!(
        backend = %driver.provider(),
        location = %driver.location(),
        "Created graph driver"
    );
    Ok(driver)
}

impl GraphDriverHandle {
    pub fn as_kuzu(&self) -> Option<&KuzuDriver> {
        match self {
            GraphDriverHandle::Kuzu(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_neo4j(&self) -> Option<&Neo4jDriver> {
        match self {
            GraphDriverHandle::Neo4j(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_falkordb(&self) -> Option<&FalkorDriver> {
        match self {
            GraphDriverHandle::FalkorDb(d) => Some(d),
            _ => None,
        }
    }
}

#[async_trait]
impl GraphDriver for GraphDriverHandle {
    fn provider(&self) -> DatabaseType {
        match self {
            GraphDriverHandle::Kuzu(d) => d.provider(),
            GraphDriverHandle::Neo4j(d) => d.provider(),
            GraphDriverHandle::FalkorDb(d) => d.provider(),
        }
    }

    fn location(&self) -> String {
        match self {
            GraphDriverHandle::Kuzu(d) => d.location(),
            GraphDriverHandle::Neo4j(d) => d.location(),
            GraphDriverHandle::FalkorDb(d) => d.location(),
        }
    }

    async fn verify_connectivity(&self) -> DriverResult<()> {
        match self {
            GraphDriverHandle::Kuzu(d) => d.verify_connectivity().await,
            GraphDriverHandle::Neo4j(d) => d.verify_connectivity().await,
            GraphDriverHandle::FalkorDb(d) => d.verify_connectivity().await,
        }
    }

    async fn close(&self) -> DriverResult<()> {
        match self {
            GraphDriverHandle::Kuzu(d) => d.close().await,
            GraphDriverHandle::Neo4j(d) => d.close().await,
            GraphDriverHandle::FalkorDb(d) => d.close().await,
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            GraphDriverHandle::Kuzu(d) => d.is_closed(),
            GraphDriverHandle::Neo4j(d) => d.is_closed(),
            GraphDriverHandle::FalkorDb(d) => d.is_closed(),
        }
    }
}

/// Parse a server URI and check its scheme and host
pub(crate) fn parse_server_uri(
    backend: DatabaseType,
    uri: &str,
    schemes: &[&str],
) -> DriverResult<Url> {
    let invalid = |reason: String| DriverError::InvalidUri {
        backend,
        uri: uri.to_string(),
        reason,
    };

    let url = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;

    if !schemes.contains(&url.scheme()) {
        return Err(invalid(format!(
            "scheme '{}' not supported (expected one of: {})",
            url.scheme(),
            schemes.join(", ")
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// `host:port` of a server URI, filling in the backend's default port
pub(crate) fn socket_address(url: &Url, default_port: u16) -> String {
    let host = url.host_str().unwrap_or("localhost");
    format!("{}:{}", host, url.port().unwrap_or(default_port))
}

/// Open and drop a TCP connection to `address`
pub(crate) async fn probe_tcp(
    backend: DatabaseType,
    address: &str,
    timeout: Duration,
) -> DriverResult<()> {
    debug!(%backend, %address, "Probing TCP endpoint");

    match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(source)) => Err(DriverError::Unreachable {
            backend,
            address: address.to_string(),
            source,
        }),
        Err(_) => Err(DriverError::Timeout {
            backend,
            address: address.to_string(),
            timeout,
        }),
    }
}
