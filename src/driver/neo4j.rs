//! Neo4j driver

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{
    parse_server_uri, probe_tcp, socket_address, DriverError, DriverResult, GraphDriver,
    DEFAULT_CONNECT_TIMEOUT,
};
use crate::config::DatabaseType;

const SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];
const DEFAULT_PORT: u16 = 7687;

/// Neo4j server reached over bolt
pub struct Neo4jDriver {
    uri: Url,
    user: String,
    password: String,
    connect_timeout: Duration,
    closed: AtomicBool,
}

impl Neo4jDriver {
    pub fn new(uri: &str, user: &str, password: &str) -> DriverResult<Self> {
        let uri = parse_server_uri(DatabaseType::Neo4j, uri, SCHEMES)?;

        Ok(Self {
            uri,
            user: user.to_string(),
            password: password.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// `host:port` the driver connects to
    pub fn address(&self) -> String {
        socket_address(&self.uri, DEFAULT_PORT)
    }
}

impl std::fmt::Debug for Neo4jDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jDriver")
            .field("uri", &self.uri.as_str())
            .field("user", &self.user)
            .field("has_password", &self.has_password())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl GraphDriver for Neo4jDriver {
    fn provider(&self) -> DatabaseType {
        DatabaseType::Neo4j
    }

    fn location(&self) -> String {
        self.uri.to_string()
    }

    async fn verify_connectivity(&self) -> DriverResult<()> {
        if self.is_closed() {
            return Err(DriverError::Closed(DatabaseType::Neo4j));
        }
        probe_tcp(DatabaseType::Neo4j, &self.address(), self.connect_timeout).await
    }

    async fn close(&self) -> DriverResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(uri = %self.uri, "Closed Neo4j driver");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
