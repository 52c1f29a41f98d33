//! FalkorDB driver

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

const SCHEMES: &[&str] = &["redis", "rediss", "falkor", "falkors"];
const DEFAULT_PORT: u16 = 6379;

/// FalkorDB server reached over the redis protocol
pub struct FalkorDriver {
    uri: Url,
    password: Option<String>,
    connect_timeout: Duration,
    closed: AtomicBool,
}

impl FalkorDriver {
    pub fn new(uri: &str, password: Option<String>) -> DriverResult<Self> {
        let uri = parse_server_uri(DatabaseType::FalkorDb, uri, SCHEMES)?;

        Ok(Self {
            uri,
            password,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn address(&self) -> String {
        socket_address(&self.uri, DEFAULT_PORT)
    }
}

impl std::fmt::Debug for FalkorDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalkorDriver")
            .field("uri", &self.uri.as_str())
            .field("has_password", &self.has_password())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl GraphDriver for FalkorDriver {
    fn provider(&self) -> DatabaseType {
        DatabaseType::FalkorDb
    }

    fn location(&self) -> String {
        self.uri.to_string()
    }

    async fn verify_connectivity(&self) -> DriverResult<()> {
        if self.is_closed() {
            return Err(DriverError::Closed(DatabaseType::FalkorDb));
        }
        probe_tcp(DatabaseType::FalkorDb, &self.address(), self.connect_timeout).await
    }

    async fn close(&self) -> DriverResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(uri = %self.uri, "Closed FalkorDB driver");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
