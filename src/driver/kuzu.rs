//! Embedded Kuzu driver

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::{DriverError, DriverResult, GraphDriver};
use crate::config::{DatabaseType, KUZU_IN_MEMORY};

/// Kuzu database, either a directory on disk or `:memory:`
#[derive(Debug)]
pub struct KuzuDriver {
    db: String,
    closed: AtomicBool,
}

impl KuzuDriver {
    pub fn new(db: &str) -> Self {
        Self {
            db: db.to_string(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn is_in_memory(&self) -> bool {
        self.db == KUZU_IN_MEMORY
    }
}

#[async_trait]
impl GraphDriver for KuzuDriver {
    fn provider(&self) -> DatabaseType {
        DatabaseType::Kuzu
    }

    fn location(&self) -> String {
        self.db.clone()
    }

    /// In-memory databases are always usable. On disk, Kuzu creates the
    /// database itself but needs its parent directory to exist.
    async fn verify_connectivity(&self) -> DriverResult<()> {
        if self.is_closed() {
            return Err(DriverError::Closed(DatabaseType::Kuzu));
        }
        if self.is_in_memory() {
            return Ok(());
        }

        let path = Path::new(&self.db);
        if path.exists() {
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating parent directory for Kuzu database: {:?}", parent);
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| DriverError::Storage {
                    path: self.db.clone(),
                    source,
                })?;
        }

        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(db = %self.db, "Closed Kuzu driver");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_database() {
        let driver = KuzuDriver::new(":memory:");

        assert!(driver.is_in_memory());
        assert_eq!(driver.location(), ":memory:");
        driver.verify_connectivity().await.unwrap();
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("data").join("graphiti.kuzu");
        let driver = KuzuDriver::new(db_path.to_str().unwrap());

        driver.verify_connectivity().await.unwrap();

        assert!(dir.path().join("data").is_dir());
        // The database itself is left for the engine to create
        assert!(!db_path.exists());
    }

    #[tokio::test]
    async fn test_parent_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let db_path = blocker.join("graph.kuzu");
        let driver = KuzuDriver::new(db_path.to_str().unwrap());

        let err = driver.verify_connectivity().await.unwrap_err();
        assert!(matches!(err, DriverError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_close() {
        let driver = KuzuDriver::new(":memory:");
        assert!(!driver.is_closed());

        driver.close().await.unwrap();
        assert!(driver.is_closed());
    }
}
