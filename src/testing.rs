//! Test utilities for store setup.
//!
//! Provides a tempdir-backed sqlite store so tests exercise the same schema
//! initialization as production code.

use std::path::Path;
use tempfile::TempDir;

use crate::store::{SqliteStore, StoreError};

/// Test environment with a durable store in a temporary directory.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for store file persistence)
    pub temp: TempDir,
    /// Sqlite store initialized with the authoritative schema
    pub store: SqliteStore,
}

impl TestEnv {
    pub fn new() -> Result<Self, StoreError> {
        let temp = TempDir::new().map_err(|e| StoreError::Backend(e.to_string()))?;
        let store = SqliteStore::open(&temp.path().join("store.db"))?;
        Ok(Self { temp, store })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}
