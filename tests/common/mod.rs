//! Test utilities for store integration tests.
//!
//! Provides:
//! - A temporary database directory that is removed on drop
//! - Helpers to open a store and count rows directly

#![allow(dead_code)]

use compras::observability::tracing::init_test_tracing;
use compras::{Store, StoreConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Data directory handed to the store (not created up front)
    pub data_dir: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        Self { temp_dir, data_dir }
    }

    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            pool_size: 4,
            busy_timeout_ms: 2000,
            ..StoreConfig::with_data_dir(&self.data_dir)
        }
    }

    /// Open the store for this fixture.
    pub fn open(&self) -> Store {
        Store::open(&self.config()).expect("failed to open store")
    }

    /// Open the store with a specific busy timeout.
    pub fn open_with_busy_timeout(&self, busy_timeout_ms: u64) -> Store {
        let config = StoreConfig {
            busy_timeout_ms,
            ..self.config()
        };
        Store::open(&config).expect("failed to open store")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Count rows of `table` through a fresh session.
pub fn count_rows(store: &Store, table: &str) -> i64 {
    let session = store.session().expect("failed to open session");
    session
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count failed")
}
