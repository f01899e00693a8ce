//! Connection pool and session factory.
//!
//! Uses r2d2 with r2d2_sqlite for pooled access to a single database file.
//! Every pooled connection gets the same pragmas, so foreign keys and
//! cascades hold no matter which connection a session draws.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::schema::{apply_pragmas, current_version, run_migrations};
use super::{Session, StoreError};
use crate::config::StoreConfig;

/// Handle to the purchase-request database.
///
/// Cheap to clone and safe to share across threads; each thread should take
/// its own [`Session`] per unit of work.
#[derive(Clone)]
pub struct Store {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl Store {
    /// Open (creating if needed) the database described by `config`.
    ///
    /// Creates the data directory, builds the pool and brings the schema to
    /// the latest version.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::build(config.db_path(), config.pool_size, config.busy_timeout())
    }

    /// Open `data/compras.db` relative to the working directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::default())
    }

    /// Open an explicit database file with default tuning.
    pub fn open_path<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self, StoreError> {
        let defaults = StoreConfig::default();
        Self::build(db_path.as_ref().to_path_buf(), pool_size, defaults.busy_timeout())
    }

    fn build(path: PathBuf, pool_size: u32, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // NO_MUTEX: a connection is only ever used by the session that
        // checked it out, and r2d2 hands them across threads.
        let manager = SqliteConnectionManager::file(&path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        );

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(StoreConnectionCustomizer { busy_timeout }))
            .build(manager)?;

        let applied = {
            let mut conn = pool.get()?;
            run_migrations(&mut conn)?
        };

        tracing::info!(
            path = %path.display(),
            pool_size,
            migrations_applied = applied,
            "Purchase store opened"
        );

        Ok(Self { pool, path })
    }

    /// Start a new, independent session.
    pub fn session(&self) -> Result<Session, StoreError> {
        Ok(Session::new(self.pool.get()?))
    }

    /// Run `f` in its own session.
    ///
    /// Pending changes are committed when `f` returns `Ok` and rolled back
    /// when it returns `Err`.
    pub fn with_session<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Session) -> Result<T, StoreError>,
    {
        let mut session = self.session()?;
        match f(&mut session) {
            Ok(value) => {
                session.commit()?;
                Ok(value)
            }
            Err(e) => {
                session.rollback()?;
                Err(e)
            }
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current pool state for monitoring.
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<u32, StoreError> {
        let conn = self.pool.get()?;
        Ok(current_version(&conn)?)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("state", &self.pool.state())
            .finish()
    }
}

/// Connection customizer that applies the store pragmas.
#[derive(Debug)]
struct StoreConnectionCustomizer {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error> for StoreConnectionCustomizer {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_pragmas(conn, self.busy_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewPurchaseRequest;
    use crate::storage::schema::latest_version;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::with_data_dir(temp_dir.path().join("nested").join("data"));

        let store = Store::open(&config).unwrap();

        assert!(config.data_dir.is_dir());
        assert!(store.path().exists());
        assert_eq!(store.path(), config.db_path().as_path());
        assert_eq!(store.schema_version().unwrap(), latest_version());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("compras.db");

        {
            let store = Store::open_path(&db_path, 2).unwrap();
            store
                .with_session(|s| s.create_request(&NewPurchaseRequest::new("ana", "mouse")))
                .unwrap();
        }

        let store = Store::open_path(&db_path, 2).unwrap();
        let session = store.session().unwrap();
        assert_eq!(session.count_requests().unwrap(), 1);
    }

    #[test]
    fn test_with_session_rolls_back_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_path(temp_dir.path().join("compras.db"), 2).unwrap();

        let result: Result<(), StoreError> = store.with_session(|s| {
            s.create_request(&NewPurchaseRequest::new("ana", "teclado"))?;
            Err(StoreError::UnknownRequest(0))
        });
        assert!(result.is_err());

        let session = store.session().unwrap();
        assert_eq!(session.count_requests().unwrap(), 0);
    }

    #[test]
    fn test_pool_connections_enforce_foreign_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_path(temp_dir.path().join("compras.db"), 3).unwrap();

        let sessions: Vec<Session> = (0..3).map(|_| store.session().unwrap()).collect();
        for session in &sessions {
            assert!(session.foreign_keys_enabled().unwrap());
        }
        assert_eq!(store.state().connections, 3);
    }
}
