//! Error type for store operations.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Error type for pool, session and repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Purchase request {0} does not exist")]
    UnknownRequest(i64),

    /// Another session holds pending writes and did not finish within the
    /// busy timeout. SQLite admits one writer at a time; the caller may retry
    /// once that session commits or rolls back.
    #[error("Another session has uncommitted writes; retry after it commits or rolls back")]
    WriteLocked,
}

impl StoreError {
    /// True for NOT NULL, CHECK, UNIQUE and foreign-key violations.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StoreError::UnknownRequest(_) => true,
            StoreError::Database(e) => e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation),
            _ => false,
        }
    }

    /// Map a failure to acquire the write lock to [`StoreError::WriteLocked`].
    pub(crate) fn for_write_lock(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => StoreError::WriteLocked,
            _ => StoreError::Database(err),
        }
    }

    /// Map a foreign-key violation on a child row to [`StoreError::UnknownRequest`].
    pub(crate) fn for_child_of(err: rusqlite::Error, request_id: i64) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                StoreError::UnknownRequest(request_id)
            }
            _ => StoreError::Database(err),
        }
    }
}
