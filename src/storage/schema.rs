//! Database schema, pragmas and migrations.
//!
//! Migrations are plain SQL embedded in the binary. The applied version is
//! tracked in `PRAGMA user_version`, and pending migrations run inside a
//! single transaction so a failed upgrade leaves the file untouched.

use chrono::{DateTime, Timelike, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Duration;

/// Text layout of every stored timestamp, identical to the column default
/// `strftime('%Y-%m-%d %H:%M:%f')`: UTC, no offset, millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Render a timestamp the way the column defaults do.
pub fn to_sql_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time truncated to the stored precision.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

/// Version 1: the four workflow tables.
const V1_INITIAL: &str = r#"
CREATE TABLE IF NOT EXISTS solicitacoes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requester TEXT NOT NULL,
    item TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 1,
    description TEXT,
    cost_center TEXT,
    priority TEXT NOT NULL DEFAULT 'Normal'
        CHECK (priority IN ('Low', 'Normal', 'High')),
    status TEXT NOT NULL DEFAULT 'TO_DO'
        CHECK (status IN ('TO_DO', 'IN_APPROVAL', 'APPROVED', 'REJECTED', 'PURCHASED')),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);

CREATE TABLE IF NOT EXISTS cotacoes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id INTEGER NOT NULL REFERENCES solicitacoes(id) ON DELETE CASCADE,
    supplier TEXT,
    unit_price REAL,
    quantity INTEGER NOT NULL DEFAULT 1,
    delivery_term TEXT,
    note TEXT
);

CREATE TABLE IF NOT EXISTS anexos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id INTEGER NOT NULL REFERENCES solicitacoes(id) ON DELETE CASCADE,
    filename TEXT,
    filepath TEXT
);

CREATE TABLE IF NOT EXISTS historico (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id INTEGER NOT NULL REFERENCES solicitacoes(id) ON DELETE CASCADE,
    action TEXT,
    comment TEXT,
    author TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_solicitacoes_status ON solicitacoes(status);
CREATE INDEX IF NOT EXISTS idx_cotacoes_request ON cotacoes(request_id);
CREATE INDEX IF NOT EXISTS idx_anexos_request ON anexos(request_id);
CREATE INDEX IF NOT EXISTS idx_historico_request ON historico(request_id, created_at);
"#;

/// Migrations in order; entry `i` upgrades the schema to version `i + 1`.
const MIGRATIONS: &[&str] = &[V1_INITIAL];

/// Schema version this build expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Schema version recorded in the database file.
pub fn current_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Apply every pending migration.
///
/// Returns the number of migrations applied (zero when already current).
pub fn run_migrations(conn: &mut Connection) -> rusqlite::Result<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_version(&tx)? as usize;

    let pending = MIGRATIONS.iter().enumerate().skip(current);
    let mut applied = 0;
    for (index, sql) in pending {
        tracing::debug!(version = index + 1, "Applying schema migration");
        tx.execute_batch(sql)?;
        applied += 1;
    }

    if applied > 0 {
        tx.pragma_update(None, "user_version", latest_version())?;
    }
    tx.commit()?;
    Ok(applied)
}

/// Apply per-connection pragmas.
///
/// `foreign_keys` is a per-connection setting in SQLite, so cascades and
/// reference checks only hold if every pooled connection enables it.
pub fn apply_pragmas(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(busy_timeout)?;

    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        tracing::warn!(journal_mode = %mode, "WAL journal mode not available");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}
