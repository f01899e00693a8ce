//! History (audit trail) repository.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::schema::{now_millis, to_sql_timestamp};
use super::StoreError;
use crate::model::{HistoryEntry, HistoryUpdate, NewHistoryEntry};

/// Stateless access to the `historico` table.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append an entry to a request's trail. The timestamp defaults to now.
    pub fn insert(conn: &Connection, new: &NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        let created_at = new.created_at.unwrap_or_else(now_millis);

        let entry = conn
            .query_row(
                r#"
                INSERT INTO historico (request_id, action, comment, author, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING id, request_id, action, comment, author, created_at
                "#,
                params![
                    new.request_id,
                    new.action,
                    new.comment,
                    new.author,
                    to_sql_timestamp(&created_at),
                ],
                row_to_entry,
            )
            .map_err(|e| StoreError::for_child_of(e, new.request_id))?;

        tracing::debug!(
            id = entry.id,
            request_id = entry.request_id,
            action = ?entry.action,
            "History entry recorded"
        );
        Ok(entry)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<HistoryEntry>, StoreError> {
        let entry = conn
            .query_row(
                "SELECT id, request_id, action, comment, author, created_at FROM historico WHERE id = ?1",
                [id],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Trail of one request, oldest first.
    pub fn list_for_request(conn: &Connection, request_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, request_id, action, comment, author, created_at
             FROM historico WHERE request_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let entries = stmt
            .query_map([request_id], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn update(
        conn: &Connection,
        id: i64,
        update: &HistoryUpdate,
    ) -> Result<Option<HistoryEntry>, StoreError> {
        let entry = conn
            .query_row(
                r#"
                UPDATE historico SET
                    action = CASE WHEN ?2 THEN ?3 ELSE action END,
                    comment = CASE WHEN ?4 THEN ?5 ELSE comment END,
                    author = CASE WHEN ?6 THEN ?7 ELSE author END
                WHERE id = ?1
                RETURNING id, request_id, action, comment, author, created_at
                "#,
                params![
                    id,
                    update.action.is_some(),
                    update.action.clone().flatten(),
                    update.comment.is_some(),
                    update.comment.clone().flatten(),
                    update.author.is_some(),
                    update.author.clone().flatten(),
                ],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let deleted = conn.execute("DELETE FROM historico WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        request_id: row.get(1)?,
        action: row.get(2)?,
        comment: row.get(3)?,
        author: row.get(4)?,
        created_at: row.get(5)?,
    })
}
