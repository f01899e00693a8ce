//! Purchase request repository.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::schema::{now_millis, to_sql_timestamp};
use super::StoreError;
use crate::model::{NewPurchaseRequest, PurchaseRequest, RequestFilter, RequestUpdate};

/// Stateless access to the `solicitacoes` table.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request, filling unset fields with their defaults.
    pub fn insert(conn: &Connection, new: &NewPurchaseRequest) -> Result<PurchaseRequest, StoreError> {
        let created_at = new.created_at.unwrap_or_else(now_millis);
        let updated_at = new.updated_at.unwrap_or(created_at);

        let request = conn.query_row(
            r#"
            INSERT INTO solicitacoes
                (requester, item, quantity, description, cost_center, priority, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id, requester, item, quantity, description, cost_center, priority, status, created_at, updated_at
            "#,
            params![
                new.requester,
                new.item,
                new.quantity.unwrap_or(1),
                new.description,
                new.cost_center,
                new.priority.unwrap_or_default(),
                new.status.unwrap_or_default(),
                to_sql_timestamp(&created_at),
                to_sql_timestamp(&updated_at),
            ],
            row_to_request,
        )?;

        tracing::debug!(id = request.id, item = %request.item, "Purchase request inserted");
        Ok(request)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<PurchaseRequest>, StoreError> {
        let request = conn
            .query_row(
                "SELECT id, requester, item, quantity, description, cost_center, priority, status, created_at, updated_at
                 FROM solicitacoes WHERE id = ?1",
                [id],
                row_to_request,
            )
            .optional()?;
        Ok(request)
    }

    /// List requests matching `filter`, ordered by id.
    pub fn list(conn: &Connection, filter: &RequestFilter) -> Result<Vec<PurchaseRequest>, StoreError> {
        // LIMIT -1 means no limit in SQLite.
        let limit = filter.limit.map_or(-1, i64::from);
        let mut stmt = conn.prepare(
            r#"
            SELECT id, requester, item, quantity, description, cost_center, priority, status, created_at, updated_at
            FROM solicitacoes
            WHERE (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR requester = ?2)
            ORDER BY id ASC
            LIMIT ?3
            "#,
        )?;
        let requests = stmt
            .query_map(params![filter.status, filter.requester, limit], row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requests)
    }

    /// Apply `update` and return the new row, or `None` if `id` is unknown.
    pub fn update(
        conn: &Connection,
        id: i64,
        update: &RequestUpdate,
    ) -> Result<Option<PurchaseRequest>, StoreError> {
        let updated_at = update.updated_at.unwrap_or_else(now_millis);

        let request = conn
            .query_row(
                r#"
                UPDATE solicitacoes SET
                    requester = COALESCE(?2, requester),
                    item = COALESCE(?3, item),
                    quantity = COALESCE(?4, quantity),
                    description = CASE WHEN ?5 THEN ?6 ELSE description END,
                    cost_center = CASE WHEN ?7 THEN ?8 ELSE cost_center END,
                    priority = COALESCE(?9, priority),
                    status = COALESCE(?10, status),
                    updated_at = ?11
                WHERE id = ?1
                RETURNING id, requester, item, quantity, description, cost_center, priority, status, created_at, updated_at
                "#,
                params![
                    id,
                    update.requester,
                    update.item,
                    update.quantity,
                    update.description.is_some(),
                    update.description.clone().flatten(),
                    update.cost_center.is_some(),
                    update.cost_center.clone().flatten(),
                    update.priority,
                    update.status,
                    to_sql_timestamp(&updated_at),
                ],
                row_to_request,
            )
            .optional()?;

        if let Some(request) = &request {
            tracing::debug!(id, status = %request.status, "Purchase request updated");
        }
        Ok(request)
    }

    /// Delete a request and, through the foreign keys, everything it owns.
    ///
    /// Returns false if no request had this id.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let deleted = conn.execute("DELETE FROM solicitacoes WHERE id = ?1", [id])?;
        if deleted > 0 {
            tracing::debug!(id, "Purchase request deleted");
        }
        Ok(deleted > 0)
    }

    pub fn count(conn: &Connection) -> Result<u64, StoreError> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM solicitacoes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_request(row: &Row<'_>) -> rusqlite::Result<PurchaseRequest> {
    Ok(PurchaseRequest {
        id: row.get(0)?,
        requester: row.get(1)?,
        item: row.get(2)?,
        quantity: row.get(3)?,
        description: row.get(4)?,
        cost_center: row.get(5)?,
        priority: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
