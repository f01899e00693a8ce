//! Unit-of-work sessions over a pooled connection.
//!
//! A session reads straight from its connection, so it always sees its own
//! pending writes. The first write opens a `BEGIN IMMEDIATE` transaction
//! that stays open until [`Session::commit`] or [`Session::rollback`];
//! other sessions keep seeing the last committed state in the meantime.
//!
//! SQLite admits a single writer per database file. Any number of sessions
//! may coexist and read, but only one may hold pending writes at a time. A
//! second session that starts writing waits up to the busy timeout for the
//! first to finish, then fails with [`StoreError::WriteLocked`]. That failure
//! leaves both sessions as they were: the holder keeps its pending changes
//! and the waiting session can retry.

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use super::attachments::AttachmentRepo;
use super::history::HistoryRepo;
use super::quotations::QuotationRepo;
use super::requests::RequestRepo;
use super::StoreError;
use crate::model::{
    Attachment, AttachmentUpdate, HistoryEntry, HistoryUpdate, NewAttachment, NewHistoryEntry,
    NewPurchaseRequest, NewQuotation, PurchaseRequest, Quotation, QuotationUpdate, RequestDetail,
    RequestFilter, RequestUpdate,
};

/// A database session holding one pooled connection.
///
/// Dropping a session with pending changes rolls them back.
pub struct Session {
    conn: PooledConnection<SqliteConnectionManager>,
}

impl Session {
    pub(crate) fn new(conn: PooledConnection<SqliteConnectionManager>) -> Self {
        Self { conn }
    }

    /// Connection for reads.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Connection for writes, opening the session transaction if needed.
    ///
    /// Fails with [`StoreError::WriteLocked`] if another session keeps the
    /// write lock past the busy timeout.
    pub fn writer(&mut self) -> Result<&Connection, StoreError> {
        if self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN IMMEDIATE")
                .map_err(StoreError::for_write_lock)?;
            tracing::trace!("Session transaction started");
        }
        Ok(&self.conn)
    }

    /// True while writes are waiting for commit or rollback.
    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Make pending changes durable and visible to other sessions.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        if self.has_pending_changes() {
            self.conn.execute_batch("COMMIT")?;
            tracing::debug!("Session committed");
        }
        Ok(())
    }

    /// Discard pending changes.
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        if self.has_pending_changes() {
            self.conn.execute_batch("ROLLBACK")?;
            tracing::debug!("Session rolled back");
        }
        Ok(())
    }

    /// Discard pending changes and return the connection to the pool.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.rollback()
    }

    /// Whether this connection enforces foreign keys.
    #[cfg(test)]
    pub(crate) fn foreign_keys_enabled(&self) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))?)
    }

    // ========== Purchase requests ==========

    pub fn create_request(&mut self, new: &NewPurchaseRequest) -> Result<PurchaseRequest, StoreError> {
        RequestRepo::insert(self.writer()?, new)
    }

    pub fn get_request(&self, id: i64) -> Result<Option<PurchaseRequest>, StoreError> {
        RequestRepo::get(&self.conn, id)
    }

    pub fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<PurchaseRequest>, StoreError> {
        RequestRepo::list(&self.conn, filter)
    }

    pub fn count_requests(&self) -> Result<u64, StoreError> {
        RequestRepo::count(&self.conn)
    }

    pub fn update_request(
        &mut self,
        id: i64,
        update: &RequestUpdate,
    ) -> Result<Option<PurchaseRequest>, StoreError> {
        RequestRepo::update(self.writer()?, id, update)
    }

    /// Delete a request together with its quotations, attachments and history.
    pub fn delete_request(&mut self, id: i64) -> Result<bool, StoreError> {
        RequestRepo::delete(self.writer()?, id)
    }

    /// Load a request with all of its children.
    pub fn request_detail(&self, id: i64) -> Result<Option<RequestDetail>, StoreError> {
        let Some(request) = RequestRepo::get(&self.conn, id)? else {
            return Ok(None);
        };
        Ok(Some(RequestDetail {
            quotations: QuotationRepo::list_for_request(&self.conn, id)?,
            attachments: AttachmentRepo::list_for_request(&self.conn, id)?,
            history: HistoryRepo::list_for_request(&self.conn, id)?,
            request,
        }))
    }

    // ========== Quotations ==========

    pub fn add_quotation(&mut self, new: &NewQuotation) -> Result<Quotation, StoreError> {
        QuotationRepo::insert(self.writer()?, new)
    }

    pub fn get_quotation(&self, id: i64) -> Result<Option<Quotation>, StoreError> {
        QuotationRepo::get(&self.conn, id)
    }

    pub fn quotations_for(&self, request_id: i64) -> Result<Vec<Quotation>, StoreError> {
        QuotationRepo::list_for_request(&self.conn, request_id)
    }

    pub fn update_quotation(
        &mut self,
        id: i64,
        update: &QuotationUpdate,
    ) -> Result<Option<Quotation>, StoreError> {
        QuotationRepo::update(self.writer()?, id, update)
    }

    pub fn delete_quotation(&mut self, id: i64) -> Result<bool, StoreError> {
        QuotationRepo::delete(self.writer()?, id)
    }

    // ========== Attachments ==========

    pub fn add_attachment(&mut self, new: &NewAttachment) -> Result<Attachment, StoreError> {
        AttachmentRepo::insert(self.writer()?, new)
    }

    pub fn get_attachment(&self, id: i64) -> Result<Option<Attachment>, StoreError> {
        AttachmentRepo::get(&self.conn, id)
    }

    pub fn attachments_for(&self, request_id: i64) -> Result<Vec<Attachment>, StoreError> {
        AttachmentRepo::list_for_request(&self.conn, request_id)
    }

    pub fn update_attachment(
        &mut self,
        id: i64,
        update: &AttachmentUpdate,
    ) -> Result<Option<Attachment>, StoreError> {
        AttachmentRepo::update(self.writer()?, id, update)
    }

    pub fn delete_attachment(&mut self, id: i64) -> Result<bool, StoreError> {
        AttachmentRepo::delete(self.writer()?, id)
    }

    // ========== History ==========

    pub fn add_history(&mut self, new: &NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        HistoryRepo::insert(self.writer()?, new)
    }

    pub fn get_history(&self, id: i64) -> Result<Option<HistoryEntry>, StoreError> {
        HistoryRepo::get(&self.conn, id)
    }

    pub fn history_for(&self, request_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
        HistoryRepo::list_for_request(&self.conn, request_id)
    }

    pub fn update_history(
        &mut self,
        id: i64,
        update: &HistoryUpdate,
    ) -> Result<Option<HistoryEntry>, StoreError> {
        HistoryRepo::update(self.writer()?, id, update)
    }

    pub fn delete_history(&mut self, id: i64) -> Result<bool, StoreError> {
        HistoryRepo::delete(self.writer()?, id)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.has_pending_changes() {
            // The connection goes back to the pool; it must not carry an open
            // transaction with it.
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "Failed to roll back abandoned session");
            } else {
                tracing::debug!("Abandoned session rolled back");
            }
        }
    }
}
