//! Attachment repository.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::StoreError;
use crate::model::{Attachment, AttachmentUpdate, NewAttachment};

/// Stateless access to the `anexos` table.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Record a file reference. The file itself is not touched.
    pub fn insert(conn: &Connection, new: &NewAttachment) -> Result<Attachment, StoreError> {
        let attachment = conn
            .query_row(
                r#"
                INSERT INTO anexos (request_id, filename, filepath)
                VALUES (?1, ?2, ?3)
                RETURNING id, request_id, filename, filepath
                "#,
                params![new.request_id, new.filename, new.filepath],
                row_to_attachment,
            )
            .map_err(|e| StoreError::for_child_of(e, new.request_id))?;

        tracing::debug!(
            id = attachment.id,
            request_id = attachment.request_id,
            filename = ?attachment.filename,
            "Attachment recorded"
        );
        Ok(attachment)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Attachment>, StoreError> {
        let attachment = conn
            .query_row(
                "SELECT id, request_id, filename, filepath FROM anexos WHERE id = ?1",
                [id],
                row_to_attachment,
            )
            .optional()?;
        Ok(attachment)
    }

    pub fn list_for_request(conn: &Connection, request_id: i64) -> Result<Vec<Attachment>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, request_id, filename, filepath FROM anexos WHERE request_id = ?1 ORDER BY id ASC",
        )?;
        let attachments = stmt
            .query_map([request_id], row_to_attachment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attachments)
    }

    pub fn update(
        conn: &Connection,
        id: i64,
        update: &AttachmentUpdate,
    ) -> Result<Option<Attachment>, StoreError> {
        let attachment = conn
            .query_row(
                r#"
                UPDATE anexos SET
                    filename = CASE WHEN ?2 THEN ?3 ELSE filename END,
                    filepath = CASE WHEN ?4 THEN ?5 ELSE filepath END
                WHERE id = ?1
                RETURNING id, request_id, filename, filepath
                "#,
                params![
                    id,
                    update.filename.is_some(),
                    update.filename.clone().flatten(),
                    update.filepath.is_some(),
                    update.filepath.clone().flatten(),
                ],
                row_to_attachment,
            )
            .optional()?;
        Ok(attachment)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let deleted = conn.execute("DELETE FROM anexos WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

fn row_to_attachment(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        request_id: row.get(1)?,
        filename: row.get(2)?,
        filepath: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewPurchaseRequest;
    use crate::storage::requests::RequestRepo;
    use crate::storage::schema::{apply_pragmas, run_migrations};
    use std::time::Duration;

    fn test_conn() -> (Connection, i64) {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_pragmas(&conn, Duration::from_millis(100)).unwrap();
        run_migrations(&mut conn).unwrap();
        let request = RequestRepo::insert(&conn, &NewPurchaseRequest::new("ana", "impressora")).unwrap();
        (conn, request.id)
    }

    #[test]
    fn test_insert_and_rename() {
        let (conn, request_id) = test_conn();
        let attachment = AttachmentRepo::insert(
            &conn,
            &NewAttachment::new(request_id, "orcamento.pdf", "uploads/1/orcamento.pdf"),
        )
        .unwrap();
        assert_eq!(AttachmentRepo::list_for_request(&conn, request_id).unwrap(), vec![attachment.clone()]);

        let update = AttachmentUpdate {
            filename: Some(Some("orcamento-v2.pdf".into())),
            filepath: None,
        };
        let renamed = AttachmentRepo::update(&conn, attachment.id, &update).unwrap().unwrap();
        assert_eq!(renamed.filename.as_deref(), Some("orcamento-v2.pdf"));
        assert_eq!(renamed.filepath.as_deref(), Some("uploads/1/orcamento.pdf"));

        assert!(AttachmentRepo::delete(&conn, attachment.id).unwrap());
        assert!(AttachmentRepo::get(&conn, attachment.id).unwrap().is_none());
    }

    #[test]
    fn test_file_fields_are_optional() {
        let (conn, request_id) = test_conn();
        let bare = NewAttachment {
            request_id,
            ..NewAttachment::default()
        };
        let attachment = AttachmentRepo::insert(&conn, &bare).unwrap();
        assert!(attachment.filename.is_none());
        assert!(attachment.filepath.is_none());

        let update = AttachmentUpdate {
            filepath: Some(Some("uploads/1/nota.pdf".into())),
            ..AttachmentUpdate::default()
        };
        let updated = AttachmentRepo::update(&conn, attachment.id, &update).unwrap().unwrap();
        assert!(updated.filename.is_none());
        assert_eq!(updated.filepath.as_deref(), Some("uploads/1/nota.pdf"));
    }

    #[test]
    fn test_insert_for_unknown_request_fails() {
        let (conn, _) = test_conn();
        let err = AttachmentRepo::insert(&conn, &NewAttachment::new(404, "a.txt", "a.txt")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownRequest(404)));
    }
}
