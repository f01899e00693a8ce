//! Quotation repository.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::StoreError;
use crate::model::{NewQuotation, Quotation, QuotationUpdate};

/// Stateless access to the `cotacoes` table.
pub struct QuotationRepo;

impl QuotationRepo {
    /// Insert a quotation.
    ///
    /// Fails with [`StoreError::UnknownRequest`] if the parent request does
    /// not exist.
    pub fn insert(conn: &Connection, new: &NewQuotation) -> Result<Quotation, StoreError> {
        let quotation = conn
            .query_row(
                r#"
                INSERT INTO cotacoes (request_id, supplier, unit_price, quantity, delivery_term, note)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING id, request_id, supplier, unit_price, quantity, delivery_term, note
                "#,
                params![
                    new.request_id,
                    new.supplier,
                    new.unit_price,
                    new.quantity.unwrap_or(1),
                    new.delivery_term,
                    new.note,
                ],
                row_to_quotation,
            )
            .map_err(|e| StoreError::for_child_of(e, new.request_id))?;

        tracing::debug!(
            id = quotation.id,
            request_id = quotation.request_id,
            supplier = ?quotation.supplier,
            "Quotation inserted"
        );
        Ok(quotation)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Quotation>, StoreError> {
        let quotation = conn
            .query_row(
                "SELECT id, request_id, supplier, unit_price, quantity, delivery_term, note
                 FROM cotacoes WHERE id = ?1",
                [id],
                row_to_quotation,
            )
            .optional()?;
        Ok(quotation)
    }

    /// Quotations of one request, ordered by id.
    pub fn list_for_request(conn: &Connection, request_id: i64) -> Result<Vec<Quotation>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, request_id, supplier, unit_price, quantity, delivery_term, note
             FROM cotacoes WHERE request_id = ?1 ORDER BY id ASC",
        )?;
        let quotations = stmt
            .query_map([request_id], row_to_quotation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quotations)
    }

    pub fn update(
        conn: &Connection,
        id: i64,
        update: &QuotationUpdate,
    ) -> Result<Option<Quotation>, StoreError> {
        let quotation = conn
            .query_row(
                r#"
                UPDATE cotacoes SET
                    supplier = CASE WHEN ?2 THEN ?3 ELSE supplier END,
                    unit_price = CASE WHEN ?4 THEN ?5 ELSE unit_price END,
                    quantity = COALESCE(?6, quantity),
                    delivery_term = CASE WHEN ?7 THEN ?8 ELSE delivery_term END,
                    note = CASE WHEN ?9 THEN ?10 ELSE note END
                WHERE id = ?1
                RETURNING id, request_id, supplier, unit_price, quantity, delivery_term, note
                "#,
                params![
                    id,
                    update.supplier.is_some(),
                    update.supplier.clone().flatten(),
                    update.unit_price.is_some(),
                    update.unit_price.flatten(),
                    update.quantity,
                    update.delivery_term.is_some(),
                    update.delivery_term.clone().flatten(),
                    update.note.is_some(),
                    update.note.clone().flatten(),
                ],
                row_to_quotation,
            )
            .optional()?;
        Ok(quotation)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let deleted = conn.execute("DELETE FROM cotacoes WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

fn row_to_quotation(row: &Row<'_>) -> rusqlite::Result<Quotation> {
    Ok(Quotation {
        id: row.get(0)?,
        request_id: row.get(1)?,
        supplier: row.get(2)?,
        unit_price: row.get(3)?,
        quantity: row.get(4)?,
        delivery_term: row.get(5)?,
        note: row.get(6)?,
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
        let request = RequestRepo::insert(&conn, &NewPurchaseRequest::new("ana", "papel A4")).unwrap();
        (conn, request.id)
    }

    #[test]
    fn test_insert_defaults_quantity() {
        let (conn, request_id) = test_conn();
        let quotation = QuotationRepo::insert(
            &conn,
            &NewQuotation::new(request_id, "Papelaria Central", 23.9).delivery_term("5 dias"),
        )
        .unwrap();

        assert_eq!(quotation.quantity, 1);
        assert_eq!(quotation.request_id, request_id);
        assert_eq!(quotation.delivery_term.as_deref(), Some("5 dias"));
        assert!(quotation.note.is_none());
        assert_eq!(QuotationRepo::get(&conn, quotation.id).unwrap(), Some(quotation));
    }

    #[test]
    fn test_insert_with_only_request_reference() {
        let (conn, request_id) = test_conn();
        let bare = NewQuotation {
            request_id,
            ..NewQuotation::default()
        };
        let quotation = QuotationRepo::insert(&conn, &bare).unwrap();

        assert!(quotation.supplier.is_none());
        assert!(quotation.unit_price.is_none());
        assert_eq!(quotation.quantity, 1);

        let update = QuotationUpdate {
            supplier: Some(Some("Loja C".into())),
            ..QuotationUpdate::default()
        };
        let updated = QuotationRepo::update(&conn, quotation.id, &update).unwrap().unwrap();
        assert_eq!(updated.supplier.as_deref(), Some("Loja C"));

        let cleared = QuotationUpdate {
            supplier: Some(None),
            ..QuotationUpdate::default()
        };
        let updated = QuotationRepo::update(&conn, quotation.id, &cleared).unwrap().unwrap();
        assert!(updated.supplier.is_none());
    }

    #[test]
    fn test_insert_for_unknown_request_fails() {
        let (conn, request_id) = test_conn();
        let err = QuotationRepo::insert(&conn, &NewQuotation::new(request_id + 100, "X", 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownRequest(id) if id == request_id + 100));
    }

    #[test]
    fn test_list_update_delete() {
        let (conn, request_id) = test_conn();
        let first = QuotationRepo::insert(&conn, &NewQuotation::new(request_id, "A", 10.0)).unwrap();
        let second = QuotationRepo::insert(&conn, &NewQuotation::new(request_id, "B", 9.5).quantity(3)).unwrap();

        let listed = QuotationRepo::list_for_request(&conn, request_id).unwrap();
        assert_eq!(listed, vec![first.clone(), second.clone()]);

        let update = QuotationUpdate {
            unit_price: Some(Some(8.75)),
            note: Some(Some("frete incluso".into())),
            ..QuotationUpdate::default()
        };
        let updated = QuotationRepo::update(&conn, second.id, &update).unwrap().unwrap();
        assert_eq!(updated.unit_price, Some(8.75));
        assert_eq!(updated.supplier.as_deref(), Some("B"));
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.note.as_deref(), Some("frete incluso"));

        assert!(QuotationRepo::delete(&conn, first.id).unwrap());
        assert!(!QuotationRepo::delete(&conn, first.id).unwrap());
        assert_eq!(QuotationRepo::list_for_request(&conn, request_id).unwrap().len(), 1);
    }
}
