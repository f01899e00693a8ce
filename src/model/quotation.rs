//! Supplier quotations offered against a purchase request.

use serde::{Deserialize, Serialize};

/// A persisted quotation (`cotacoes` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: i64,
    pub request_id: i64,
    pub supplier: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: i64,
    pub delivery_term: Option<String>,
    pub note: Option<String>,
}

/// Fields for inserting a quotation. Only `request_id` is required;
/// `quantity` defaults to 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewQuotation {
    pub request_id: i64,
    pub supplier: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: Option<i64>,
    pub delivery_term: Option<String>,
    pub note: Option<String>,
}

impl NewQuotation {
    pub fn new(request_id: i64, supplier: impl Into<String>, unit_price: f64) -> Self {
        Self {
            request_id,
            supplier: Some(supplier.into()),
            unit_price: Some(unit_price),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn delivery_term(mut self, delivery_term: impl Into<String>) -> Self {
        self.delivery_term = Some(delivery_term.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial update of a quotation. `None` leaves a column unchanged and
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationUpdate {
    pub supplier: Option<Option<String>>,
    pub unit_price: Option<Option<f64>>,
    pub quantity: Option<i64>,
    pub delivery_term: Option<Option<String>>,
    pub note: Option<Option<String>>,
}
