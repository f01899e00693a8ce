//! Purchase requests: the root record every other entity hangs off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, HistoryEntry, Priority, Quotation, RequestStatus};

/// A persisted purchase request (`solicitacoes` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: i64,
    pub requester: String,
    pub item: String,
    pub quantity: i64,
    pub description: Option<String>,
    pub cost_center: Option<String>,
    pub priority: Priority,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a purchase request.
///
/// Unset optional fields fall back to the column defaults: quantity 1,
/// priority `Normal`, status `TO_DO`, both timestamps set to the insert time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPurchaseRequest {
    pub requester: String,
    pub item: String,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub cost_center: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<RequestStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewPurchaseRequest {
    pub fn new(requester: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            item: item.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn cost_center(mut self, cost_center: impl Into<String>) -> Self {
        self.cost_center = Some(cost_center.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update of a purchase request. `None` leaves a column unchanged.
///
/// Nullable columns take `Some(None)` to clear them. `updated_at` is stamped
/// with the current time unless set explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestUpdate {
    pub requester: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<i64>,
    pub description: Option<Option<String>>,
    pub cost_center: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<RequestStatus>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RequestUpdate {
    /// Update that only changes the status.
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when no column would change (besides `updated_at`).
    pub fn is_empty(&self) -> bool {
        self.requester.is_none()
            && self.item.is_none()
            && self.quantity.is_none()
            && self.description.is_none()
            && self.cost_center.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

/// Criteria for listing purchase requests. Results are ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub requester: Option<String>,
    pub limit: Option<u32>,
}

impl RequestFilter {
    pub fn with_status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A request together with everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDetail {
    pub request: PurchaseRequest,
    pub quotations: Vec<Quotation>,
    pub attachments: Vec<Attachment>,
    pub history: Vec<HistoryEntry>,
}
