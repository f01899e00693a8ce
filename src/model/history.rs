//! Audit trail of actions taken on a purchase request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted history entry (`historico` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub request_id: i64,
    pub action: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a history entry. The timestamp defaults to now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub request_id: i64,
    pub action: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewHistoryEntry {
    pub fn new(request_id: i64, action: impl Into<String>) -> Self {
        Self {
            request_id,
            action: Some(action.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryUpdate {
    pub action: Option<Option<String>>,
    pub comment: Option<Option<String>>,
    pub author: Option<Option<String>>,
}
