//! File references attached to a purchase request.
//!
//! Only the name and the stored path are persisted; the file itself lives
//! wherever the caller put it.

use serde::{Deserialize, Serialize};

/// A persisted attachment (`anexos` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub request_id: i64,
    pub filename: Option<String>,
    pub filepath: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAttachment {
    pub request_id: i64,
    pub filename: Option<String>,
    pub filepath: Option<String>,
}

impl NewAttachment {
    pub fn new(request_id: i64, filename: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            request_id,
            filename: Some(filename.into()),
            filepath: Some(filepath.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentUpdate {
    pub filename: Option<Option<String>>,
    pub filepath: Option<Option<String>>,
}
