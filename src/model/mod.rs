//! Entity records for the purchase-request store.
//!
//! Every entity comes in three shapes:
//! - the persisted record (`PurchaseRequest`, `Quotation`, ...)
//! - an insert record (`New*`) whose unset fields take column defaults
//! - a patch record (`*Update`) where `None` leaves a column unchanged

pub mod attachment;
pub mod history;
pub mod quotation;
pub mod request;
pub mod status;

pub use attachment::{Attachment, AttachmentUpdate, NewAttachment};
pub use history::{HistoryEntry, HistoryUpdate, NewHistoryEntry};
pub use quotation::{NewQuotation, Quotation, QuotationUpdate};
pub use request::{NewPurchaseRequest, PurchaseRequest, RequestDetail, RequestFilter, RequestUpdate};
pub use status::{Priority, RequestStatus, UnknownVariant};
