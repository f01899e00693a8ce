//! SQLite storage layer for purchase requests.
//!
//! Provides:
//! - Schema initialization and versioned migrations
//! - A pooled session factory ([`Store`])
//! - Unit-of-work sessions with explicit commit/rollback ([`Session`])
//! - Stateless per-table repositories that take a `&Connection`

pub mod attachments;
pub mod error;
pub mod history;
pub mod quotations;
pub mod requests;
pub mod schema;
pub mod session;
pub mod store;

pub use attachments::AttachmentRepo;
pub use error::StoreError;
pub use history::HistoryRepo;
pub use quotations::QuotationRepo;
pub use requests::RequestRepo;
pub use session::Session;
pub use store::Store;
