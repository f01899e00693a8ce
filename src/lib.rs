//! Compras: SQLite persistence for a purchase-request workflow.
//!
//! Requesters submit items, suppliers' quotations and file references are
//! attached to them, and every action taken on a request can be recorded in
//! a history trail.
//!
//! # Architecture
//!
//! - **Explicit store**: a [`storage::Store`] owns an r2d2 pool and hands out
//!   sessions; there is no global engine
//! - **Sessions**: one pooled connection per unit of work, with explicit
//!   `commit`/`rollback`
//! - **Cascading children**: quotations, attachments and history entries are
//!   deleted together with their request by SQLite foreign keys
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`model`]: Entity records, insert and patch types
//! - [`observability`]: Tracing setup
//! - [`storage`]: Schema, pool, sessions and repositories

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::StoreError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod config;
pub mod model;
pub mod observability;
pub mod storage;

pub use config::StoreConfig;
pub use model::{
    Attachment, AttachmentUpdate, HistoryEntry, HistoryUpdate, NewAttachment, NewHistoryEntry,
    NewPurchaseRequest, NewQuotation, Priority, PurchaseRequest, Quotation, QuotationUpdate,
    RequestDetail, RequestFilter, RequestStatus, RequestUpdate,
};
pub use storage::schema::now_millis;
pub use storage::{Session, Store, StoreError};
