//! Logging infrastructure.
//!
//! Provides structured `tracing` output in text or JSON form, filtered by
//! `RUST_LOG` when set.

pub mod tracing;
