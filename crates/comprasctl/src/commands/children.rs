//! Quotation, attachment and history commands.

use anyhow::{bail, Result};
use compras::{NewAttachment, NewHistoryEntry, NewQuotation, StoreConfig};
use serde::Serialize;

use super::{emit, format_price, open_store, or_dash};
use crate::OutputFormat;

/// Kinds of child records that can be deleted on their own.
#[derive(Clone, Copy, Debug)]
pub enum Child {
    Quotation,
    Attachment,
}

impl Child {
    fn label(self) -> &'static str {
        match self {
            Child::Quotation => "quotation",
            Child::Attachment => "attachment",
        }
    }
}

#[derive(Serialize)]
struct DeleteOutput {
    kind: &'static str,
    id: i64,
    deleted: bool,
}

pub fn add_quotation(config: &StoreConfig, new: &NewQuotation, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let quotation = store.with_session(|s| s.add_quotation(new))?;

    emit(format, &quotation, |q| {
        println!(
            "Added quotation {} from {} to request {} ({} x {})",
            q.id,
            or_dash(q.supplier.as_deref()),
            q.request_id,
            format_price(q.unit_price),
            q.quantity
        );
    })
}

pub fn add_attachment(config: &StoreConfig, new: &NewAttachment, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let attachment = store.with_session(|s| s.add_attachment(new))?;

    emit(format, &attachment, |a| {
        println!(
            "Attached {} to request {} (id {})",
            or_dash(a.filename.as_deref()),
            a.request_id,
            a.id
        );
    })
}

pub fn add_history(config: &StoreConfig, new: &NewHistoryEntry, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let entry = store.with_session(|s| s.add_history(new))?;

    emit(format, &entry, |h| {
        println!(
            "Recorded '{}' on request {} (id {})",
            or_dash(h.action.as_deref()),
            h.request_id,
            h.id
        );
    })
}

pub fn delete(config: &StoreConfig, kind: Child, id: i64, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let deleted = store.with_session(|s| match kind {
        Child::Quotation => s.delete_quotation(id),
        Child::Attachment => s.delete_attachment(id),
    })?;
    if !deleted {
        bail!("{} {id} not found", kind.label());
    }

    let output = DeleteOutput {
        kind: kind.label(),
        id,
        deleted,
    };
    emit(format, &output, |o| println!("Deleted {} {}", o.kind, o.id))
}
