//! Purchase request commands.

use anyhow::{bail, Result};
use clap::Args;
use compras::{
    NewPurchaseRequest, Priority, PurchaseRequest, RequestDetail, RequestFilter, RequestStatus,
    RequestUpdate, StoreConfig,
};
use serde::Serialize;

use super::{emit, format_price, format_time, open_store, or_dash};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Who is asking for the purchase
    #[arg(long)]
    requester: String,
    /// What should be bought
    #[arg(long)]
    item: String,
    /// How many units (defaults to 1)
    #[arg(long)]
    quantity: Option<i64>,
    /// Longer description of the item
    #[arg(long)]
    description: Option<String>,
    /// Cost center to charge
    #[arg(long)]
    cost_center: Option<String>,
    /// Low, Normal or High (defaults to Normal)
    #[arg(long)]
    priority: Option<Priority>,
    /// Initial status (defaults to TO_DO)
    #[arg(long)]
    status: Option<RequestStatus>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    requester: Option<String>,
    #[arg(long)]
    item: Option<String>,
    #[arg(long)]
    quantity: Option<i64>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cost_center: Option<String>,
    #[arg(long)]
    priority: Option<Priority>,
    /// TO_DO, IN_APPROVAL, APPROVED, REJECTED or PURCHASED
    #[arg(long)]
    status: Option<RequestStatus>,
}

#[derive(Serialize)]
struct RequestsOutput {
    requests: Vec<PurchaseRequest>,
    total: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
}

pub fn list(config: &StoreConfig, filter: &RequestFilter, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let requests = store.session()?.list_requests(filter)?;

    let output = RequestsOutput {
        total: requests.len(),
        requests,
    };

    emit(format, &output, |o| {
        if o.requests.is_empty() {
            println!("No purchase requests found.");
            return;
        }
        println!(
            "{:>6}  {:<20} {:<30} {:>5}  {:<8} {:<12} {:>16}",
            "ID", "REQUESTER", "ITEM", "QTY", "PRIORITY", "STATUS", "CREATED AT"
        );
        println!("{}", "-".repeat(107));
        for r in &o.requests {
            println!(
                "{:>6}  {:<20} {:<30} {:>5}  {:<8} {:<12} {:>16}",
                r.id,
                r.requester,
                r.item,
                r.quantity,
                r.priority,
                r.status,
                format_time(&r.created_at)
            );
        }
        println!();
        println!("Total: {} request(s)", o.total);
    })
}

pub fn show(config: &StoreConfig, id: i64, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let Some(detail) = store.session()?.request_detail(id)? else {
        bail!("purchase request {id} not found");
    };

    emit(format, &detail, print_detail)
}

pub fn create(config: &StoreConfig, args: CreateArgs, format: OutputFormat) -> Result<()> {
    let new = NewPurchaseRequest {
        requester: args.requester,
        item: args.item,
        quantity: args.quantity,
        description: args.description,
        cost_center: args.cost_center,
        priority: args.priority,
        status: args.status,
        ..NewPurchaseRequest::default()
    };

    let store = open_store(config)?;
    let request = store.with_session(|s| s.create_request(&new))?;
    tracing::info!(id = request.id, "Purchase request created");

    emit(format, &request, |r| {
        println!("Created purchase request {} ({} x {})", r.id, r.quantity, r.item);
    })
}

pub fn update(config: &StoreConfig, id: i64, args: UpdateArgs, format: OutputFormat) -> Result<()> {
    let update = RequestUpdate {
        requester: args.requester,
        item: args.item,
        quantity: args.quantity,
        description: args.description.map(Some),
        cost_center: args.cost_center.map(Some),
        priority: args.priority,
        status: args.status,
        updated_at: None,
    };
    if update.is_empty() {
        bail!("nothing to update: pass at least one field");
    }

    let store = open_store(config)?;
    let Some(request) = store.with_session(|s| s.update_request(id, &update))? else {
        bail!("purchase request {id} not found");
    };

    emit(format, &request, |r| {
        println!("Updated purchase request {} (status {})", r.id, r.status);
    })
}

pub fn delete(config: &StoreConfig, id: i64, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let deleted = store.with_session(|s| s.delete_request(id))?;
    if !deleted {
        bail!("purchase request {id} not found");
    }

    emit(format, &DeleteOutput { id, deleted }, |o| {
        println!("Deleted purchase request {} and its attachments, quotations and history", o.id);
    })
}

fn print_detail(detail: &RequestDetail) {
    let r = &detail.request;
    println!("Request #{}", r.id);
    println!("  Requester:   {}", r.requester);
    println!("  Item:        {} x {}", r.quantity, r.item);
    if let Some(description) = &r.description {
        println!("  Description: {description}");
    }
    if let Some(cost_center) = &r.cost_center {
        println!("  Cost center: {cost_center}");
    }
    println!("  Priority:    {}", r.priority);
    println!("  Status:      {}", r.status);
    println!("  Created:     {}", format_time(&r.created_at));
    println!("  Updated:     {}", format_time(&r.updated_at));

    println!();
    println!("Quotations ({})", detail.quotations.len());
    for q in &detail.quotations {
        println!(
            "  #{:<5} {:<30} {:>12} x {:<4} {}",
            q.id,
            or_dash(q.supplier.as_deref()),
            format_price(q.unit_price),
            q.quantity,
            q.delivery_term.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("Attachments ({})", detail.attachments.len());
    for a in &detail.attachments {
        println!(
            "  #{:<5} {:<30} {}",
            a.id,
            or_dash(a.filename.as_deref()),
            or_dash(a.filepath.as_deref())
        );
    }

    println!();
    println!("History ({})", detail.history.len());
    for h in &detail.history {
        println!(
            "  {}  {:<20} {:<16} {}",
            format_time(&h.created_at),
            or_dash(h.action.as_deref()),
            h.author.as_deref().unwrap_or("-"),
            h.comment.as_deref().unwrap_or("")
        );
    }
}
