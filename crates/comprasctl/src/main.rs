//! comprasctl: Command-line interface for the Compras purchase-request store.
//!
//! Provides commands for creating and inspecting purchase requests and for
//! attaching quotations, file references and history entries to them.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use compras::observability::tracing::{init_tracing, LogFormat};
use compras::{RequestStatus, StoreConfig};

/// Command-line interface for the Compras purchase-request store.
#[derive(Parser)]
#[command(name = "comprasctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log line format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database
    Init,
    /// Manage purchase requests
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },
    /// Manage supplier quotations
    Quotations {
        #[command(subcommand)]
        action: QuotationsAction,
    },
    /// Manage file attachments
    Attachments {
        #[command(subcommand)]
        action: AttachmentsAction,
    },
    /// Manage the history trail
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum RequestsAction {
    /// List purchase requests
    List {
        /// Only requests with this status
        #[arg(long)]
        status: Option<RequestStatus>,
        /// Only requests from this requester
        #[arg(long)]
        requester: Option<String>,
        /// Maximum number of requests to show
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a request with its quotations, attachments and history
    Show {
        /// Request id
        id: i64,
    },
    /// Create a purchase request
    Create {
        #[command(flatten)]
        fields: commands::requests::CreateArgs,
    },
    /// Change fields of a purchase request
    Update {
        /// Request id
        id: i64,
        #[command(flatten)]
        fields: commands::requests::UpdateArgs,
    },
    /// Delete a request and everything attached to it
    Delete {
        /// Request id
        id: i64,
    },
}

#[derive(Subcommand)]
enum QuotationsAction {
    /// Add a supplier quotation to a request
    Add {
        /// Request id
        request_id: i64,
        /// Supplier name
        #[arg(long)]
        supplier: Option<String>,
        /// Price per unit
        #[arg(long)]
        unit_price: Option<f64>,
        /// Quoted quantity (defaults to 1)
        #[arg(long)]
        quantity: Option<i64>,
        /// Delivery term, e.g. "10 days"
        #[arg(long)]
        delivery_term: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a quotation
    Delete {
        /// Quotation id
        id: i64,
    },
}

#[derive(Subcommand)]
enum AttachmentsAction {
    /// Record a file reference on a request
    Add {
        /// Request id
        request_id: i64,
        /// Original file name
        #[arg(long)]
        filename: Option<String>,
        /// Where the file is stored
        #[arg(long)]
        path: Option<String>,
    },
    /// Delete an attachment record
    Delete {
        /// Attachment id
        id: i64,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Append an entry to a request's history
    Add {
        /// Request id
        request_id: i64,
        /// Action taken
        #[arg(long)]
        action: Option<String>,
        /// Who took the action
        #[arg(long)]
        author: Option<String>,
        /// Free-form comment
        #[arg(long)]
        comment: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_format);

    let store = &cli.store;
    let output = cli.output;

    match cli.command {
        Commands::Init => commands::init::run(store, output)?,
        Commands::Requests { action } => match action {
            RequestsAction::List {
                status,
                requester,
                limit,
            } => {
                let filter = compras::RequestFilter {
                    status,
                    requester,
                    limit,
                };
                commands::requests::list(store, &filter, output)?;
            }
            RequestsAction::Show { id } => commands::requests::show(store, id, output)?,
            RequestsAction::Create { fields } => commands::requests::create(store, fields, output)?,
            RequestsAction::Update { id, fields } => {
                commands::requests::update(store, id, fields, output)?;
            }
            RequestsAction::Delete { id } => commands::requests::delete(store, id, output)?,
        },
        Commands::Quotations { action } => match action {
            QuotationsAction::Add {
                request_id,
                supplier,
                unit_price,
                quantity,
                delivery_term,
                note,
            } => {
                let new = compras::NewQuotation {
                    request_id,
                    supplier,
                    unit_price,
                    quantity,
                    delivery_term,
                    note,
                };
                commands::children::add_quotation(store, &new, output)?;
            }
            QuotationsAction::Delete { id } => {
                commands::children::delete(store, commands::children::Child::Quotation, id, output)?;
            }
        },
        Commands::Attachments { action } => match action {
            AttachmentsAction::Add {
                request_id,
                filename,
                path,
            } => {
                let new = compras::NewAttachment {
                    request_id,
                    filename,
                    filepath: path,
                };
                commands::children::add_attachment(store, &new, output)?;
            }
            AttachmentsAction::Delete { id } => {
                commands::children::delete(store, commands::children::Child::Attachment, id, output)?;
            }
        },
        Commands::History { action } => match action {
            HistoryAction::Add {
                request_id,
                action,
                author,
                comment,
            } => {
                let new = compras::NewHistoryEntry {
                    request_id,
                    action,
                    author,
                    comment,
                    created_at: None,
                };
                commands::children::add_history(store, &new, output)?;
            }
        },
    }

    Ok(())
}
