//! Subcommand implementations.

pub mod children;
pub mod init;
pub mod requests;

use anyhow::{Context, Result};
use compras::{Store, StoreConfig};
use serde::Serialize;

use crate::OutputFormat;

fn open_store(config: &StoreConfig) -> Result<Store> {
    Store::open(config)
        .with_context(|| format!("failed to open database at {}", config.db_path().display()))
}

/// Print `value` as pretty JSON, or run `text` for the human format.
fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn format_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))
}
