//! Init command implementation.

use anyhow::Result;
use compras::StoreConfig;
use serde::Serialize;

use super::{emit, open_store};
use crate::OutputFormat;

#[derive(Serialize)]
struct InitOutput {
    path: String,
    schema_version: u32,
    requests: u64,
}

pub fn run(config: &StoreConfig, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let session = store.session()?;

    let output = InitOutput {
        path: store.path().display().to_string(),
        schema_version: store.schema_version()?,
        requests: session.count_requests()?,
    };

    emit(format, &output, |o| {
        println!("Database ready at {}", o.path);
        println!("Schema version: {}", o.schema_version);
        println!("Purchase requests: {}", o.requests);
    })
}
