//! `audit-sync-selects`: Replaces the select options of the intake database.
//!
//! Reads `NOTION_TOKEN` and `NOTION_DATABASE_ID` from the environment and a
//! `property,value` referential CSV, then updates every property in order.
//!
//! **Usage:**
//! ```
//! audit-sync-selects [--referential <path>]
//! ```
//!
//! Exits non-zero on the first rejected update.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use siteaudit_intake::{NotionConfig, Referential, SelectSync};

/// Synchronise select options from the referential.
#[derive(Parser)]
#[command(
    name = "audit-sync-selects",
    about = "Replace the intake database select options from a referential CSV"
)]
struct Args {
    /// Referential CSV with `property` and `value` columns.
    #[arg(long, default_value = "referential/notion_select_values.csv")]
    referential: PathBuf,
}

fn main() -> Result<()> {
    siteaudit_clients::init_tracing();
    let args = Args::parse();

    let config = NotionConfig::from_lookup(|name| std::env::var(name).ok())?;
    let referential = Referential::load(&args.referential)?;
    let sync = SelectSync::new(config);

    for (property, values) in &referential.properties {
        sync.update_property(property, values)?;
        println!("[OK] Property updated: {property}");
    }
    Ok(())
}
