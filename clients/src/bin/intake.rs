//! `audit-intake`: Turns a client intake CSV row into `audit_context.yaml`.
//!
//! **Usage:**
//! ```
//! audit-intake <client_row.csv> <output.yaml>
//! ```
//!
//! Exits non-zero on the first invalid field; no output is written then.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use siteaudit_intake::{AuditContext, ClientRow};

/// Generate an audit context from a client intake row.
#[derive(Parser)]
#[command(
    name = "audit-intake",
    about = "Validate a client intake CSV row and write audit_context.yaml"
)]
struct Args {
    /// One-row CSV export of the client intake record.
    csv: PathBuf,

    /// Output path of the audit context.
    output: PathBuf,
}

fn main() -> Result<()> {
    siteaudit_clients::init_tracing();
    let args = Args::parse();

    let row = ClientRow::load(&args.csv)?;
    let context = AuditContext::from_row(&row)
        .with_context(|| format!("Invalid intake row in {}", args.csv.display()))?;
    context.write(&args.output)?;

    println!("[OK] audit_context.yaml generated: {}", args.output.display());
    Ok(())
}
