//! `audit-raw`: Builds the raw server audit consumed by the report writer.
//!
//! Reads `facts.filtered.json` and `coverage.json` from
//! `<reports>/<audit-id>/` (produced by `audit-apply`) and writes
//! `<reports>/<audit-id>/<audit-id>.raw.json`.
//!
//! **Usage:**
//! ```
//! audit-raw [--reports <path>] [--audit-id <id>] [--language <code>]
//! ```

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
use siteaudit_engine::generate_raw;

/// Build the raw server audit.
#[derive(Parser)]
#[command(
    name = "audit-raw",
    about = "Build the raw server audit object for the narrative report writer"
)]
struct Args {
    /// Root directory holding the report artifacts.
    #[arg(long, default_value = "reports")]
    reports: PathBuf,

    /// Audit identifier (profile file stem) whose artifacts are read.
    #[arg(long, default_value = "audit_server_v1")]
    audit_id: String,

    /// Language the final client report must be written in.
    #[arg(long, default_value = "fr")]
    language: String,
}

fn main() -> Result<()> {
    siteaudit_clients::init_tracing();
    let args = Args::parse();

    let out = generate_raw(&args.reports, &args.audit_id, &args.language)?;

    println!("[OK] Raw audit generated: {}", out.display());
    Ok(())
}
