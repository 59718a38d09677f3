//! `audit-apply`: Applies an audit profile to a facts document.
//!
//! **Outputs** (under `<outdir>/<profile-stem>/`):
//! - `facts.filtered.json`: facts restricted to the profile scope
//! - `coverage.json`: measurement coverage
//! - `findings.json`: findings sorted by severity
//! - `report.md`: rendered report
//!
//! **Usage:**
//! ```
//! audit-apply --profile <path> [--facts <path>] [--outdir <path>]
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
use siteaudit_engine::{apply_profile, AuditPaths};

/// Apply an audit profile to collected facts.
#[derive(Parser)]
#[command(
    name = "audit-apply",
    about = "Apply an audit profile to collected facts and write the report artifacts"
)]
struct Args {
    /// Path to the collected facts document.
    #[arg(long, default_value = "facts/facts_all.json")]
    facts: PathBuf,

    /// Path to the audit profile (e.g. profiles/audit_server_v1.yaml).
    #[arg(long)]
    profile: PathBuf,

    /// Root directory for report artifacts.
    #[arg(long, default_value = "reports")]
    outdir: PathBuf,
}

fn main() -> Result<()> {
    siteaudit_clients::init_tracing();
    let args = Args::parse();

    let artifacts = apply_profile(&AuditPaths {
        facts: args.facts,
        profile: args.profile,
        out_dir: args.outdir,
    })?;

    println!("[OK] Profile applied: {}", artifacts.audit_id);
    println!("[OK] Report: {}", artifacts.report.display());
    println!("[OK] Filtered facts: {}", artifacts.filtered_facts.display());
    println!("[OK] Coverage: {}", artifacts.coverage.display());
    println!("[OK] Findings: {}", artifacts.findings.display());
    Ok(())
}
