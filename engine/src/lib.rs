//! Site audit engine.
//!
//! Applies a declarative audit profile to a document of collected facts about
//! a hosted server or site, and produces a severity-ranked audit report.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Flatten profile requirements | [`profile`] | required / optional fact paths |
//! | Measure coverage | [`coverage`] | `coverage.json` |
//! | Run the profile's rule set | [`rules`] | `findings.json` |
//! | Restrict facts to the profile scope | [`report`] | `facts.filtered.json` |
//! | Render | [`render`] | `report.md` |
//! | Raw server audit (second stage) | [`raw`] | `<audit-id>.raw.json` |
//!
//! # Entry Point
//!
//! ```no_run
//! use siteaudit_engine::{apply_profile, AuditPaths};
//! use std::path::PathBuf;
//!
//! let paths = AuditPaths {
//!     facts: PathBuf::from("facts/facts_all.json"),
//!     profile: PathBuf::from("profiles/audit_server_v1.yaml"),
//!     out_dir: PathBuf::from("reports"),
//! };
//! let artifacts = apply_profile(&paths).expect("Failed to apply profile");
//! println!("{}", artifacts.report.display());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod coverage;
pub mod error;
pub mod fact;
pub mod finding;
pub mod paths;
pub mod profile;
pub mod raw;
pub mod render;
pub mod report;
pub mod rules;
pub mod thresholds;
pub mod writer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat, Utc};

pub use coverage::Coverage;
pub use error::EngineError;
pub use fact::{Fact, NOT_APPLICABLE, NOT_MEASURED};
pub use finding::{Finding, Findings, Severity};
pub use profile::{LoadedProfile, Profile, ProfileKind, Requirements};
pub use report::AuditReport;

/// File name of the filtered facts artifact.
pub const FILTERED_FACTS_FILE: &str = "facts.filtered.json";
/// File name of the coverage artifact.
pub const COVERAGE_FILE: &str = "coverage.json";
/// File name of the findings artifact.
pub const FINDINGS_FILE: &str = "findings.json";
/// File name of the rendered report.
pub const REPORT_FILE: &str = "report.md";

/// Inputs and output root of one profile run.
pub struct AuditPaths {
    /// Facts document (JSON).
    pub facts: PathBuf,
    /// Profile document (YAML); its file stem is the audit identifier.
    pub profile: PathBuf,
    /// Root output directory; artifacts land in `<out_dir>/<audit-id>/`.
    pub out_dir: PathBuf,
}

/// Locations of the artifacts written by [`apply_profile`].
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Audit identifier.
    pub audit_id: String,
    /// Directory holding every artifact of this audit.
    pub dir: PathBuf,
    /// Filtered facts.
    pub filtered_facts: PathBuf,
    /// Coverage summary.
    pub coverage: PathBuf,
    /// Sorted findings.
    pub findings: PathBuf,
    /// Rendered Markdown report.
    pub report: PathBuf,
}

impl Artifacts {
    fn in_dir(out_dir: &Path, audit_id: &str) -> Self {
        let dir = out_dir.join(audit_id);
        Self {
            audit_id: audit_id.to_string(),
            filtered_facts: dir.join(FILTERED_FACTS_FILE),
            coverage: dir.join(COVERAGE_FILE),
            findings: dir.join(FINDINGS_FILE),
            report: dir.join(REPORT_FILE),
            dir,
        }
    }
}

/// Loads the facts and profile, assembles the report and writes every artifact.
///
/// Re-running overwrites the artifacts of the same audit identifier and leaves
/// other audits' directories untouched.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or an artifact cannot
/// be written.
pub fn apply_profile(paths: &AuditPaths) -> Result<Artifacts> {
    let facts = writer::read_json(&paths.facts)?;
    let loaded = LoadedProfile::load(&paths.profile)?;

    let report = AuditReport::assemble(&facts, &loaded.profile, &loaded.slug);
    tracing::info!(
        audit_id = %report.audit_id,
        kind = ?report.kind,
        required = %format!("{}/{}", report.coverage.required_ok, report.coverage.required_total),
        findings = report.findings.len(),
        "profile applied"
    );

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_report(&report, &paths.out_dir, &generated_at)
}

/// Writes the artifacts of an assembled report under `<out_dir>/<audit-id>/`.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn write_report(report: &AuditReport, out_dir: &Path, generated_at: &str) -> Result<Artifacts> {
    let artifacts = Artifacts::in_dir(out_dir, &report.audit_id);

    writer::write_json(&artifacts.filtered_facts, &report.filtered_facts)?;
    writer::write_json(&artifacts.coverage, &report.coverage)?;
    writer::write_json(&artifacts.findings, &report.findings.items)?;
    writer::write_text(
        &artifacts.report,
        &render::render_markdown(report, generated_at),
    )?;

    tracing::info!(dir = %artifacts.dir.display(), "artifacts written");
    Ok(artifacts)
}

/// Builds the raw server audit from the artifacts in `<reports>/<audit_id>/`.
///
/// Writes `<reports>/<audit_id>/<audit_id>.raw.json` and returns its path.
///
/// # Errors
///
/// Returns an error if the artifacts cannot be read, the filtered facts do not
/// have the server shape, or the output cannot be written.
pub fn generate_raw(reports: &Path, audit_id: &str, language: &str) -> Result<PathBuf> {
    let dir = reports.join(audit_id);
    let facts = writer::read_json(&dir.join(FILTERED_FACTS_FILE))?;

    let coverage_path = dir.join(COVERAGE_FILE);
    let coverage: Coverage = serde_json::from_value(writer::read_json(&coverage_path)?)
        .map_err(|source| EngineError::Document {
            path: coverage_path.clone(),
            source,
        })?;

    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let raw = raw::build(&facts, coverage, audit_id, &generated_at, language)
        .with_context(|| format!("Raw audit {audit_id} cannot be built from {}", dir.display()))?;

    let out = dir.join(format!("{audit_id}.raw.json"));
    writer::write_json(&out, &raw)?;
    tracing::info!(
        path = %out.display(),
        critical = raw.analysis.findings.critical.len(),
        warning = raw.analysis.findings.warning.len(),
        "raw audit written"
    );
    Ok(out)
}
