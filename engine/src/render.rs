//! Markdown rendering of an assembled audit report.
//!
//! Sections, in fixed order:
//!
//! 1. Measurement coverage
//! 2. Findings (severity)
//! 3. Retained data (filtered facts only)
//! 4. Recommendations

use std::fmt::Write as _;

use crate::finding::Findings;
use crate::report::AuditReport;

/// Renders `report` as Markdown. `generated_at` is printed under the title.
pub fn render_markdown(report: &AuditReport, generated_at: &str) -> String {
    let mut out = String::new();
    let coverage = &report.coverage;

    let _ = writeln!(out, "# {}\n", report.title);
    let _ = writeln!(out, "_Generated on {generated_at}_\n");

    out.push_str("## 1. Measurement coverage\n\n");
    let _ = writeln!(
        out,
        "- **Required measured**: {}/{}",
        coverage.required_ok, coverage.required_total
    );
    let _ = writeln!(
        out,
        "- **Optional measured**: {}/{}",
        coverage.optional_ok, coverage.optional_total
    );
    if !coverage.required_complete() {
        out.push_str("\n_Required coverage is incomplete: conclusions below are provisional._\n");
    }
    push_paths(
        &mut out,
        "Required items not measurable (blocking)",
        &coverage.required_missing,
    );
    push_paths(
        &mut out,
        "Optional items not measurable",
        &coverage.optional_missing,
    );

    out.push_str("\n## 2. Findings (severity)\n\n");
    if report.kind.is_none() {
        let _ = writeln!(
            out,
            "_No rule set is registered for the type of profile `{}`._\n",
            report.audit_id
        );
    }
    out.push_str(&findings_list(&report.findings));
    out.push('\n');

    out.push_str("\n## 3. Retained data (filtered facts)\n\n");
    out.push_str("The data below is strictly limited to the scope of this audit module.\n\n");
    out.push_str("```json\n");
    out.push_str(
        &serde_json::to_string_pretty(&report.filtered_facts).unwrap_or_else(|_| "{}".to_string()),
    );
    out.push_str("\n```\n");

    out.push_str("\n## 4. Recommendations (actions)\n\n");
    for line in report.recommendations() {
        let _ = writeln!(out, "- {line}");
    }

    out
}

/// One bullet per finding, labelled with its severity in upper case.
pub fn findings_list(findings: &Findings) -> String {
    if findings.is_empty() {
        return "- Nothing to report.".to_string();
    }
    findings
        .iter()
        .map(|f| format!("- **{}**: {}", f.severity.label().to_uppercase(), f.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_paths(out: &mut String, heading: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n### {heading}\n");
    for path in paths {
        let _ = writeln!(out, "- `{path}`");
    }
}
