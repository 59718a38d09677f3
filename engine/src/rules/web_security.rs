//! Web security rule set: certificate, HTTPS redirection, file permissions.

use serde_json::Value;

use super::check_flag;
use crate::fact::{display_value, Fact};
use crate::finding::{Finding, Findings, Severity};
use crate::thresholds;

/// Analyzes a web security audit.
pub fn analyze(facts: &Value) -> Findings {
    let mut findings = Findings::new();

    check_certificate(facts, &mut findings);
    check_flag(
        &mut findings,
        facts,
        "web_security.https_forced",
        Finding::warning("HTTPS not forced (no HTTP to HTTPS redirection)."),
        "HTTPS redirection not measurable.",
    );
    check_web_root(facts, &mut findings);
    check_wp_config(facts, &mut findings);

    findings
}

fn check_certificate(facts: &Value, findings: &mut Findings) {
    let present = check_flag(
        findings,
        facts,
        "web_security.ssl_certificate_present",
        Finding::critical("SSL certificate missing: site potentially unavailable or insecure."),
        "SSL certificate presence not measurable.",
    );
    if !present.is_bool(true) {
        return;
    }

    match Fact::lookup(facts, "web_security.ssl_certificate_expiry_days").as_int() {
        Some(days) => match thresholds::ssl_expiry(days) {
            Some(Severity::Critical) => findings.push(Finding::critical(format!(
                "SSL certificate expires very soon: {days} days."
            ))),
            Some(_) => findings.push(Finding::warning(format!(
                "SSL certificate expires soon: {days} days."
            ))),
            None => {}
        },
        None => findings.push(Finding::warning("SSL certificate expiry not measurable.")),
    }
}

/// Permission modes may be collected as strings (`"755"`) or bare numbers.
fn mode(fact: Fact<'_>) -> Option<String> {
    match fact.value()? {
        value @ (Value::String(_) | Value::Number(_)) => Some(display_value(value)),
        _ => None,
    }
}

fn check_web_root(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "web_security.web_root_permissions");
    if fact == Fact::NotApplicable {
        return;
    }
    match mode(fact) {
        Some(mode) if !thresholds::WEB_ROOT_MODES.contains(&mode.as_str()) => {
            findings.push(Finding::warning(format!(
                "Web root permissions unusual: {mode} (755 is typical)."
            )));
        }
        Some(_) => {}
        None => findings.push(Finding::warning("Web root permissions not measurable.")),
    }
}

fn check_wp_config(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "web_security.wp_config_permissions");
    if fact == Fact::NotApplicable {
        return;
    }
    match mode(fact) {
        Some(mode) if thresholds::WP_CONFIG_OPEN_MODES.contains(&mode.as_str()) => {
            findings.push(Finding::warning(format!(
                "wp-config.php permissions too open: {mode} (aim for 640 or 600)."
            )));
        }
        Some(_) => {}
        None => findings.push(Finding::warning("wp-config.php permissions not measurable.")),
    }
}
