//! Performance and resilience rule set: stack versions, rollback, backups.

use serde_json::Value;

use super::check_flag;
use crate::fact::Fact;
use crate::finding::{Finding, Findings};

/// Analyzes a performance and resilience audit.
pub fn analyze(facts: &Value) -> Findings {
    let mut findings = Findings::new();

    if Fact::lookup(facts, "stack.php_version").is_not_measured() {
        findings.push(Finding::warning("PHP version not measurable."));
    }
    if Fact::lookup(facts, "stack.mysql_version").is_not_measured() {
        findings.push(Finding::warning("MySQL/MariaDB version not measurable."));
    }

    let rollback = Fact::lookup(facts, "deployment.rollback_available");
    if rollback.is_not_measured() {
        findings.push(Finding::warning(
            "Rollback not measurable (check snapshots or blue-green deployment).",
        ));
    } else if rollback.as_str() == Some("none") {
        findings.push(Finding::critical("No rollback mechanism detected."));
    }

    check_flag(
        &mut findings,
        facts,
        "backups.backups_externalized",
        Finding::critical("Backups not externalised (total loss risk if the disk fails)."),
        "Backup externalisation not measurable.",
    );

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use serde_json::json;

    #[test]
    fn missing_rollback_and_local_backups_are_critical() {
        let facts = json!({
            "stack": {"php_version": "8.2", "mysql_version": "10.11"},
            "deployment": {"rollback_available": "none"},
            "backups": {"backups_externalized": false}
        });
        let findings = analyze(&facts);
        assert_eq!(findings.count(Severity::Critical), 2);
        assert_eq!(findings.count(Severity::Warning), 0);
    }

    #[test]
    fn unmeasured_stack_warns_per_fact() {
        let findings = analyze(&json!({"stack": {"php_version": "non_mesurable"}}));
        assert_eq!(findings.count(Severity::Warning), 4);
    }

    #[test]
    fn snapshot_rollback_is_clean() {
        let facts = json!({
            "stack": {"php_version": "8.3", "mysql_version": "8.0"},
            "deployment": {"rollback_available": "snapshots"},
            "backups": {"backups_externalized": true}
        });
        assert!(analyze(&facts).is_empty());
    }
}
