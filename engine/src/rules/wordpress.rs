//! WordPress rule set.

use serde_json::Value;

use crate::fact::Fact;
use crate::finding::{Finding, Findings};

/// Analyzes a WordPress audit.
///
/// Without a measured core version nothing else about the install can be
/// trusted, so a single warning is emitted and the remaining checks are skipped.
pub fn analyze(facts: &Value) -> Findings {
    let mut findings = Findings::new();

    let core = Fact::lookup(facts, "wordpress.core_version");
    if core.is_not_measured() {
        findings.push(Finding::warning(
            "WordPress not measurable: WP-CLI or application access required.",
        ));
        return findings;
    }

    let outdated = Fact::lookup(facts, "wordpress.outdated_plugins");
    if outdated != Fact::NotApplicable {
        match outdated.as_int() {
            Some(count) if count > 0 => {
                findings.push(Finding::warning(format!("Plugins not up to date: {count}.")))
            }
            Some(_) => {}
            None => findings.push(Finding::warning("Outdated plugins not measurable.")),
        }
    }

    let admins = Fact::lookup(facts, "wordpress.admin_count");
    if admins != Fact::NotApplicable {
        match admins.as_int() {
            Some(0) => {
                findings.push(Finding::critical("No administrator account detected (abnormal)."))
            }
            Some(_) => {}
            None => findings.push(Finding::warning("Administrator count not measurable.")),
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use serde_json::json;

    #[test]
    fn unmeasured_core_short_circuits() {
        let facts = json!({"wordpress": {"core_version": "non_mesurable", "admin_count": 0}});
        let findings = analyze(&facts);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.items[0].severity, Severity::Warning);
    }

    #[test]
    fn outdated_plugins_and_missing_admins() {
        let facts = json!({
            "wordpress": {"core_version": "6.5.2", "outdated_plugins": "3", "admin_count": 0}
        });
        let findings = analyze(&facts);
        assert_eq!(findings.count(Severity::Warning), 1);
        assert_eq!(findings.count(Severity::Critical), 1);
        assert!(findings.items[0].message.contains('3'));
    }

    #[test]
    fn up_to_date_install_is_clean() {
        let facts = json!({
            "wordpress": {"core_version": "6.5.2", "outdated_plugins": 0, "admin_count": 2}
        });
        assert!(analyze(&facts).is_empty());
    }

    #[test]
    fn unmeasured_counts_warn_per_fact() {
        let facts = json!({
            "wordpress": {
                "core_version": "6.5.2",
                "outdated_plugins": "non_mesurable",
                "admin_count": "several"
            }
        });
        let findings = analyze(&facts);
        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Outdated plugins not measurable.",
                "Administrator count not measurable."
            ]
        );
        assert!(!findings.has_critical());
    }

    #[test]
    fn not_applicable_counts_are_skipped() {
        let facts = json!({
            "wordpress": {
                "core_version": "6.5.2",
                "outdated_plugins": "non_applicable",
                "admin_count": "non_applicable"
            }
        });
        assert!(analyze(&facts).is_empty());
    }
}
