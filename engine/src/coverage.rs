//! Measurement coverage of a facts document against a profile.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fact::Fact;
use crate::profile::Requirements;

/// How many declared facts were measured, split into required and optional.
///
/// `*_ok + *_missing.len() == *_total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Number of required paths.
    pub required_total: usize,
    /// Number of required paths with a measured value.
    pub required_ok: usize,
    /// Required paths that are absent or not measured.
    pub required_missing: Vec<String>,
    /// Number of optional paths.
    pub optional_total: usize,
    /// Number of optional paths with a measured value.
    pub optional_ok: usize,
    /// Optional paths that are absent or not measured.
    pub optional_missing: Vec<String>,
}

impl Coverage {
    /// Computes coverage of `facts` for the given requirements.
    ///
    /// A not-applicable fact counts as measured: the collector answered it.
    pub fn compute(facts: &Value, requirements: &Requirements) -> Self {
        let required_missing = missing_paths(facts, &requirements.required);
        let optional_missing = missing_paths(facts, &requirements.optional);
        Self {
            required_total: requirements.required.len(),
            required_ok: requirements.required.len() - required_missing.len(),
            required_missing,
            optional_total: requirements.optional.len(),
            optional_ok: requirements.optional.len() - optional_missing.len(),
            optional_missing,
        }
    }

    /// Returns true if every required fact was measured.
    pub fn required_complete(&self) -> bool {
        self.required_missing.is_empty()
    }
}

fn missing_paths(facts: &Value, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .filter(|path| Fact::lookup(facts, path).is_not_measured())
        .inspect(|path| tracing::debug!(path = %path, "fact not measured"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requirements(required: &[&str], optional: &[&str]) -> Requirements {
        Requirements {
            required: required.iter().map(|s| s.to_string()).collect(),
            optional: optional.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn counts_absent_and_sentinel_as_missing() {
        let facts = json!({
            "system": {"disk_used_percent": 92, "ram_free_percent": "non_mesurable"},
            "security_infra": {"firewall_present": false}
        });
        let req = requirements(
            &[
                "system.disk_used_percent",
                "system.ram_free_percent",
                "security_infra.firewall_present",
            ],
            &["system.uptime_hours"],
        );
        let coverage = Coverage::compute(&facts, &req);
        assert_eq!(coverage.required_total, 3);
        assert_eq!(coverage.required_ok, 2);
        assert_eq!(coverage.required_missing, vec!["system.ram_free_percent"]);
        assert_eq!(coverage.optional_total, 1);
        assert_eq!(coverage.optional_ok, 0);
        assert_eq!(coverage.optional_missing, vec!["system.uptime_hours"]);
        assert!(!coverage.required_complete());
    }

    #[test]
    fn totals_always_balance() {
        let facts = json!({"a": {"x": 1, "y": null}, "b": "non_mesurable"});
        let req = requirements(&["a.x", "a.y", "b.z", "c.w"], &["a.x", "a.q"]);
        let coverage = Coverage::compute(&facts, &req);
        assert_eq!(
            coverage.required_ok + coverage.required_missing.len(),
            coverage.required_total
        );
        assert_eq!(
            coverage.optional_ok + coverage.optional_missing.len(),
            coverage.optional_total
        );
    }

    #[test]
    fn not_applicable_counts_as_measured() {
        let facts = json!({"wordpress": {"core_version": "non_applicable"}});
        let coverage = Coverage::compute(&facts, &requirements(&["wordpress.core_version"], &[]));
        assert_eq!(coverage.required_ok, 1);
        assert!(coverage.required_complete());
    }

    #[test]
    fn serializes_in_artifact_field_order() {
        let coverage = Coverage::compute(&json!({}), &requirements(&["a.b"], &[]));
        let text = serde_json::to_string(&coverage).expect("serializable");
        assert_eq!(
            text,
            r#"{"required_total":1,"required_ok":0,"required_missing":["a.b"],"optional_total":0,"optional_ok":0,"optional_missing":[]}"#
        );
    }
}
