//! Report assembly: coverage, findings and filtered facts for one profile.

use serde_json::{Map, Value};

use crate::coverage::Coverage;
use crate::fact::NOT_MEASURED;
use crate::finding::Findings;
use crate::paths::{get_path, set_path};
use crate::profile::{Profile, ProfileKind, Requirements};
use crate::rules;

/// Recommendation emitted whenever at least one critical finding exists.
pub const PRIORITISE_CRITICAL: &str =
    "Address the **CRITICAL** items before any optimisation work.";

/// The assembled result of applying one profile to one facts document.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Audit identifier (profile file stem); names the output directory.
    pub audit_id: String,
    /// Report title (profile display name).
    pub title: String,
    /// Rule set that ran, or `None` when the profile type is unknown.
    pub kind: Option<ProfileKind>,
    /// Measurement coverage.
    pub coverage: Coverage,
    /// Findings sorted by descending severity.
    pub findings: Findings,
    /// Facts restricted to the profile's declared paths.
    pub filtered_facts: Value,
}

impl AuditReport {
    /// Applies `profile` to `facts`.
    ///
    /// Steps run in a fixed order: flatten requirements, compute coverage,
    /// run the rule set for the profile type, filter facts, sort findings.
    pub fn assemble(facts: &Value, profile: &Profile, audit_id: &str) -> Self {
        let requirements = profile.requirements();
        let coverage = Coverage::compute(facts, &requirements);

        let kind = profile.kind(audit_id);
        let mut findings = match kind {
            Some(kind) => rules::analyze(kind, facts),
            None => {
                tracing::warn!(audit_id, "no rule set for this profile type; findings left empty");
                Findings::new()
            }
        };

        let filtered_facts = filter_facts(facts, &requirements);
        findings.sort_by_severity();

        Self {
            audit_id: audit_id.to_string(),
            title: profile.display_name(audit_id).to_string(),
            kind,
            coverage,
            findings,
            filtered_facts,
        }
    }

    /// Fixed recommendations for the findings and profile type present.
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if self.findings.has_critical() {
            lines.push(PRIORITISE_CRITICAL);
        }
        if let Some(kind) = self.kind {
            lines.extend_from_slice(recommendations_for(kind));
        }
        lines
    }
}

/// Recommendations attached to every report of the given type.
pub fn recommendations_for(kind: ProfileKind) -> &'static [&'static str] {
    match kind {
        ProfileKind::Server => &[
            "Enable a firewall (UFW) and restrict exposed ports to the strict minimum.",
            "Qualify the backup strategy: externalisation, retention, and restore testing.",
        ],
        ProfileKind::WebSecurity => &[
            "Force HTTPS and monitor certificate expiry with an automatic alert.",
            "Harden permissions and review sensitive files (wp-config.php).",
        ],
        ProfileKind::Wordpress => {
            &["Update core, plugins and themes, and review administrator accounts."]
        }
        ProfileKind::PerformanceResilience => &[
            "Check PHP/MySQL versions, enable OPcache, and qualify application caching where relevant.",
            "Set up a real rollback path (snapshots or blue-green) matching the expected RTO.",
        ],
    }
}

/// Copies only the declared paths out of `facts`.
///
/// Paths that are absent or `null` are written as the not-measured token, so
/// every declared path appears in the output and nothing else does.
pub fn filter_facts(facts: &Value, requirements: &Requirements) -> Value {
    let mut filtered = Value::Object(Map::new());
    for path in requirements.all() {
        let value = match get_path(facts, path) {
            None | Some(Value::Null) => Value::String(NOT_MEASURED.to_string()),
            Some(value) => value.clone(),
        };
        set_path(&mut filtered, path, value);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_profile() -> Profile {
        Profile::from_yaml(
            r#"
meta:
  name: Server audit
facts_required:
  system:
    disk_used_percent: required
  security_infra:
    firewall_present: required
    open_ports: optional
"#,
        )
        .expect("valid profile")
    }

    #[test]
    fn filtered_facts_never_leak_undeclared_paths() {
        let facts = json!({
            "system": {"disk_used_percent": 50, "hostname": "web-01"},
            "security_infra": {"firewall_present": true},
            "secrets": {"db_password": "hunter2"}
        });
        let requirements = server_profile().requirements();
        let filtered = filter_facts(&facts, &requirements);
        assert_eq!(
            filtered,
            json!({
                "system": {"disk_used_percent": 50},
                "security_infra": {"firewall_present": true, "open_ports": "non_mesurable"}
            })
        );
    }

    #[test]
    fn assemble_sorts_and_uses_slug_dispatch() {
        let facts = json!({"system": {"disk_used_percent": 95}});
        let report = AuditReport::assemble(&facts, &server_profile(), "audit_server_v1");
        assert_eq!(report.kind, Some(ProfileKind::Server));
        assert_eq!(report.title, "Server audit");
        let ranks: Vec<u8> = report.findings.iter().map(|f| f.severity.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
        assert!(report.findings.items[0].is_critical());
    }

    #[test]
    fn unknown_type_yields_no_findings() {
        let report = AuditReport::assemble(&json!({}), &server_profile(), "audit_mail_v1");
        assert_eq!(report.kind, None);
        assert!(report.findings.is_empty());
        assert!(report.recommendations().is_empty());
        assert_eq!(report.coverage.required_total, 2);
    }

    #[test]
    fn recommendations_follow_severity_and_type() {
        let facts = json!({"security_infra": {"firewall_present": false}});
        let report = AuditReport::assemble(&facts, &server_profile(), "audit_server_v1");
        let recommendations = report.recommendations();
        assert_eq!(recommendations[0], PRIORITISE_CRITICAL);
        assert_eq!(recommendations.len(), 3);
    }
}
