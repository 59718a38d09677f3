//! Raw server audit: a normalized findings object for a narrative writer.
//!
//! This pass reads the filtered facts persisted by the report stage and
//! re-derives findings split into critical / warning / ok buckets, a
//! human-friendly metric projection, and a fixed instruction payload telling
//! the downstream writer how to turn the object into a client report.
//!
//! It trusts the shape produced by the server profile: an expected key that is
//! absent is a fatal [`EngineError::MissingKey`], not a degraded result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::coverage::Coverage;
use crate::error::{EngineError, Result};
use crate::fact::{display_value, Fact, NOT_MEASURED};
use crate::paths::get_path;
use crate::thresholds;

/// Scope tag written into the analysis metadata.
pub const SCOPE: &str = "server_infrastructure";

/// Instructions for the downstream narrative writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativePrompt {
    /// Always `instruction`.
    pub role: String,
    /// Intended reader of the final report.
    pub audience: String,
    /// What the writer must produce.
    pub objective: String,
    /// Ordered writing constraints.
    pub instructions: Vec<String>,
    /// Expected tone.
    pub tone: String,
    /// Language of the final report.
    pub output_language: String,
    /// Shape of the final report.
    pub output_format: String,
}

impl NarrativePrompt {
    /// The fixed payload for server audits, written in `language`.
    pub fn server(language: &str) -> Self {
        Self {
            role: "instruction".to_string(),
            audience: "non_technical_client".to_string(),
            objective: "Turn a raw server audit into a professional client report".to_string(),
            instructions: [
                "Write a clear and reassuring executive summary",
                "List priority actions by order of urgency",
                "Present the checks as a readable table",
                "Avoid unnecessary technical jargon",
                "Explain non-measurable items in simple terms",
                "Never show JSON or raw technical data in the final output",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tone: "professional, educational, decision-oriented".to_string(),
            output_language: language.to_string(),
            output_format: "structured client report".to_string(),
        }
    }
}

/// A critical or warning entry of the normalized findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodedFinding {
    /// Stable machine code, e.g. `SEC_FIREWALL_ABSENT`.
    pub code: String,
    /// Short description.
    pub message: String,
    /// Business impact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Supporting values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Why the fact could not be assessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// What to do about it.
    pub recommended_action: String,
}

/// Findings split into severity buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingBuckets {
    /// Critical entries.
    pub critical: Vec<CodedFinding>,
    /// Warning entries.
    pub warning: Vec<CodedFinding>,
    /// Positive observations.
    pub ok: Vec<String>,
}

/// Analysis metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMeta {
    /// Audit identifier.
    pub audit_id: String,
    /// Generation time, RFC 3339 UTC.
    pub generated_at: String,
    /// Always [`SCOPE`].
    pub scope: String,
}

/// Overall priority derived from the buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    /// `high` when any critical entry exists, otherwise `medium`.
    pub priority: String,
    /// One-line orientation.
    pub orientation: String,
}

/// The analysis half of the raw audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Metadata.
    pub meta: AnalysisMeta,
    /// Coverage as computed by the report stage.
    pub coverage: Coverage,
    /// Normalized findings.
    pub findings: FindingBuckets,
    /// Human-friendly metric projection.
    pub metrics: Value,
    /// Overall priority.
    pub recommendation_summary: RecommendationSummary,
}

/// The complete raw audit document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAudit {
    /// Writer instructions.
    pub ai_prompt: NarrativePrompt,
    /// Analysis payload.
    pub analysis: Analysis,
}

/// Builds the raw audit from filtered server facts and their coverage.
///
/// # Errors
///
/// Returns [`EngineError::MissingKey`] if an expected key is absent.
pub fn build(
    facts: &Value,
    coverage: Coverage,
    audit_id: &str,
    generated_at: &str,
    language: &str,
) -> Result<RawAudit> {
    let findings = bucket_findings(facts)?;
    let metrics = metrics(facts)?;

    let recommendation_summary = if findings.critical.is_empty() {
        RecommendationSummary {
            priority: "medium".to_string(),
            orientation: "Optimisations recommended".to_string(),
        }
    } else {
        RecommendationSummary {
            priority: "high".to_string(),
            orientation: "Immediate hardening required".to_string(),
        }
    };

    Ok(RawAudit {
        ai_prompt: NarrativePrompt::server(language),
        analysis: Analysis {
            meta: AnalysisMeta {
                audit_id: audit_id.to_string(),
                generated_at: generated_at.to_string(),
                scope: SCOPE.to_string(),
            },
            coverage,
            findings,
            metrics,
            recommendation_summary,
        },
    })
}

/// Resolves a key that the filtered server facts must contain.
fn require<'a>(facts: &'a Value, path: &str) -> Result<&'a Value> {
    get_path(facts, path).ok_or_else(|| EngineError::MissingKey(path.to_string()))
}

fn bucket_findings(facts: &Value) -> Result<FindingBuckets> {
    let mut buckets = FindingBuckets::default();

    require(facts, "security_infra.firewall_present")?;
    if Fact::lookup(facts, "security_infra.firewall_present").is_bool(false) {
        buckets.critical.push(CodedFinding {
            code: "SEC_FIREWALL_ABSENT".to_string(),
            message: "Firewall inactive on an Internet-facing server".to_string(),
            impact: Some("Direct exposure to network attacks".to_string()),
            details: None,
            reason: None,
            recommended_action: "Enable a firewall (UFW) and restrict ports".to_string(),
        });
    }

    // Optional: a server profile may leave open_ports out.
    if let Some(ports) = Fact::lookup(facts, "security_infra.open_ports").as_list() {
        let unexpected = thresholds::unexpected_ports(ports.iter().map(display_value));
        if !unexpected.is_empty() {
            buckets.warning.push(CodedFinding {
                code: "SEC_OPEN_PORTS".to_string(),
                message: "Open ports to justify".to_string(),
                impact: None,
                details: Some(json!(unexpected)),
                reason: None,
                recommended_action: "Close unused ports or document their use".to_string(),
            });
        }
    }

    require(facts, "system.cpu_load_15m")?;
    if Fact::lookup(facts, "system.cpu_load_15m").is_not_measured() {
        buckets.warning.push(CodedFinding {
            code: "CPU_NOT_MEASURED".to_string(),
            message: "CPU load not measurable".to_string(),
            impact: None,
            details: None,
            reason: Some("Missing tool or system permission".to_string()),
            recommended_action: "Enable CPU metrics for monitoring".to_string(),
        });
    }

    require(facts, "security_infra.ssh_root_login")?;
    if Fact::lookup(facts, "security_infra.ssh_root_login").is_bool(false) {
        buckets.ok.push("SSH root access disabled".to_string());
    }

    require(facts, "security_infra.fail2ban_present")?;
    if Fact::lookup(facts, "security_infra.fail2ban_present").is_bool(true) {
        buckets.ok.push("Fail2ban active".to_string());
    }

    require(facts, "system.disk_used_percent")?;
    let disk = Fact::lookup(facts, "system.disk_used_percent").as_int();
    if disk.is_some_and(thresholds::disk_comfortable) {
        buckets.ok.push("Comfortable disk space".to_string());
    }

    Ok(buckets)
}

fn metrics(facts: &Value) -> Result<Value> {
    let os_name = require(facts, "system.os_name")?;
    let os_version = require(facts, "system.os_version")?;
    let uptime_hours = require(facts, "system.uptime_hours")?;

    let uptime_human = match Fact::lookup(facts, "system.uptime_hours").as_int() {
        Some(hours) => format!("{} days", hours.div_euclid(24)),
        None => NOT_MEASURED.to_string(),
    };

    Ok(json!({
        "system": {
            "os": format!("{} {}", display_value(os_name), display_value(os_version)),
            "uptime_hours": uptime_hours,
            "uptime_human": uptime_human,
            "disk_used_percent": require(facts, "system.disk_used_percent")?,
            "ram_free_percent": require(facts, "system.ram_free_percent")?,
            "cpu_load_15m": require(facts, "system.cpu_load_15m")?,
        },
        "security_infra": require(facts, "security_infra")?,
        "resilience": require(facts, "resilience")?,
        "logs": require(facts, "logs")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage() -> Coverage {
        Coverage {
            required_total: 2,
            required_ok: 2,
            required_missing: Vec::new(),
            optional_total: 0,
            optional_ok: 0,
            optional_missing: Vec::new(),
        }
    }

    fn server_facts() -> Value {
        json!({
            "system": {
                "os_name": "ubuntu",
                "os_version": "24.04",
                "uptime_hours": 100,
                "disk_used_percent": 35,
                "ram_free_percent": 60,
                "cpu_load_15m": "non_mesurable"
            },
            "security_infra": {
                "firewall_present": false,
                "open_ports": [22, 80, 443, 8080],
                "ssh_root_login": false,
                "fail2ban_present": true
            },
            "resilience": {"backups_present": true},
            "logs": {"retention_days": 14}
        })
    }

    #[test]
    fn buckets_and_priority() {
        let raw = build(&server_facts(), coverage(), "audit_server_v1", "t", "fr").expect("shape");
        let findings = &raw.analysis.findings;
        let codes: Vec<&str> = findings
            .critical
            .iter()
            .chain(findings.warning.iter())
            .map(|f| f.code.as_str())
            .collect();
        assert_eq!(codes, vec!["SEC_FIREWALL_ABSENT", "SEC_OPEN_PORTS", "CPU_NOT_MEASURED"]);
        assert_eq!(findings.warning[0].details, Some(json!(["8080"])));
        assert_eq!(
            findings.ok,
            vec!["SSH root access disabled", "Fail2ban active", "Comfortable disk space"]
        );
        assert_eq!(raw.analysis.recommendation_summary.priority, "high");
        assert_eq!(raw.ai_prompt.output_language, "fr");
    }

    #[test]
    fn uptime_is_projected_in_days() {
        let raw = build(&server_facts(), coverage(), "audit_server_v1", "t", "fr").expect("shape");
        let system = &raw.analysis.metrics["system"];
        assert_eq!(system["uptime_human"], json!("4 days"));
        assert_eq!(system["os"], json!("ubuntu 24.04"));
        assert_eq!(raw.analysis.metrics["logs"], json!({"retention_days": 14}));
    }

    #[test]
    fn missing_key_fails_loudly() {
        let mut facts = server_facts();
        if let Some(infra) = facts["security_infra"].as_object_mut() {
            infra.remove("fail2ban_present");
        }
        let err = build(&facts, coverage(), "audit_server_v1", "t", "fr").expect_err("must fail");
        let missing = "security_infra.fail2ban_present";
        assert!(matches!(err, EngineError::MissingKey(ref key) if key == missing));
    }

    #[test]
    fn clean_server_is_medium_priority() {
        let mut facts = server_facts();
        facts["security_infra"]["firewall_present"] = json!(true);
        let raw = build(&facts, coverage(), "audit_server_v1", "t", "en").expect("shape");
        assert!(raw.analysis.findings.critical.is_empty());
        assert_eq!(raw.analysis.recommendation_summary.priority, "medium");
    }
}
