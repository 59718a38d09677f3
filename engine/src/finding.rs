//! Findings: severity levels, individual findings, and finding aggregation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed before anything else.
    Critical,
    /// Needs attention, or could not be assessed.
    Warning,
    /// A positive observation.
    Ok,
}

impl Severity {
    /// Sort rank: higher is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 3,
            Severity::Warning => 2,
            Severity::Ok => 1,
        }
    }

    /// Lowercase label, as serialized.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Ok => "ok",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Creates a critical finding.
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    /// Creates a warning finding.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Creates an ok finding.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Ok,
            message: message.into(),
        }
    }

    /// Returns true if this finding is critical.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Findings produced by one analyzer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    /// Findings in emission order until [`Findings::sort_by_severity`] runs.
    pub items: Vec<Finding>,
}

impl Findings {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a finding.
    pub fn push(&mut self, finding: Finding) {
        self.items.push(finding);
    }

    /// Sorts by descending severity rank. Equal ranks keep emission order.
    pub fn sort_by_severity(&mut self) {
        self.items
            .sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    }

    /// Number of findings with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|f| f.severity == severity).count()
    }

    /// Returns true if any finding is critical.
    pub fn has_critical(&self) -> bool {
        self.items.iter().any(Finding::is_critical)
    }

    /// Returns true if there are no findings.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the findings.
    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Findings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_descending_and_stable() {
        let mut findings = Findings::new();
        findings.push(Finding::warning("w1"));
        findings.push(Finding::ok("o1"));
        findings.push(Finding::critical("c1"));
        findings.push(Finding::warning("w2"));
        findings.push(Finding::critical("c2"));
        findings.sort_by_severity();

        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["c1", "c2", "w1", "w2", "o1"]);
    }

    #[test]
    fn serializes_lowercase_severity() {
        let text = serde_json::to_string(&Finding::critical("x")).expect("serializable");
        assert_eq!(text, r#"{"severity":"critical","message":"x"}"#);
    }
}
