//! Deterministic rule sets, one per audit type.
//!
//! Each analyzer reads facts through [`Fact`](crate::fact::Fact) and returns
//! findings in emission order. Analyzers are pure: the same facts always yield
//! the same findings.

pub mod performance;
pub mod server;
pub mod web_security;
pub mod wordpress;

use serde_json::Value;

use crate::fact::Fact;
use crate::finding::{Finding, Findings};
use crate::profile::ProfileKind;

/// An analyzer turns a facts document into findings.
pub type Analyzer = fn(&Value) -> Findings;

/// Registered analyzers keyed by profile kind.
const ANALYZERS: [(ProfileKind, Analyzer); 4] = [
    (ProfileKind::Server, server::analyze),
    (ProfileKind::WebSecurity, web_security::analyze),
    (ProfileKind::Wordpress, wordpress::analyze),
    (ProfileKind::PerformanceResilience, performance::analyze),
];

/// Returns the analyzer registered for `kind`.
pub fn analyzer_for(kind: ProfileKind) -> Option<Analyzer> {
    ANALYZERS
        .iter()
        .find(|(registered, _)| *registered == kind)
        .map(|(_, analyzer)| *analyzer)
}

/// Runs the analyzer for `kind` on `facts`.
///
/// A kind without a registered analyzer yields no findings.
pub fn analyze(kind: ProfileKind, facts: &Value) -> Findings {
    match analyzer_for(kind) {
        Some(analyzer) => analyzer(facts),
        None => Findings::new(),
    }
}

/// Pushes `on_false` when the fact is a measured `false`, or `unmeasured` as a
/// warning when the fact is not measured or is measured but not a boolean.
/// Returns the fact for further checks.
fn check_flag<'a>(
    findings: &mut Findings,
    facts: &'a Value,
    path: &str,
    on_false: Finding,
    unmeasured: &str,
) -> Fact<'a> {
    let fact = Fact::lookup(facts, path);
    if fact.is_bool(false) {
        findings.push(on_false);
    } else if fact.is_unusable_flag() {
        findings.push(Finding::warning(unmeasured));
    }
    fact
}
