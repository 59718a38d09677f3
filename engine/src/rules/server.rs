//! Server rule set: firewall, exposed ports, SSH, capacity, OS support, backups.

use serde_json::Value;

use super::check_flag;
use crate::fact::{display_value, Fact};
use crate::finding::{Finding, Findings, Severity};
use crate::thresholds;

/// Analyzes a server audit.
pub fn analyze(facts: &Value) -> Findings {
    let mut findings = Findings::new();

    check_flag(
        &mut findings,
        facts,
        "security_infra.firewall_present",
        Finding::critical("Firewall inactive (UFW): unfiltered network exposure on the server."),
        "Firewall not measurable: UFW state unknown.",
    );
    check_open_ports(facts, &mut findings);
    check_ssh_root(facts, &mut findings);
    check_disk(facts, &mut findings);
    check_ram(facts, &mut findings);
    check_load(facts, &mut findings);
    check_os_support(facts, &mut findings);
    check_backups(facts, &mut findings);

    findings
}

fn check_open_ports(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "security_infra.open_ports");
    match fact.as_list() {
        Some(ports) if !ports.is_empty() => {
            let unexpected = thresholds::unexpected_ports(ports.iter().map(display_value));
            if !unexpected.is_empty() {
                findings.push(Finding::warning(format!(
                    "Open ports to justify: {}.",
                    unexpected.join(", ")
                )));
            }
        }
        _ if fact == Fact::NotApplicable => {}
        _ => findings.push(Finding::warning("Open ports not measurable.")),
    }
}

fn check_ssh_root(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "security_infra.ssh_root_login");
    if fact.is_bool(true) {
        findings.push(Finding::warning(
            "SSH root login allowed: disable it and use keys with sudo.",
        ));
    } else if fact.is_unusable_flag() {
        findings.push(Finding::warning("SSH root login status not measurable."));
    }
}

fn check_disk(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "system.disk_used_percent");
    if fact == Fact::NotApplicable {
        return;
    }
    match fact.as_int() {
        Some(disk) => match thresholds::disk_usage(disk) {
            Some(Severity::Critical) => findings.push(Finding::critical(format!(
                "Disk saturated: {disk}% (services and logs may stop)."
            ))),
            Some(_) => findings.push(Finding::warning(format!(
                "Disk usage high: {disk}% (alert threshold is {}%).",
                thresholds::DISK_WARNING_PERCENT
            ))),
            None => {}
        },
        None => findings.push(Finding::warning("Disk usage not measurable.")),
    }
}

fn check_ram(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "system.ram_free_percent");
    if fact == Fact::NotApplicable {
        return;
    }
    match fact.as_int() {
        Some(ram) => match thresholds::ram_free(ram) {
            Some(Severity::Critical) => findings.push(Finding::critical(format!(
                "Free memory low: {ram}% (out-of-memory risk)."
            ))),
            Some(_) => findings.push(Finding::warning(format!("Free memory moderate: {ram}%."))),
            None => {}
        },
        None => findings.push(Finding::warning("Free memory not measurable.")),
    }
}

fn check_load(facts: &Value, findings: &mut Findings) {
    let fact = Fact::lookup(facts, "system.cpu_load_15m");
    if fact == Fact::NotApplicable {
        return;
    }
    match fact.as_float() {
        Some(load) => match thresholds::cpu_load(load) {
            Some(Severity::Critical) => {
                findings.push(Finding::critical(format!("15-minute load high: {load}.")))
            }
            Some(_) => findings.push(Finding::warning(format!("15-minute load notable: {load}."))),
            None => {}
        },
        None => findings.push(Finding::warning("15-minute CPU load not measurable.")),
    }
}

/// Flags Ubuntu releases that look like interim (non-LTS) versions.
///
/// Approximate: based on the version naming convention only.
fn check_os_support(facts: &Value, findings: &mut Findings) {
    let name = Fact::lookup(facts, "system.os_name").as_str();
    let version = Fact::lookup(facts, "system.os_version").as_str();
    if let (Some(name), Some(version)) = (name, version) {
        if name.eq_ignore_ascii_case("ubuntu") && !thresholds::ubuntu_is_lts(version) {
            findings.push(Finding::warning(format!(
                "Ubuntu {version} looks like an interim (non-LTS) release: shorter support cycle, plan maintenance."
            )));
        }
    }
}

fn check_backups(facts: &Value, findings: &mut Findings) {
    let present = check_flag(
        findings,
        facts,
        "resilience.backups_present",
        Finding::critical("Backups absent (or not detected)."),
        "Backups not measurable.",
    );
    if !present.is_bool(true) {
        return;
    }
    let location = Fact::lookup(facts, "resilience.backups_location");
    if location.is_not_measured() || location.as_str() == Some("unknown") {
        findings.push(Finding::warning(
            "Backups detected, but their location or externalisation was not measured.",
        ));
    }
}
