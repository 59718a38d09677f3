//! Shared thresholds and allow-lists.
//!
//! Both the rule sets and the raw-audit pass classify facts through these
//! functions, so the two views of the same fact cannot drift apart.

use crate::finding::Severity;

/// Disk usage (percent used) at or above which the disk is critical.
pub const DISK_CRITICAL_PERCENT: i64 = 90;
/// Disk usage (percent used) at or above which the disk is a warning.
pub const DISK_WARNING_PERCENT: i64 = 80;
/// Disk usage (percent used) below which the disk is reported as comfortable.
pub const DISK_COMFORTABLE_PERCENT: i64 = 70;

/// Free memory (percent) below which memory is critical.
pub const RAM_FREE_CRITICAL_PERCENT: i64 = 15;
/// Free memory (percent) below which memory is a warning.
pub const RAM_FREE_WARNING_PERCENT: i64 = 30;

/// 15-minute load average above which load is critical.
pub const LOAD_CRITICAL: f64 = 1.5;
/// 15-minute load average above which load is a warning.
pub const LOAD_WARNING: f64 = 1.0;

/// Days to certificate expiry below which expiry is critical.
pub const SSL_EXPIRY_CRITICAL_DAYS: i64 = 14;
/// Days to certificate expiry below which expiry is a warning.
pub const SSL_EXPIRY_WARNING_DAYS: i64 = 30;

/// Ports a web host is expected to expose.
pub const EXPECTED_PORTS: &[&str] = &["22", "80", "443", "2222"];

/// Web root modes considered normal.
pub const WEB_ROOT_MODES: &[&str] = &["755", "750", "775"];

/// `wp-config.php` modes considered too open (600 or 640 is the target).
pub const WP_CONFIG_OPEN_MODES: &[&str] = &["777", "775", "755", "744", "666", "664"];

/// Classifies disk usage.
pub fn disk_usage(percent: i64) -> Option<Severity> {
    if percent >= DISK_CRITICAL_PERCENT {
        Some(Severity::Critical)
    } else if percent >= DISK_WARNING_PERCENT {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Returns true if disk usage leaves comfortable headroom.
pub fn disk_comfortable(percent: i64) -> bool {
    percent < DISK_COMFORTABLE_PERCENT
}

/// Classifies free memory.
pub fn ram_free(percent: i64) -> Option<Severity> {
    if percent < RAM_FREE_CRITICAL_PERCENT {
        Some(Severity::Critical)
    } else if percent < RAM_FREE_WARNING_PERCENT {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Classifies the 15-minute load average.
pub fn cpu_load(load: f64) -> Option<Severity> {
    if load > LOAD_CRITICAL {
        Some(Severity::Critical)
    } else if load > LOAD_WARNING {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Classifies days remaining before certificate expiry.
pub fn ssl_expiry(days: i64) -> Option<Severity> {
    if days < SSL_EXPIRY_CRITICAL_DAYS {
        Some(Severity::Critical)
    } else if days < SSL_EXPIRY_WARNING_DAYS {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Returns the ports outside [`EXPECTED_PORTS`], sorted and deduplicated.
pub fn unexpected_ports<I, S>(ports: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut unexpected: Vec<String> = ports
        .into_iter()
        .map(Into::into)
        .filter(|port| !EXPECTED_PORTS.contains(&port.as_str()))
        .collect();
    unexpected.sort();
    unexpected.dedup();
    unexpected
}

/// Approximate Ubuntu LTS check.
///
/// LTS releases are published in April of even years (`22.04`, `24.04`, and
/// point releases such as `22.04.3`). This is a naming heuristic only: it does
/// not consult the actual support calendar.
pub fn ubuntu_is_lts(version: &str) -> bool {
    let mut parts = version.trim().split('.');
    let year = parts.next().and_then(|y| y.parse::<u32>().ok());
    let month = parts.next();
    matches!((year, month), (Some(year), Some("04")) if year % 2 == 0)
}
