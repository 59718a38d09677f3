//! Property-based tests for coverage, fact filtering and finding order.
//!
//! Facts documents and profiles are generated over the real audit domains so
//! that the rule sets fire on a wide mix of measured, missing and malformed
//! values.

use proptest::prelude::*;
use proptest::sample::select;
use serde_json::{json, Value};
use serde_yaml::{Mapping, Value as YamlValue};
use siteaudit_engine::paths::get_path;
use siteaudit_engine::report::filter_facts;
use siteaudit_engine::{rules, AuditReport, Coverage, Profile, ProfileKind, NOT_MEASURED};

const DOMAINS: &[&str] = &[
    "system",
    "security_infra",
    "web_security",
    "wordpress",
    "resilience",
];

const KEYS: &[&str] = &[
    "disk_used_percent",
    "ram_free_percent",
    "cpu_load_15m",
    "firewall_present",
    "open_ports",
    "ssh_root_login",
    "ssl_certificate_present",
    "ssl_certificate_expiry_days",
    "core_version",
    "admin_count",
    "backups_present",
];

const TOKENS: &[&str] = &[
    "non_mesurable",
    "non_applicable",
    "42",
    "ubuntu",
    "NaN",
    "none",
    "755",
];

type Declaration = (&'static str, &'static str, bool);

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-10i64..200).prop_map(Value::from),
        (-5.0f64..5.0).prop_map(Value::from),
        select(TOKENS).prop_map(Value::from),
        prop::collection::vec(0u16..10_000, 0..5).prop_map(|ports| json!(ports)),
    ]
}

fn facts() -> impl Strategy<Value = Value> {
    let domain = prop_oneof![
        leaf(),
        prop::collection::btree_map(select(KEYS), leaf(), 0..8).prop_map(|keys| json!(keys)),
    ];
    prop::collection::btree_map(select(DOMAINS), domain, 0..5)
        .prop_map(|domains| json!(domains))
}

fn declarations() -> impl Strategy<Value = Vec<Declaration>> {
    prop::collection::vec((select(DOMAINS), select(KEYS), any::<bool>()), 0..12)
}

fn profile(declarations: &[Declaration]) -> Profile {
    let mut domains = Mapping::new();
    for (domain, key, required) in declarations {
        let domain = YamlValue::from(*domain);
        if domains.get(&domain).is_none() {
            domains.insert(domain.clone(), YamlValue::Mapping(Mapping::new()));
        }
        if let Some(YamlValue::Mapping(keys)) = domains.get_mut(&domain) {
            let status = if *required { "required" } else { "optional" };
            keys.insert(YamlValue::from(*key), YamlValue::from(status));
        }
    }
    Profile {
        meta: None,
        facts_required: YamlValue::Mapping(domains),
    }
}

proptest! {
    /// ok + missing == total for both lists, and every gap is a declared path.
    #[test]
    fn prop_coverage_balances(facts in facts(), declared in declarations()) {
        let requirements = profile(&declared).requirements();
        let coverage = Coverage::compute(&facts, &requirements);

        prop_assert_eq!(coverage.required_total, requirements.required.len());
        prop_assert_eq!(coverage.optional_total, requirements.optional.len());
        prop_assert_eq!(
            coverage.required_ok + coverage.required_missing.len(),
            coverage.required_total
        );
        prop_assert_eq!(
            coverage.optional_ok + coverage.optional_missing.len(),
            coverage.optional_total
        );
        prop_assert!(coverage.required_missing.iter().all(|p| requirements.required.contains(p)));
        prop_assert!(coverage.optional_missing.iter().all(|p| requirements.optional.contains(p)));
    }

    /// Filtered facts hold exactly the declared paths, each with its original
    /// value or the not-measured token.
    #[test]
    fn prop_filtered_facts_stay_in_scope(facts in facts(), declared in declarations()) {
        let requirements = profile(&declared).requirements();
        let filtered = filter_facts(&facts, &requirements);
        let token = Value::from(NOT_MEASURED);

        for path in requirements.all() {
            let kept = get_path(&filtered, path);
            match get_path(&facts, path) {
                None | Some(Value::Null) => {
                    prop_assert_eq!(kept, Some(&token), "{}", path);
                }
                original => prop_assert_eq!(kept, original, "{}", path),
            }
        }

        let declared_paths: Vec<&str> = requirements.all().collect();
        let domains = filtered.as_object().cloned().unwrap_or_default();
        for (domain, keys) in &domains {
            let keys = keys.as_object();
            prop_assert!(keys.is_some(), "domain {} is not an object", domain);
            for key in keys.into_iter().flat_map(|k| k.keys()) {
                let path = format!("{domain}.{key}");
                prop_assert!(declared_paths.contains(&path.as_str()), "undeclared {}", path);
            }
        }
    }

    /// Every rule set yields findings in non-increasing severity rank, ties
    /// kept in emission order.
    #[test]
    fn prop_findings_sorted_by_severity(facts in facts(), declared in declarations()) {
        let untagged = profile(&declared);
        for kind in ProfileKind::ALL {
            let slug = format!("audit_{}_v1", kind.tag());
            let report = AuditReport::assemble(&facts, &untagged, &slug);
            prop_assert_eq!(report.kind, Some(kind));

            let ranks: Vec<u8> = report.findings.iter().map(|f| f.severity.rank()).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] >= w[1]), "{:?}", ranks);

            let mut expected = rules::analyze(kind, &facts).items;
            expected.sort_by_key(|f| std::cmp::Reverse(f.severity.rank()));
            prop_assert_eq!(&report.findings.items, &expected);
        }
    }
}
