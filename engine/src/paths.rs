//! Dotted-path access into nested JSON mappings.
//!
//! A fact path such as `system.disk_used_percent` names one leaf of the facts
//! document. Every segment must be a key of an object at its level.

use serde_json::{Map, Value};

/// Resolves `path` inside `root`.
///
/// Returns `None` as soon as a segment is absent or an intermediate value is
/// not an object.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at `path` inside `root`, creating intermediate objects.
///
/// A non-object value found on the way is replaced by an empty object, so the
/// write always lands.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_leaf() {
        let facts = json!({"system": {"disk_used_percent": 42}});
        assert_eq!(
            get_path(&facts, "system.disk_used_percent"),
            Some(&json!(42))
        );
    }

    #[test]
    fn missing_segment_is_none() {
        let facts = json!({"system": {"disk_used_percent": 42}});
        assert_eq!(get_path(&facts, "system.ram_free_percent"), None);
        assert_eq!(get_path(&facts, "logs.retention_days"), None);
    }

    #[test]
    fn scalar_intermediate_is_none() {
        let facts = json!({"system": "non_mesurable"});
        assert_eq!(get_path(&facts, "system.disk_used_percent"), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut out = json!({});
        set_path(&mut out, "security_infra.firewall_present", json!(false));
        set_path(&mut out, "security_infra.open_ports", json!([22, 80]));
        assert_eq!(
            out,
            json!({"security_infra": {"firewall_present": false, "open_ports": [22, 80]}})
        );
    }

    #[test]
    fn set_replaces_scalar_on_the_way() {
        let mut out = json!({"system": 3});
        set_path(&mut out, "system.os_name", json!("ubuntu"));
        assert_eq!(out, json!({"system": {"os_name": "ubuntu"}}));
    }

    #[test]
    fn set_descends_through_replaced_levels() {
        let mut out = json!({"logs": [1, 2]});
        set_path(&mut out, "logs.rotation.enabled", json!(true));
        set_path(&mut out, "logs.rotation.days", json!(7));
        assert_eq!(out, json!({"logs": {"rotation": {"enabled": true, "days": 7}}}));
    }
}
