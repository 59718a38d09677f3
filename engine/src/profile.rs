//! Audit profiles: which facts an audit type requires, and which rule set runs.
//!
//! A profile is a YAML document:
//!
//! ```yaml
//! meta:
//!   name: Audit serveur
//!   type: server
//! facts_required:
//!   system:
//!     disk_used_percent: required
//!     uptime_hours: optional
//! ```
//!
//! `meta.type` selects the rule set. Untagged profiles fall back to the file
//! stem convention (`audit_server_v1.yaml` → server).

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::EngineError;

/// The status string that marks a fact as required. Anything else is optional.
pub const REQUIRED: &str = "required";

/// Audit types with a registered rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    /// Host-level security and capacity.
    Server,
    /// TLS, HTTPS redirection and file permissions.
    WebSecurity,
    /// WordPress core, plugins and accounts.
    Wordpress,
    /// Stack versions, rollback and backup externalisation.
    PerformanceResilience,
}

impl ProfileKind {
    /// Every kind, in dispatch order.
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::Server,
        ProfileKind::WebSecurity,
        ProfileKind::Wordpress,
        ProfileKind::PerformanceResilience,
    ];

    /// The tag used in `meta.type`.
    pub fn tag(self) -> &'static str {
        match self {
            ProfileKind::Server => "server",
            ProfileKind::WebSecurity => "web_security",
            ProfileKind::Wordpress => "wordpress",
            ProfileKind::PerformanceResilience => "performance_resilience",
        }
    }

    /// Parses a `meta.type` tag. Hyphens and underscores are interchangeable
    /// and case is ignored, so `web-security` and `web_security` are the same.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Infers the kind from a profile file stem such as `audit_server_v1`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| slug.contains(&format!("audit_{}", kind.tag())))
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Profile metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileMeta {
    /// Display name used as the report title.
    pub name: Option<String>,
    /// Explicit audit type tag.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A loaded audit profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    /// Metadata block.
    #[serde(default)]
    pub meta: Option<ProfileMeta>,
    /// `domain → {fact → status}` requirement map, kept as raw YAML so malformed
    /// fragments can be skipped instead of rejected.
    #[serde(default)]
    pub facts_required: Value,
}

/// The resolved identity of a profile file.
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    /// The parsed document.
    pub profile: Profile,
    /// File stem; also the audit identifier used for the output directory.
    pub slug: String,
}

/// Required and optional fact paths, in profile order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Paths whose status is `required`.
    pub required: Vec<String>,
    /// Every other declared path.
    pub optional: Vec<String>,
}

impl Requirements {
    /// Required paths followed by optional paths.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(String::as_str)
    }
}

impl Profile {
    /// Parses a profile from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for a profile.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null, which means an empty profile.
        let value: Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
    }

    /// Display name, falling back to `fallback` (usually the file stem).
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.meta
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or(fallback)
    }

    /// Resolves the rule set for this profile.
    ///
    /// An explicit `meta.type` tag wins; a tag that names no known kind yields
    /// `None` rather than falling back to the slug.
    pub fn kind(&self, slug: &str) -> Option<ProfileKind> {
        match self.meta.as_ref().and_then(|m| m.kind.as_deref()) {
            Some(tag) => ProfileKind::from_tag(tag),
            None => ProfileKind::from_slug(slug),
        }
    }

    /// Flattens `facts_required` into dotted paths.
    ///
    /// Domains whose value is not a mapping are skipped. A status equal to
    /// [`REQUIRED`] places the path in the required list; every other status,
    /// typos included, places it in the optional list.
    pub fn requirements(&self) -> Requirements {
        let mut requirements = Requirements::default();
        let Some(domains) = self.facts_required.as_mapping() else {
            return requirements;
        };

        for (domain, keys) in domains {
            let (Some(domain), Some(keys)) = (key_text(domain), keys.as_mapping()) else {
                continue;
            };
            for (key, status) in keys {
                let Some(key) = key_text(key) else {
                    continue;
                };
                let path = format!("{domain}.{key}");
                if status.as_str() == Some(REQUIRED) {
                    requirements.required.push(path);
                } else {
                    requirements.optional.push(path);
                }
            }
        }
        requirements
    }
}

impl LoadedProfile {
    /// Reads and parses a profile file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid profile.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile = Profile::from_yaml(&text).map_err(|source| EngineError::Profile {
            path: path.to_path_buf(),
            source,
        })?;
        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { profile, slug })
    }
}

/// Renders a scalar YAML key as text.
fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: &str = r#"
meta:
  name: Audit serveur
  type: server
facts_required:
  system:
    disk_used_percent: required
    uptime_hours: optional
  security_infra:
    firewall_present: required
    open_ports: requried
  notes: "free text, not a mapping"
"#;

    #[test]
    fn flattens_in_document_order() {
        let profile = Profile::from_yaml(SERVER).expect("valid profile");
        let req = profile.requirements();
        assert_eq!(
            req.required,
            vec!["system.disk_used_percent", "security_infra.firewall_present"]
        );
        assert_eq!(
            req.optional,
            vec!["system.uptime_hours", "security_infra.open_ports"]
        );
    }

    #[test]
    fn non_mapping_domains_are_skipped() {
        let profile = Profile::from_yaml(SERVER).expect("valid profile");
        assert!(profile.requirements().all().all(|p| !p.starts_with("notes")));
    }

    #[test]
    fn missing_sections_yield_empty_requirements() {
        let profile = Profile::from_yaml("meta:\n  name: Empty\nfacts_required:\n")
            .expect("valid profile");
        assert_eq!(profile.requirements(), Requirements::default());
        let empty = Profile::from_yaml("").expect("empty document");
        assert_eq!(empty.requirements(), Requirements::default());
    }

    #[test]
    fn explicit_tag_wins_over_slug() {
        let profile = Profile::from_yaml(SERVER).expect("valid profile");
        assert_eq!(
            profile.kind("audit_wordpress_v1"),
            Some(ProfileKind::Server)
        );
    }

    #[test]
    fn slug_fallback_for_untagged_profiles() {
        let profile = Profile::from_yaml("facts_required: {}").expect("valid profile");
        assert_eq!(
            profile.kind("audit_web_security_v2"),
            Some(ProfileKind::WebSecurity)
        );
        assert_eq!(
            profile.kind("audit_performance_resilience"),
            Some(ProfileKind::PerformanceResilience)
        );
        assert_eq!(profile.kind("audit_mail_v1"), None);
    }

    #[test]
    fn hyphenated_tags_resolve() {
        assert_eq!(
            ProfileKind::from_tag("web-security"),
            Some(ProfileKind::WebSecurity)
        );
        assert_eq!(
            ProfileKind::from_tag(" Performance-Resilience "),
            Some(ProfileKind::PerformanceResilience)
        );
        let profile =
            Profile::from_yaml("meta:\n  type: web-security\n").expect("valid profile");
        assert_eq!(
            profile.kind("audit_server_v1"),
            Some(ProfileKind::WebSecurity)
        );
    }

    #[test]
    fn unknown_tag_is_explicitly_unknown() {
        let profile =
            Profile::from_yaml("meta:\n  type: mail\n").expect("valid profile");
        assert_eq!(profile.kind("audit_server_v1"), None);
    }

    #[test]
    fn display_name_falls_back_to_slug() {
        let profile = Profile::from_yaml("facts_required: {}").expect("valid profile");
        assert_eq!(profile.display_name("audit_server_v1"), "audit_server_v1");
    }
}
