//! Client intake row → `audit_context.yaml`.
//!
//! The intake export is a one-row CSV whose columns are fixed French labels.
//! Every labelled field must be present, non-blank, and inside its allow-list;
//! validation stops at the first offending field.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::csv::Table;
use crate::error::{IntakeError, Result};

/// Site type column.
pub const SITE_TYPE: &str = "Type de site";
/// Main technology column.
pub const TECHNOLOGY: &str = "Technologie principale";
/// Hosting type column.
pub const HOSTING: &str = "Type d'hebergement";
/// Audit mode column.
pub const AUDIT_MODE: &str = "Mode d'audit";
/// Downtime tolerance column.
pub const DOWNTIME_TOLERANCE: &str = "Tolerance a l'indisponibilite";
/// Audit status column.
pub const AUDIT_STATUS: &str = "Statut audit";

/// Allowed values per field, in validation order.
pub const ALLOWED_VALUES: &[(&str, &[&str])] = &[
    (SITE_TYPE, &["vitrine", "ecommerce", "applicatif"]),
    (
        TECHNOLOGY,
        &["WordPress", "Symfony", "Laravel", "Node.js", "Aucune"],
    ),
    (HOSTING, &["VPS", "Mutualise", "Cloud managé", "Dedie"]),
    (AUDIT_MODE, &["lecture seule", "complet"]),
    (DOWNTIME_TOLERANCE, &["faible", "moyen", "eleve"]),
    (AUDIT_STATUS, &["en attente", "en cours", "termine", "refuse"]),
];

/// Normalizes a column label: trims it and straightens typographic quotes.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .replace('\u{2019}', "'")
        .replace(['\u{201c}', '\u{201d}'], "\"")
}

/// One intake row keyed by normalized column label, values trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRow {
    fields: HashMap<String, String>,
}

impl ClientRow {
    /// Builds a row from `(label, value)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (normalize_key(k), v.trim().to_string()))
                .collect(),
        }
    }

    /// Takes the first data row of CSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or has no data row.
    pub fn from_csv(text: &str) -> Result<Self> {
        let table = Table::parse(text)?;
        let record = table.record(0).ok_or(IntakeError::EmptyCsv)?;
        Ok(Self::from_pairs(record))
    }

    /// Reads the first data row of a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or is empty.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| IntakeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(&text)
    }

    /// Value of a normalized field label.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Checks every allow-listed field, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingField`], [`IntakeError::EmptyField`] or
    /// [`IntakeError::ForbiddenValue`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, allowed) in ALLOWED_VALUES {
            let value = self
                .get(field)
                .ok_or_else(|| IntakeError::MissingField(field.to_string()))?;
            if value.is_empty() {
                return Err(IntakeError::EmptyField(field.to_string()));
            }
            if !allowed.contains(&value) {
                return Err(IntakeError::ForbiddenValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        Ok(())
    }

    /// Value of a field that [`ClientRow::validate`] has already checked.
    fn field(&self, field: &str) -> String {
        self.get(field).unwrap_or_default().to_string()
    }
}

/// Site description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    /// Site type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Main technology.
    pub technologie: String,
    /// Hosting type.
    pub hebergement: String,
}

/// Audit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Audit mode.
    pub mode: String,
    /// Tolerance to downtime during the audit.
    pub downtime_tolerance: String,
    /// Audit status.
    pub status: String,
}

/// Provenance of the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMeta {
    /// Always `csv`.
    pub source: String,
}

/// The `audit_context.yaml` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    /// Site description.
    pub site: SiteContext,
    /// Audit settings.
    pub audit: AuditSettings,
    /// Provenance.
    pub meta: ContextMeta,
}

impl AuditContext {
    /// Validates `row` and projects it into a context.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; no context is built from an
    /// invalid row.
    pub fn from_row(row: &ClientRow) -> Result<Self> {
        row.validate()?;
        Ok(Self {
            site: SiteContext {
                kind: row.field(SITE_TYPE),
                technologie: row.field(TECHNOLOGY),
                hebergement: row.field(HOSTING),
            },
            audit: AuditSettings {
                mode: row.field(AUDIT_MODE),
                downtime_tolerance: row.field(DOWNTIME_TOLERANCE),
                status: row.field(AUDIT_STATUS),
            },
            meta: ContextMeta {
                source: "csv".to_string(),
            },
        })
    }

    /// Serializes the context as YAML, keys in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the context as YAML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|source| IntakeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "audit context written");
        Ok(())
    }
}
