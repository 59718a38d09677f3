//! Select-option synchronisation with the Notion intake database.
//!
//! A referential CSV (`property,value`) lists the allowed values of every
//! select property. Each property is replaced wholesale with one PATCH request.
//! Requests run one at a time; a non-success answer stops the run.

use std::path::Path;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::csv::Table;
use crate::error::{IntakeError, Result};

/// Default API root.
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
/// API version header value.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
/// Environment variable holding the integration token.
pub const TOKEN_VAR: &str = "NOTION_TOKEN";
/// Environment variable holding the database identifier.
pub const DATABASE_VAR: &str = "NOTION_DATABASE_ID";

/// Connection settings for the workspace database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    /// Integration token (bearer).
    pub token: String,
    /// Target database identifier.
    pub database_id: String,
    /// API root, without trailing slash.
    pub api_base: String,
    /// `Notion-Version` header value.
    pub notion_version: String,
}

impl NotionConfig {
    /// Settings with the default API root and version.
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }

    /// Reads [`TOKEN_VAR`] and [`DATABASE_VAR`] through `lookup`.
    ///
    /// Binaries pass an environment lookup; tests pass a map.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingConfig`] if either value is absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(IntakeError::MissingConfig(name))
        };
        Ok(Self::new(read(TOKEN_VAR)?, read(DATABASE_VAR)?))
    }

    /// URL of the database resource.
    pub fn database_url(&self) -> String {
        format!(
            "{}/databases/{}",
            self.api_base.trim_end_matches('/'),
            self.database_id
        )
    }
}

/// Allowed values per select property, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Referential {
    /// `(property, values)` pairs.
    pub properties: Vec<(String, Vec<String>)>,
}

impl Referential {
    /// Groups the rows of a `property,value` CSV by property.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or lacks either column.
    pub fn from_csv(text: &str) -> Result<Self> {
        let table = Table::parse(text)?;
        let property_col = table
            .column("property")
            .ok_or_else(|| IntakeError::MissingField("property".to_string()))?;
        let value_col = table
            .column("value")
            .ok_or_else(|| IntakeError::MissingField("value".to_string()))?;

        let mut referential = Self::default();
        for row in &table.rows {
            let property = row
                .get(property_col)
                .ok_or_else(|| IntakeError::MissingField("property".to_string()))?;
            let value = row
                .get(value_col)
                .ok_or_else(|| IntakeError::MissingField("value".to_string()))?;
            referential.push(property, value);
        }
        Ok(referential)
    }

    /// Reads a referential CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| IntakeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(&text)
    }

    fn push(&mut self, property: &str, value: &str) {
        match self.properties.iter_mut().find(|(name, _)| name == property) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .properties
                .push((property.to_string(), vec![value.to_string()])),
        }
    }
}

/// Body of the PATCH request replacing the options of `property`.
pub fn select_options_payload(property: &str, values: &[String]) -> Value {
    let options: Vec<Value> = values.iter().map(|v| json!({ "name": v })).collect();
    json!({
        "properties": {
            property: {
                "select": { "options": options }
            }
        }
    })
}

/// Blocking client that pushes select options to the database.
pub struct SelectSync {
    config: NotionConfig,
    client: Client,
}

impl SelectSync {
    /// Creates a client for `config`.
    pub fn new(config: NotionConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Replaces the options of one select property.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Http`] if the request cannot be sent and
    /// [`IntakeError::Rejected`] with the response body on any status other
    /// than 200.
    pub fn update_property(&self, property: &str, values: &[String]) -> Result<()> {
        let response = self
            .client
            .patch(self.config.database_url())
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.notion_version)
            .json(&select_options_payload(property, values))
            .send()
            .map_err(|source| IntakeError::Http {
                property: property.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(IntakeError::Rejected {
                property: property.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        tracing::info!(property, options = values.len(), "select options updated");
        Ok(())
    }
}
