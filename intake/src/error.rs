//! Intake error type.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal intake and synchronisation errors.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// A file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV text is not well formed.
    #[error("malformed CSV at line {line}: {reason}")]
    Csv {
        /// 1-based line where the problem was found.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// The CSV has a header but no data row.
    #[error("CSV has no data row")]
    EmptyCsv,

    /// A required column is absent.
    #[error("missing field in CSV: '{0}'")]
    MissingField(String),

    /// A required value is blank.
    #[error("empty field: '{0}'")]
    EmptyField(String),

    /// A value is outside its allow-list.
    #[error("forbidden value for '{field}': '{value}' (allowed: {allowed:?})")]
    ForbiddenValue {
        /// Field name.
        field: String,
        /// Rejected value.
        value: String,
        /// Accepted values.
        allowed: Vec<String>,
    },

    /// The audit context could not be serialized.
    #[error("cannot serialize audit context: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The request to the workspace database could not be sent.
    #[error("request for property '{property}' failed: {source}")]
    Http {
        /// Property being updated.
        property: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The workspace database answered with a non-success status.
    #[error("update of property '{property}' rejected with status {status}: {body}")]
    Rejected {
        /// Property being updated.
        property: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },
}

/// Convenience alias for intake results.
pub type Result<T> = std::result::Result<T, IntakeError>;
