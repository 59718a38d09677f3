//! Engine error type.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal engine errors. Non-measurable facts are never errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A profile document could not be parsed.
    #[error("malformed profile {path}: {source}")]
    Profile {
        /// Profile file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A facts or artifact document could not be parsed.
    #[error("malformed document {path}: {source}")]
    Document {
        /// Document file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The raw-audit pass found filtered facts without an expected key.
    #[error("filtered facts do not match the expected shape: missing `{0}`")]
    MissingKey(String),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
