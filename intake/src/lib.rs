//! Site audit intake.
//!
//! The collaborators around the audit engine that talk to the client intake
//! workspace:
//!
//! - [`context`]: validates a one-row intake CSV export and projects it into
//!   `audit_context.yaml`.
//! - [`notion`]: pushes the allowed select values of the intake database from a
//!   referential CSV.
//!
//! # Entry Point
//!
//! ```no_run
//! use siteaudit_intake::context::{AuditContext, ClientRow};
//! use std::path::Path;
//!
//! let row = ClientRow::load(Path::new("client_row.csv")).expect("readable intake row");
//! let context = AuditContext::from_row(&row).expect("valid intake row");
//! context.write(Path::new("audit_context.yaml")).expect("writable output");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod context;
pub mod csv;
pub mod error;
pub mod notion;

pub use context::{AuditContext, ClientRow};
pub use error::IntakeError;
pub use notion::{NotionConfig, Referential, SelectSync};
