//! Cassandra-to-GCS common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The unified error type with stable codes and remediation hints
//! - Structured (JSON) error reporting for automation
//! - Report format selection for CLI output

pub mod error;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use output::ReportFormat;

/// Version of the JSON payloads emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";
