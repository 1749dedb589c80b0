//! Error types for the Cassandra-to-GCS job tooling.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//! - Suggested actions for automation
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Job Configuration
//!   Reason: job configuration rejected with 1 problem(s): cassandratogcs.input.host: required value is missing or empty
//!   Fix: Set every required key listed above. Run 'c2g keys' to see the recognized keys.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 10,
//!   "category": "config",
//!   "message": "job configuration rejected with 1 problem(s): ...",
//!   "recoverable": true,
//!   "suggested_action": "fix_config",
//!   "context": { "problems": ["..."] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Job configuration was rejected.
    Config,
    /// Command-line input could not be interpreted.
    Input,
    /// File I/O and serialization errors.
    Io,
    /// Internal consistency defects.
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Suggested actions for automation to take in response to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Correct the job properties and resubmit.
    FixConfig,
    /// Correct the command-line invocation.
    FixArgs,
    /// Retry the operation.
    Retry,
    /// Report a bug; the input is not at fault.
    ReportBug,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::FixArgs => write!(f, "fix_args"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ReportBug => write!(f, "report_bug"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("job configuration rejected with {} problem(s): {}", .problems.len(), .problems.join("; "))]
    InvalidJobConfig { problems: Vec<String> },

    #[error("invalid properties in {path}: {message}")]
    InvalidProperties { path: String, message: String },

    #[error("invalid property override '{0}': expected key=value")]
    InvalidOverride(String),

    // Internal errors (20-29)
    #[error("internal consistency defect: {0}")]
    Internal(String),

    // I/O errors (60-69)
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration and input errors
    /// - 20-29: Internal errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidJobConfig { .. } => 10,
            Error::InvalidProperties { .. } => 11,
            Error::InvalidOverride(_) => 12,
            Error::Internal(_) => 20,
            Error::Read { .. } => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidJobConfig { .. } | Error::InvalidProperties { .. } => {
                ErrorCategory::Config
            }
            Error::InvalidOverride(_) => ErrorCategory::Input,
            Error::Internal(_) => ErrorCategory::Internal,
            Error::Read { .. } | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Internal(_))
    }

    /// Returns the suggested action for automation.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::InvalidJobConfig { .. } | Error::InvalidProperties { .. } => {
                SuggestedAction::FixConfig
            }
            Error::InvalidOverride(_) => SuggestedAction::FixArgs,
            Error::Internal(_) => SuggestedAction::ReportBug,
            Error::Read { .. } => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ReportBug,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidJobConfig { .. } => {
                "Set every required key listed above. Run 'c2g keys' to see the recognized keys."
            }
            Error::InvalidProperties { .. } => {
                "Check the properties file syntax: one key=value pair per line, '#' for comments."
            }
            Error::InvalidOverride(_) => "Pass overrides as --prop key=value.",
            Error::Internal(_) => {
                "The resolver accepted a value it cannot map. Please report this as a bug."
            }
            Error::Read { .. } => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Output serialization failed. Please report this as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidJobConfig { .. } => "Invalid Job Configuration",
            Error::InvalidProperties { .. } => "Invalid Properties File",
            Error::InvalidOverride(_) => "Invalid Property Override",
            Error::Internal(_) => "Internal Error",
            Error::Read { .. } => "Unreadable File",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for automation.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., offending keys, file path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidJobConfig { problems } => {
                context.insert("problems".to_string(), serde_json::json!(problems));
            }
            Error::InvalidProperties { path, .. } | Error::Read { path, .. } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::InvalidOverride(raw) => {
                context.insert("override".to_string(), serde_json::json!(raw));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
///
/// Job configuration errors list each problem on its own line instead of
/// the joined message.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let reason = match err {
        Error::InvalidJobConfig { problems } => {
            let mut lines = format!("{} problem(s)", problems.len());
            for problem in problems {
                lines.push_str("\n    - ");
                lines.push_str(problem);
            }
            lines
        }
        other => other.to_string(),
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {reason}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        reason = reason,
        remediation = err.remediation()
    )
}
