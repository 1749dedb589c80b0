//! Report format specifications.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured JSON (default for machine consumption)
    #[default]
    Json,

    /// One-line summary for logs and quick checks
    Summary,

    /// Human-readable Markdown table
    Md,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Summary => write!(f, "summary"),
            ReportFormat::Md => write!(f, "md"),
        }
    }
}
