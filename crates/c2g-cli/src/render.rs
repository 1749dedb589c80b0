//! Rendering of command payloads for stdout.

use c2g_common::{ReportFormat, SCHEMA_VERSION};
use c2g_config::resolve::KeySpec;
use c2g_config::{ConfigSnapshot, JobConfig, PropertiesPaths, ValidationError, ValidationReport};
use serde::Serialize;

/// JSON payload of `c2g validate`.
#[derive(Debug, Serialize)]
pub struct ValidationOutcome<'a> {
    pub schema_version: &'static str,
    pub valid: bool,
    pub namespace: &'a str,
    pub properties_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a JobConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_keys: Vec<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub errors: &'a [ValidationError],
}

impl<'a> ValidationOutcome<'a> {
    pub fn valid(
        namespace: &'a str,
        paths: &PropertiesPaths,
        config: &'a JobConfig,
        ignored_keys: Vec<&'a str>,
    ) -> Self {
        ValidationOutcome {
            schema_version: SCHEMA_VERSION,
            valid: true,
            namespace,
            properties_source: paths.source.to_string(),
            properties_path: paths.path.as_ref().map(|p| p.display().to_string()),
            config: Some(config),
            summary: Some(config.to_string()),
            ignored_keys,
            errors: Default::default(),
        }
    }

    pub fn invalid(
        namespace: &'a str,
        paths: &PropertiesPaths,
        report: &'a ValidationReport,
    ) -> Self {
        ValidationOutcome {
            schema_version: SCHEMA_VERSION,
            valid: false,
            namespace,
            properties_source: paths.source.to_string(),
            properties_path: paths.path.as_ref().map(|p| p.display().to_string()),
            config: None,
            summary: None,
            ignored_keys: Vec::new(),
            errors: report.errors(),
        }
    }
}

/// Render a resolved configuration.
pub fn render_config(
    outcome: &ValidationOutcome<'_>,
    format: ReportFormat,
) -> serde_json::Result<String> {
    match (format, outcome.config) {
        (ReportFormat::Json, _) | (_, None) => serde_json::to_string_pretty(outcome),
        (ReportFormat::Summary, Some(config)) => Ok(config.to_string()),
        (ReportFormat::Md, Some(config)) => {
            let mut out = String::from("| Field | Value |\n|---|---|\n");
            for (field, value) in config.summary_fields() {
                out.push_str(&format!("| {} | {} |\n", field, escape_md(value)));
            }
            Ok(out)
        }
    }
}

/// Render the recognized keys.
pub fn render_keys(keys: &[KeySpec], format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(keys),
        ReportFormat::Summary => {
            let mut out = String::new();
            for spec in keys {
                out.push_str(&format!(
                    "{} ({}, {}",
                    spec.key,
                    if spec.required { "required" } else { "optional" },
                    spec.constraint
                ));
                if let Some(default) = spec.default {
                    out.push_str(&format!(", default={}", default));
                }
                out.push_str(")\n");
            }
            Ok(out)
        }
        ReportFormat::Md => {
            let mut out =
                String::from("| Key | Required | Constraint | Default |\n|---|---|---|---|\n");
            for spec in keys {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    spec.key,
                    if spec.required { "yes" } else { "no" },
                    escape_md(&spec.constraint),
                    spec.default.unwrap_or("")
                ));
            }
            Ok(out)
        }
    }
}

/// Render a config snapshot.
pub fn render_snapshot(
    snapshot: &ConfigSnapshot,
    format: ReportFormat,
) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => snapshot.to_json(),
        ReportFormat::Summary => Ok(format!("{} {}", snapshot.short_id(), snapshot.summary)),
        ReportFormat::Md => Ok(format!(
            "| Snapshot | Value |\n|---|---|\n\
             | id | {} |\n\
             | timestamp | {} |\n\
             | namespace | {} |\n\
             | source | {} |\n\
             | ignored keys | {} |\n\
             | summary | {} |\n",
            snapshot.short_id(),
            snapshot.timestamp.to_rfc3339(),
            snapshot.namespace,
            snapshot.properties_source,
            snapshot.ignored_key_count,
            escape_md(&snapshot.summary)
        )),
    }
}

/// Escape a value for a single Markdown table cell.
fn escape_md(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}
