//! Validation errors and the aggregate report returned by resolution.

use serde::Serialize;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationReport>;

/// A single violated constraint, naming the offending key.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{key}: required value is missing or empty")]
    MissingRequiredField { key: String },

    #[error("{key}: value '{value}' {expected}")]
    PatternMismatch {
        key: String,
        value: String,
        expected: String,
    },

    /// The value passed the allowed-set check but has no typed variant.
    /// Indicates the two tables have drifted apart; not a user error.
    #[error("{key}: value '{value}' was accepted but has no {target} variant")]
    EnumResolutionFailure {
        key: String,
        value: String,
        target: &'static str,
    },
}

impl ValidationError {
    /// Canonical key of the offending field.
    pub fn key(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField { key }
            | ValidationError::PatternMismatch { key, .. }
            | ValidationError::EnumResolutionFailure { key, .. } => key,
        }
    }

    /// Whether this is an internal-consistency defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ValidationError::EnumResolutionFailure { .. })
    }
}

/// Every constraint violated by one property bag, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        ValidationReport { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors reported against one key.
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.key() == key)
    }

    /// Whether any error is an internal-consistency defect.
    pub fn has_internal_defect(&self) -> bool {
        self.errors.iter().any(ValidationError::is_internal)
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl From<ValidationReport> for c2g_common::Error {
    fn from(report: ValidationReport) -> Self {
        if report.has_internal_defect() {
            let defects: Vec<String> = report
                .errors
                .iter()
                .filter(|e| e.is_internal())
                .map(ToString::to_string)
                .collect();
            return c2g_common::Error::Internal(defects.join("; "));
        }
        c2g_common::Error::InvalidJobConfig {
            problems: report.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(key: &str) -> ValidationError {
        ValidationError::MissingRequiredField { key: key.into() }
    }

    #[test]
    fn test_error_messages_name_key() {
        let err = missing("cassandratogcs.input.host");
        assert_eq!(
            err.to_string(),
            "cassandratogcs.input.host: required value is missing or empty"
        );

        let err = ValidationError::PatternMismatch {
            key: "cassandratogcs.output.path".into(),
            value: "s3://b".into(),
            expected: "must begin with 'gs://'".into(),
        };
        assert_eq!(
            err.to_string(),
            "cassandratogcs.output.path: value 's3://b' must begin with 'gs://'"
        );
    }

    #[test]
    fn test_internal_defect() {
        assert!(!missing("k").is_internal());
        let internal = ValidationError::EnumResolutionFailure {
            key: "k".into(),
            value: "v".into(),
            target: "SaveMode",
        };
        assert!(internal.is_internal());
    }

    #[test]
    fn test_report_display_lists_all() {
        let report = ValidationReport::new(vec![missing("a.b"), missing("c.d")]);
        let text = report.to_string();
        assert!(text.starts_with("2 validation error(s)"));
        assert!(text.contains("\n  - a.b: required"));
        assert!(text.contains("\n  - c.d: required"));
        assert_eq!(report.for_key("c.d").count(), 1);
    }

    #[test]
    fn test_report_serializes_kind_tag() {
        let report = ValidationReport::new(vec![missing("a.b")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["kind"], "missing_required_field");
        assert_eq!(json["errors"][0]["key"], "a.b");
    }

    #[test]
    fn test_into_common_error() {
        let report = ValidationReport::new(vec![missing("a.b")]);
        let err: c2g_common::Error = report.into();
        assert_eq!(err.code(), 10);

        let report = ValidationReport::new(vec![
            missing("a.b"),
            ValidationError::EnumResolutionFailure {
                key: "x".into(),
                value: "y".into(),
                target: "SaveMode",
            },
        ]);
        let err: c2g_common::Error = report.into();
        assert!(matches!(err, c2g_common::Error::Internal(_)));
    }
}
