//! Resolution of a property bag into a validated [`JobConfig`].
//!
//! Each field is described by a [`FieldRule`] in [`RULES`]; the resolver
//! walks the table once, collecting every violated constraint, then resolves
//! the enumerated fields to their typed variants. Either all
//! rules pass and a `JobConfig` is built, or the caller gets a
//! [`ValidationReport`] listing every problem. Keys outside the table are
//! ignored.

use serde::Serialize;

use crate::job::{JobConfig, JobConfigParts, OutputFormat, SaveMode};
use crate::keys::{Field, KeyNamespace};
use crate::properties::PropertyBag;
use crate::validate::{ValidationError, ValidationReport, ValidationResult};
use crate::{DEFAULT_CATALOG_NAME, OUTPUT_PATH_SCHEME};

/// Constraint applied to a present, non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any non-empty string.
    Any,
    /// Exact membership in a fixed set.
    OneOf(&'static [&'static str]),
    /// Structural prefix match; the remainder is not inspected.
    Prefix(&'static str),
}

impl Constraint {
    /// Check `value`, returning the expectation it failed to meet.
    fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Constraint::Any => Ok(()),
            Constraint::OneOf(allowed) if allowed.contains(&value) => Ok(()),
            Constraint::OneOf(allowed) => Err(format!("is not one of {}", allowed.join("|"))),
            Constraint::Prefix(prefix) if value.starts_with(prefix) => Ok(()),
            Constraint::Prefix(prefix) => Err(format!("must begin with '{}'", prefix)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Constraint::Any => "non-empty".to_string(),
            Constraint::OneOf(allowed) => format!("one of {}", allowed.join("|")),
            Constraint::Prefix(prefix) => format!("starts with {}", prefix),
        }
    }
}

/// How one field is read from the property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub required: bool,
    pub constraint: Constraint,
    pub default: Option<&'static str>,
}

/// The rule table, in resolution (and error reporting) order.
pub const RULES: [FieldRule; 8] = [
    FieldRule {
        field: Field::Keyspace,
        required: true,
        constraint: Constraint::Any,
        default: None,
    },
    FieldRule {
        field: Field::InputTable,
        required: true,
        constraint: Constraint::Any,
        default: None,
    },
    FieldRule {
        field: Field::Host,
        required: true,
        constraint: Constraint::Any,
        default: None,
    },
    FieldRule {
        field: Field::OutputFormat,
        required: true,
        constraint: Constraint::OneOf(&OutputFormat::NAMES),
        default: None,
    },
    FieldRule {
        field: Field::SaveMode,
        required: true,
        constraint: Constraint::OneOf(&SaveMode::NAMES),
        default: None,
    },
    FieldRule {
        field: Field::OutputPath,
        required: true,
        constraint: Constraint::Prefix(OUTPUT_PATH_SCHEME),
        default: None,
    },
    FieldRule {
        field: Field::CatalogName,
        required: false,
        constraint: Constraint::Any,
        default: Some(DEFAULT_CATALOG_NAME),
    },
    FieldRule {
        field: Field::Query,
        required: true,
        constraint: Constraint::Any,
        default: None,
    },
];

/// Description of one recognized key, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySpec {
    pub key: String,
    pub field: Field,
    pub required: bool,
    pub constraint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

/// Resolves property bags against the rule table for one key namespace.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    namespace: KeyNamespace,
}

impl ConfigResolver {
    /// Create a resolver reading keys below `namespace`.
    pub fn new(namespace: KeyNamespace) -> Self {
        ConfigResolver { namespace }
    }

    /// Create a resolver for the default `cassandratogcs` namespace.
    pub fn with_defaults() -> Self {
        ConfigResolver::default()
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    /// Recognized keys with their constraints, in resolution order.
    pub fn keys(&self) -> Vec<KeySpec> {
        RULES
            .iter()
            .map(|rule| KeySpec {
                key: self.namespace.key(rule.field),
                field: rule.field,
                required: rule.required,
                constraint: rule.constraint.describe(),
                default: rule.default,
            })
            .collect()
    }

    /// Resolve `properties` into a [`JobConfig`].
    ///
    /// All errors are accumulated in rule-table order. Absent and empty
    /// values are treated alike: they fail a required rule and fall back
    /// to the default of an optional one.
    pub fn resolve(&self, properties: &PropertyBag) -> ValidationResult<JobConfig> {
        let mut errors = Vec::new();
        let mut values: [Option<String>; 8] = Default::default();

        for (slot, rule) in values.iter_mut().zip(RULES.iter()) {
            let key = self.namespace.key(rule.field);
            let value = match (properties.get(&key).filter(|v| !v.is_empty()), rule.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default,
                (None, None) => {
                    if rule.required {
                        errors.push(ValidationError::MissingRequiredField { key });
                    }
                    continue;
                }
            };

            if let Err(expected) = rule.constraint.check(value) {
                errors.push(ValidationError::PatternMismatch {
                    key,
                    value: value.to_string(),
                    expected,
                });
                continue;
            }

            *slot = Some(value.to_string());
        }

        let [keyspace, input_table, host, output_format, save_mode, output_path, catalog_name, query] =
            values;

        let output_format = self.resolve_variant(
            Field::OutputFormat,
            output_format.as_deref(),
            OutputFormat::from_name,
            "OutputFormat",
            &mut errors,
        );
        let save_mode = self.resolve_variant(
            Field::SaveMode,
            save_mode.as_deref(),
            SaveMode::from_name,
            "SaveMode",
            &mut errors,
        );

        // Every field without a value has a matching error above.
        let (
            Some(keyspace),
            Some(input_table),
            Some(host),
            Some(output_format),
            Some(save_mode),
            Some(output_path),
            Some(catalog_name),
            Some(query),
        ) = (
            keyspace,
            input_table,
            host,
            output_format,
            save_mode,
            output_path,
            catalog_name,
            query,
        )
        else {
            debug_assert!(!errors.is_empty());
            tracing::debug!(
                namespace = %self.namespace,
                errors = errors.len(),
                "job configuration rejected"
            );
            return Err(ValidationReport::new(errors));
        };

        tracing::debug!(
            namespace = %self.namespace,
            ignored_keys = self.ignored_keys(properties).count(),
            "job configuration resolved"
        );

        Ok(JobConfig::from_parts(JobConfigParts {
            keyspace,
            input_table,
            host,
            output_format,
            save_mode,
            output_path,
            catalog_name,
            query,
        }))
    }

    /// Keys in `properties` that this resolver does not read.
    pub fn ignored_keys<'a>(
        &'a self,
        properties: &'a PropertyBag,
    ) -> impl Iterator<Item = &'a str> + 'a {
        properties
            .keys()
            .filter(move |key| !self.namespace.recognizes(key))
    }

    fn resolve_variant<T>(
        &self,
        field: Field,
        value: Option<&str>,
        lookup: fn(&str) -> Option<T>,
        target: &'static str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<T> {
        let value = value?;
        let resolved = lookup(value);
        if resolved.is_none() {
            errors.push(ValidationError::EnumResolutionFailure {
                key: self.namespace.key(field),
                value: value.to_string(),
                target,
            });
        }
        resolved
    }
}

/// Resolve `properties` in the default namespace.
pub fn resolve(properties: &PropertyBag) -> ValidationResult<JobConfig> {
    ConfigResolver::with_defaults().resolve(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::*;

    fn valid_bag() -> PropertyBag {
        PropertyBag::from_iter([
            (INPUT_KEYSPACE, "ks1"),
            (INPUT_TABLE, "t1"),
            (INPUT_HOST, "10.0.0.1"),
            (OUTPUT_FORMAT, "parquet"),
            (OUTPUT_SAVE_MODE, "Append"),
            (OUTPUT_PATH, "gs://bucket/out"),
            (INPUT_QUERY, "SELECT * FROM t1"),
        ])
    }

    #[test]
    fn test_rules_cover_every_field_in_order() {
        let fields: Vec<Field> = RULES.iter().map(|r| r.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_only_catalog_is_optional() {
        for rule in RULES {
            assert_eq!(rule.required, rule.field != Field::CatalogName);
            assert_eq!(rule.default.is_some(), !rule.required);
        }
    }

    #[test]
    fn test_constraint_check() {
        assert!(Constraint::Any.check("x").is_ok());
        assert!(Constraint::OneOf(&["a", "b"]).check("b").is_ok());
        assert_eq!(
            Constraint::OneOf(&["a", "b"]).check("c"),
            Err("is not one of a|b".to_string())
        );
        assert!(Constraint::Prefix("gs://").check("gs://").is_ok());
        assert_eq!(
            Constraint::Prefix("gs://").check("gs:/x"),
            Err("must begin with 'gs://'".to_string())
        );
    }

    #[test]
    fn test_resolve_valid_bag() {
        let config = resolve(&valid_bag()).unwrap();
        assert_eq!(config.keyspace(), "ks1");
        assert_eq!(config.save_mode(), SaveMode::Append);
        assert_eq!(config.output_format(), OutputFormat::Parquet);
        assert_eq!(config.catalog_name(), DEFAULT_CATALOG_NAME);
    }

    #[test]
    fn test_empty_bag_reports_every_required_key() {
        let report = resolve(&PropertyBag::new()).unwrap_err();
        let keys: Vec<&str> = report.errors().iter().map(|e| e.key()).collect();
        assert_eq!(
            keys,
            vec![
                INPUT_KEYSPACE,
                INPUT_TABLE,
                INPUT_HOST,
                OUTPUT_FORMAT,
                OUTPUT_SAVE_MODE,
                OUTPUT_PATH,
                INPUT_QUERY
            ]
        );
        assert!(report
            .errors()
            .iter()
            .all(|e| matches!(e, ValidationError::MissingRequiredField { .. })));
    }

    #[test]
    fn test_empty_catalog_falls_back_to_default() {
        let mut bag = valid_bag();
        bag.insert(INPUT_CATALOG, "");
        let config = resolve(&bag).unwrap();
        assert_eq!(config.catalog_name(), DEFAULT_CATALOG_NAME);
    }

    #[test]
    fn test_resolve_variant_reports_drift() {
        let resolver = ConfigResolver::with_defaults();
        let mut errors = Vec::new();
        let resolved: Option<SaveMode> = resolver.resolve_variant(
            Field::SaveMode,
            Some("Upsert"),
            |_| None,
            "SaveMode",
            &mut errors,
        );
        assert!(resolved.is_none());
        assert_eq!(
            errors,
            vec![ValidationError::EnumResolutionFailure {
                key: OUTPUT_SAVE_MODE.to_string(),
                value: "Upsert".to_string(),
                target: "SaveMode",
            }]
        );
    }

    #[test]
    fn test_custom_namespace() {
        let resolver = ConfigResolver::new(KeyNamespace::new("nightly"));
        let bag: PropertyBag = valid_bag()
            .iter()
            .map(|(k, v)| (k.replacen("cassandratogcs", "nightly", 1), v.to_string()))
            .collect();
        let config = resolver.resolve(&bag).unwrap();
        assert_eq!(config.input_table(), "t1");

        // Default-namespace keys are not read by this resolver.
        assert!(resolver.resolve(&valid_bag()).is_err());
    }

    #[test]
    fn test_ignored_keys() {
        let mut bag = valid_bag();
        bag.insert("unused.key", "x");
        bag.insert("spark.executor.memory", "4g");
        let resolver = ConfigResolver::with_defaults();
        let ignored: Vec<&str> = resolver.ignored_keys(&bag).collect();
        assert_eq!(ignored, vec!["spark.executor.memory", "unused.key"]);
    }

    #[test]
    fn test_keys_listing() {
        let keys = ConfigResolver::with_defaults().keys();
        assert_eq!(keys.len(), 8);
        let catalog = keys.iter().find(|k| k.field == Field::CatalogName).unwrap();
        assert_eq!(catalog.key, INPUT_CATALOG);
        assert!(!catalog.required);
        assert_eq!(catalog.default, Some("casscon"));
        let mode = keys.iter().find(|k| k.field == Field::SaveMode).unwrap();
        assert_eq!(mode.constraint, "one of Overwrite|ErrorIfExists|Append|Ignore");
    }
}
