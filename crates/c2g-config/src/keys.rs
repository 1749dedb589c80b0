//! Recognized property keys.
//!
//! Every field of a [`crate::JobConfig`] is read from one key of the form
//! `<namespace>.<suffix>`, e.g. `cassandratogcs.input.keyspace`.

use serde::{Deserialize, Serialize};

/// Namespace used by the Cassandra-to-GCS job template.
pub const DEFAULT_NAMESPACE: &str = "cassandratogcs";

pub const INPUT_KEYSPACE: &str = "cassandratogcs.input.keyspace";
pub const INPUT_TABLE: &str = "cassandratogcs.input.table";
pub const INPUT_HOST: &str = "cassandratogcs.input.host";
pub const OUTPUT_FORMAT: &str = "cassandratogcs.output.format";
pub const OUTPUT_SAVE_MODE: &str = "cassandratogcs.output.savemode";
pub const OUTPUT_PATH: &str = "cassandratogcs.output.path";
pub const INPUT_CATALOG: &str = "cassandratogcs.input.catalog.name";
pub const INPUT_QUERY: &str = "cassandratogcs.input.query";

/// A configuration field, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Keyspace,
    InputTable,
    Host,
    OutputFormat,
    SaveMode,
    OutputPath,
    CatalogName,
    Query,
}

impl Field {
    /// All fields in resolution order.
    pub const ALL: [Field; 8] = [
        Field::Keyspace,
        Field::InputTable,
        Field::Host,
        Field::OutputFormat,
        Field::SaveMode,
        Field::OutputPath,
        Field::CatalogName,
        Field::Query,
    ];

    /// Key suffix below the namespace.
    pub fn key_suffix(self) -> &'static str {
        match self {
            Field::Keyspace => "input.keyspace",
            Field::InputTable => "input.table",
            Field::Host => "input.host",
            Field::OutputFormat => "output.format",
            Field::SaveMode => "output.savemode",
            Field::OutputPath => "output.path",
            Field::CatalogName => "input.catalog.name",
            Field::Query => "input.query",
        }
    }

    /// Name used in summaries and serialized output.
    pub fn display_name(self) -> &'static str {
        match self {
            Field::Keyspace => "keyspace",
            Field::InputTable => "inputTable",
            Field::Host => "host",
            Field::OutputFormat => "outputFormat",
            Field::SaveMode => "saveMode",
            Field::OutputPath => "outputPath",
            Field::CatalogName => "catalogName",
            Field::Query => "query",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Key namespace; maps fields to canonical keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyNamespace(String);

impl KeyNamespace {
    /// Create a namespace. A trailing `.` is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('.') {
            prefix.pop();
        }
        KeyNamespace(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical key for a field, e.g. `cassandratogcs.input.keyspace`.
    pub fn key(&self, field: Field) -> String {
        if self.0.is_empty() {
            field.key_suffix().to_string()
        } else {
            format!("{}.{}", self.0, field.key_suffix())
        }
    }

    /// Whether `key` is one of the recognized keys in this namespace.
    pub fn recognizes(&self, key: &str) -> bool {
        Field::ALL.iter().any(|f| self.key(*f) == key)
    }
}

impl Default for KeyNamespace {
    fn default() -> Self {
        KeyNamespace::new(DEFAULT_NAMESPACE)
    }
}

impl std::fmt::Display for KeyNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
