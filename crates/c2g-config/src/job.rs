//! The validated job configuration and its typed enumerations.
//!
//! A [`JobConfig`] can only be obtained from [`crate::ConfigResolver`]; it has
//! no public constructor and no setters, so every instance satisfies the
//! field constraints checked during resolution.

use serde::Serialize;

use crate::keys::Field;

/// Write mode: how output interacts with data already at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SaveMode {
    /// Replace existing data.
    Overwrite,
    /// Fail the job if data already exists.
    ErrorIfExists,
    /// Add to existing data.
    Append,
    /// Skip the write if data already exists.
    Ignore,
}

impl SaveMode {
    /// Accepted spellings, case-sensitive. Must list exactly the names
    /// produced by [`SaveMode::as_str`].
    pub const NAMES: [&'static str; 4] = ["Overwrite", "ErrorIfExists", "Append", "Ignore"];

    pub const ALL: [SaveMode; 4] = [
        SaveMode::Overwrite,
        SaveMode::ErrorIfExists,
        SaveMode::Append,
        SaveMode::Ignore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SaveMode::Overwrite => "Overwrite",
            SaveMode::ErrorIfExists => "ErrorIfExists",
            SaveMode::Append => "Append",
            SaveMode::Ignore => "Ignore",
        }
    }

    /// Exact-match lookup by name. No case folding or trimming.
    pub fn from_name(name: &str) -> Option<SaveMode> {
        match name {
            "Overwrite" => Some(SaveMode::Overwrite),
            "ErrorIfExists" => Some(SaveMode::ErrorIfExists),
            "Append" => Some(SaveMode::Append),
            "Ignore" => Some(SaveMode::Ignore),
            _ => None,
        }
    }
}

impl std::fmt::Display for SaveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output file format written to GCS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avro,
    Parquet,
    Orc,
    Csv,
}

impl OutputFormat {
    /// Accepted spellings, case-sensitive.
    pub const NAMES: [&'static str; 4] = ["avro", "parquet", "orc", "csv"];

    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Avro,
        OutputFormat::Parquet,
        OutputFormat::Orc,
        OutputFormat::Csv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Avro => "avro",
            OutputFormat::Parquet => "parquet",
            OutputFormat::Orc => "orc",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name {
            "avro" => Some(OutputFormat::Avro),
            "parquet" => Some(OutputFormat::Parquet),
            "orc" => Some(OutputFormat::Orc),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, immutable configuration for one Cassandra-to-GCS job run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    keyspace: String,
    input_table: String,
    host: String,
    output_format: OutputFormat,
    save_mode: SaveMode,
    output_path: String,
    catalog_name: String,
    query: String,
}

/// Field values collected by the resolver. Only the resolver builds these.
pub(crate) struct JobConfigParts {
    pub keyspace: String,
    pub input_table: String,
    pub host: String,
    pub output_format: OutputFormat,
    pub save_mode: SaveMode,
    pub output_path: String,
    pub catalog_name: String,
    pub query: String,
}

impl JobConfig {
    pub(crate) fn from_parts(parts: JobConfigParts) -> Self {
        JobConfig {
            keyspace: parts.keyspace,
            input_table: parts.input_table,
            host: parts.host,
            output_format: parts.output_format,
            save_mode: parts.save_mode,
            output_path: parts.output_path,
            catalog_name: parts.catalog_name,
            query: parts.query,
        }
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn input_table(&self) -> &str {
        &self.input_table
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// The output format exactly as it appeared in the properties.
    pub fn output_format_str(&self) -> &'static str {
        self.output_format.as_str()
    }

    /// Resolved write mode, for the storage writer.
    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    /// The write mode name exactly as it appeared in the properties.
    pub fn save_mode_str(&self) -> &'static str {
        self.save_mode.as_str()
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Value of a single field as a string.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Keyspace => &self.keyspace,
            Field::InputTable => &self.input_table,
            Field::Host => &self.host,
            Field::OutputFormat => self.output_format.as_str(),
            Field::SaveMode => self.save_mode.as_str(),
            Field::OutputPath => &self.output_path,
            Field::CatalogName => &self.catalog_name,
            Field::Query => &self.query,
        }
    }

    /// Field names and values in summary order.
    pub fn summary_fields(&self) -> [(Field, &str); 8] {
        Self::SUMMARY_ORDER.map(|field| (field, self.value(field)))
    }

    const SUMMARY_ORDER: [Field; 8] = [
        Field::InputTable,
        Field::Keyspace,
        Field::OutputFormat,
        Field::OutputPath,
        Field::CatalogName,
        Field::SaveMode,
        Field::Host,
        Field::Query,
    ];
}

impl std::fmt::Display for JobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JobConfig{")?;
        for (i, (field, value)) in self.summary_fields().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.display_name(), value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobConfig {
        JobConfig::from_parts(JobConfigParts {
            keyspace: "ks1".into(),
            input_table: "t1".into(),
            host: "10.0.0.1".into(),
            output_format: OutputFormat::Parquet,
            save_mode: SaveMode::Append,
            output_path: "gs://bucket/out".into(),
            catalog_name: "casscon".into(),
            query: "SELECT * FROM t1".into(),
        })
    }

    #[test]
    fn test_save_mode_names_and_variants_in_lockstep() {
        for name in SaveMode::NAMES {
            let mode = SaveMode::from_name(name).expect("every accepted name resolves");
            assert_eq!(mode.as_str(), name);
        }
        for mode in SaveMode::ALL {
            assert!(SaveMode::NAMES.contains(&mode.as_str()));
        }
        assert_eq!(SaveMode::NAMES.len(), SaveMode::ALL.len());
    }

    #[test]
    fn test_output_format_names_and_variants_in_lockstep() {
        for name in OutputFormat::NAMES {
            let format = OutputFormat::from_name(name).expect("every accepted name resolves");
            assert_eq!(format.as_str(), name);
        }
        for format in OutputFormat::ALL {
            assert!(OutputFormat::NAMES.contains(&format.as_str()));
        }
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(SaveMode::from_name("overwrite"), None);
        assert_eq!(SaveMode::from_name(" Append"), None);
        assert_eq!(OutputFormat::from_name("Parquet"), None);
    }

    #[test]
    fn test_display_order_is_stable() {
        assert_eq!(
            sample().to_string(),
            "JobConfig{inputTable=t1, keyspace=ks1, outputFormat=parquet, \
             outputPath=gs://bucket/out, catalogName=casscon, saveMode=Append, \
             host=10.0.0.1, query=SELECT * FROM t1}"
        );
    }

    #[test]
    fn test_serialize_uses_raw_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["saveMode"], "Append");
        assert_eq!(json["outputFormat"], "parquet");
        assert_eq!(json["inputTable"], "t1");
        assert_eq!(json["catalogName"], "casscon");
    }
}
