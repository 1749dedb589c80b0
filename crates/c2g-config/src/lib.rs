//! Cassandra-to-GCS job configuration loading and validation.
//!
//! This crate provides:
//! - The recognized property keys and their namespace
//! - Property bag loading (properties files, `key=value` overrides)
//! - Resolution of a property bag into a validated, immutable [`JobConfig`]
//! - Config snapshots for job audit trails

pub mod job;
pub mod keys;
pub mod properties;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use job::{JobConfig, OutputFormat, SaveMode};
pub use keys::{Field, KeyNamespace, DEFAULT_NAMESPACE};
pub use properties::{PropertiesPaths, PropertiesSource, PropertyBag};
pub use resolve::{resolve, ConfigResolver};
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationReport, ValidationResult};

/// Default catalog name used when the catalog key is absent.
pub const DEFAULT_CATALOG_NAME: &str = "casscon";

/// Required scheme prefix for the output path.
pub const OUTPUT_PATH_SCHEME: &str = "gs://";
