//! Configuration snapshots for job audit trails.
//!
//! A snapshot captures the validated configuration of one job run together
//! with where its properties came from, so a run can be traced back to its
//! inputs later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::job::JobConfig;
use crate::keys::{Field, KeyNamespace};
use crate::properties::{PropertiesPaths, PropertyBag};

/// A frozen record of one resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Key namespace the configuration was resolved from.
    pub namespace: String,

    /// Source of the properties file.
    pub properties_source: String,

    /// Path the properties were loaded from.
    #[serde(default)]
    pub properties_path: Option<String>,

    /// SHA-256 over the recognized keys and their raw values.
    pub properties_hash: String,

    /// Number of keys present but not read.
    pub ignored_key_count: usize,

    /// The validated configuration, as serialized.
    pub config: serde_json::Value,

    /// Diagnostic summary line.
    pub summary: String,
}

impl ConfigSnapshot {
    /// Create a snapshot for a resolved configuration.
    pub fn new(
        config: &JobConfig,
        properties: &PropertyBag,
        paths: &PropertiesPaths,
        namespace: &KeyNamespace,
    ) -> Result<Self, serde_json::Error> {
        let ignored_key_count = properties
            .keys()
            .filter(|key| !namespace.recognizes(key))
            .count();

        Ok(ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: hostname::get()
                .ok()
                .map(|h| h.to_string_lossy().to_string()),
            namespace: namespace.to_string(),
            properties_source: paths.source.to_string(),
            properties_path: paths.path.as_ref().map(|p| p.display().to_string()),
            properties_hash: hash_recognized(properties, namespace),
            ignored_key_count,
            config: serde_json::to_value(config)?,
            summary: config.to_string(),
        })
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot was taken from the same recognized properties.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.properties_hash == other.properties_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.properties_hash[..12.min(self.properties_hash.len())]
    }
}

/// Hash recognized keys in field order. Absent keys hash as absent, so a
/// missing optional key and an explicit default differ.
fn hash_recognized(properties: &PropertyBag, namespace: &KeyNamespace) -> String {
    let mut hasher = Sha256::new();
    for field in Field::ALL {
        let key = namespace.key(field);
        hasher.update(key.as_bytes());
        match properties.get(&key) {
            Some(value) => {
                hasher.update(b"=");
                hasher.update(value.len().to_le_bytes());
                hasher.update(value.as_bytes());
            }
            None => hasher.update(b"!"),
        }
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
