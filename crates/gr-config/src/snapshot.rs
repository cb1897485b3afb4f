//! Configuration snapshots recorded with each analysis report.
//!
//! A snapshot captures the configuration in effect for a run so the reported
//! b-value can be reproduced later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analysis::AnalysisConfig;
use crate::resolve::{ConfigPaths, ConfigSource};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the configuration was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Where the configuration came from.
    pub source: ConfigSource,

    /// Completeness magnitude in effect (after CLI overrides).
    pub completeness_magnitude: f64,

    /// Bin width in effect (after CLI overrides).
    pub bin_width: f64,

    /// SHA-256 of the effective values, for quick comparison across runs.
    pub hash: String,
}

impl ConfigSnapshot {
    /// Snapshot the effective configuration.
    pub fn new(config: &AnalysisConfig, paths: &ConfigPaths) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: paths.analysis.as_ref().map(|p| p.display().to_string()),
            source: paths.analysis_source,
            completeness_magnitude: config.completeness_magnitude,
            bin_width: config.bin_width,
            hash: effective_hash(config),
        }
    }

    /// Snapshot of the built-in defaults.
    pub fn defaults_only() -> Self {
        Self::new(&AnalysisConfig::default(), &ConfigPaths::default())
    }

    /// Check if this snapshot carries the same effective values as another.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.hash == other.hash
    }

    /// Short identifier (first 12 hex chars of the hash).
    pub fn short_id(&self) -> &str {
        &self.hash[..12.min(self.hash.len())]
    }
}

/// Hash the values that influence the estimate. Uses the bit patterns so
/// `0.1` and `0.10000000000000002` hash differently.
fn effective_hash(config: &AnalysisConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.schema_version.as_bytes());
    hasher.update(config.completeness_magnitude.to_bits().to_le_bytes());
    hasher.update(config.bin_width.to_bits().to_le_bytes());
    hex::encode(hasher.finalize())
}
