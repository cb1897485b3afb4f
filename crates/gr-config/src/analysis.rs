//! Typed structure for `analysis.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Default completeness magnitude.
pub const DEFAULT_COMPLETENESS_MAGNITUDE: f64 = 3.0;

/// Default magnitude bin width.
pub const DEFAULT_BIN_WIDTH: f64 = 0.1;

/// Parameters of a b-value analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Completeness magnitude `mc`. Events below `mc − bin_width/2` are ignored.
    #[serde(default = "default_completeness_magnitude")]
    pub completeness_magnitude: f64,

    /// Magnitude bin width `mbin` of the catalog's reporting resolution.
    #[serde(default = "default_bin_width")]
    pub bin_width: f64,
}

fn default_completeness_magnitude() -> f64 {
    DEFAULT_COMPLETENESS_MAGNITUDE
}

fn default_bin_width() -> f64 {
    DEFAULT_BIN_WIDTH
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            completeness_magnitude: DEFAULT_COMPLETENESS_MAGNITUDE,
            bin_width: DEFAULT_BIN_WIDTH,
        }
    }
}

impl AnalysisConfig {
    /// Load the configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Replace file values with explicit overrides.
    pub fn with_overrides(mut self, mc: Option<f64>, mbin: Option<f64>) -> Self {
        if let Some(mc) = mc {
            self.completeness_magnitude = mc;
        }
        if let Some(mbin) = mbin {
            self.bin_width = mbin;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let cfg = AnalysisConfig::from_json(r#"{"schema_version": "1.0.0"}"#).unwrap();
        assert_eq!(cfg.completeness_magnitude, 3.0);
        assert_eq!(cfg.bin_width, 0.1);
        assert!(cfg.description.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "schema_version": "1.0.0",
            "description": "Garhwal ISC catalog",
            "completeness_magnitude": 3.5,
            "bin_width": 0.2
        }"#;
        let cfg = AnalysisConfig::from_json(json).unwrap();
        assert_eq!(cfg.completeness_magnitude, 3.5);
        assert_eq!(cfg.bin_width, 0.2);
        assert_eq!(cfg.description.as_deref(), Some("Garhwal ISC catalog"));
    }

    #[test]
    fn test_missing_schema_version_is_parse_error() {
        let err = AnalysisConfig::from_json(r#"{"bin_width": 0.1}"#).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_overrides() {
        let cfg = AnalysisConfig::default().with_overrides(Some(2.5), None);
        assert_eq!(cfg.completeness_magnitude, 2.5);
        assert_eq!(cfg.bin_width, DEFAULT_BIN_WIDTH);
    }
}
