//! b-value analysis configuration loading and validation.
//!
//! This crate provides:
//! - The typed `analysis.json` structure
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Config snapshots recorded alongside each report

pub mod analysis;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use analysis::AnalysisConfig;
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_analysis, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
