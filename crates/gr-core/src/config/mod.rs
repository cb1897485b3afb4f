//! Configuration loading for gr-core.
//!
//! Resolves `analysis.json` through gr-config's search order, applies CLI
//! overrides and validates the effective values.

pub use gr_config::validate::ValidationError;
pub use gr_config::{AnalysisConfig, ConfigPaths, ConfigSnapshot, ConfigSource};

use gr_config::{resolve_config, validate_analysis};
use gr_math::math::aki::check_bin_width;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Semantic validation failed: {0}")]
    Invalid(#[from] ValidationError),

    #[error("--mbin must be finite and positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("--mc must be finite, got {0}")]
    InvalidCompleteness(f64),
}

impl ConfigError {
    /// Convert to the unified error, keeping the numeric code family.
    pub fn to_common(&self) -> gr_common::Error {
        match self {
            ConfigError::NotFound { .. } | ConfigError::Load { .. } => {
                gr_common::Error::Config(self.to_string())
            }
            ConfigError::Invalid(_) => gr_common::Error::InvalidConfig(self.to_string()),
            ConfigError::InvalidBinWidth(w) => gr_common::Error::InvalidBinWidth(*w),
            ConfigError::InvalidCompleteness(mc) => gr_common::Error::InvalidCompleteness(*mc),
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority; must exist).
    pub config_path: Option<PathBuf>,
    /// `--mc` override.
    pub completeness_magnitude: Option<f64>,
    /// `--mbin` override.
    pub bin_width: Option<f64>,
}

/// Effective configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub analysis: AnalysisConfig,
    pub paths: ConfigPaths,
}

impl ResolvedConfig {
    /// Snapshot recorded in the report.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(&self.analysis, &self.paths)
    }
}

/// Load and validate the analysis configuration.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit `--config` path
/// 2. GR_BVALUE_CONFIG / GR_BVALUE_CONFIG_DIR
/// 3. XDG config home (~/.config/gr-bvalue/)
/// 4. /etc/gr-bvalue/
/// 5. Built-in defaults
///
/// `--mc` / `--mbin` then replace the file values before validation. Those
/// overrides are user input: a non-positive width or non-finite magnitude
/// fails as an input error, while the same value read from a file fails as
/// invalid config.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = &options.config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
    }
    check_overrides(options)?;

    let paths = resolve_config(options.config_path.as_deref());
    let analysis = match &paths.analysis {
        Some(path) => AnalysisConfig::from_file(path).map_err(|source| ConfigError::Load {
            path: path.clone(),
            source,
        })?,
        None => AnalysisConfig::default(),
    }
    .with_overrides(options.completeness_magnitude, options.bin_width);

    validate_analysis(&analysis)?;

    Ok(ResolvedConfig { analysis, paths })
}

fn check_overrides(options: &ConfigOptions) -> Result<(), ConfigError> {
    if let Some(mbin) = options.bin_width {
        check_bin_width(mbin).map_err(|_| ConfigError::InvalidBinWidth(mbin))?;
    }
    if let Some(mc) = options.completeness_magnitude {
        if !mc.is_finite() {
            return Err(ConfigError::InvalidCompleteness(mc));
        }
    }
    Ok(())
}
