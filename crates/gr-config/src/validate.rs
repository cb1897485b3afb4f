//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::analysis::AnalysisConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted bin width. Catalog magnitudes are reported to 0.1 or
/// 0.01; anything coarser than a full unit is a typo.
pub const MAX_BIN_WIDTH: f64 = 1.0;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

/// Validate an analysis configuration semantically.
pub fn validate_analysis(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if !config.completeness_magnitude.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "completeness_magnitude".to_string(),
            message: format!("Must be finite, got {}", config.completeness_magnitude),
        });
    }

    validate_bin_width(config.bin_width)
}

/// Validate a magnitude bin width: finite, positive, at most [`MAX_BIN_WIDTH`].
pub fn validate_bin_width(bin_width: f64) -> ValidationResult<()> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "bin_width".to_string(),
            message: format!("Must be finite and positive, got {}", bin_width),
        });
    }

    if bin_width > MAX_BIN_WIDTH {
        return Err(ValidationError::InvalidValue {
            field: "bin_width".to_string(),
            message: format!("Must be at most {}, got {}", MAX_BIN_WIDTH, bin_width),
        });
    }

    Ok(())
}
