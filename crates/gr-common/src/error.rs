//! Error types for b-value analysis.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Degenerate Estimate
//!   Reason: degenerate estimate: mean magnitude 2.95 coincides with the corrected cutoff 2.95
//!   Fix: Lower the completeness magnitude or check that magnitudes were not clipped ...
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "malformed magnitude at row 5: \"n/a\"",
//!   "recoverable": true,
//!   "context": { "row": 5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Catalog and parameter validation errors.
    Input,
    /// Estimation failures on otherwise valid input.
    Estimation,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Estimation => write!(f, "estimation"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for b-value analysis.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),

    // Input errors (20-29)
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("malformed magnitude at row {row}: {value:?}")]
    MalformedMagnitude { row: usize, value: String },

    #[error("bin width must be finite and positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("invalid catalog query: {0}")]
    InvalidQuery(String),

    #[error("completeness magnitude must be finite, got {0}")]
    InvalidCompleteness(f64),

    // Estimation errors (30-39)
    #[error("degenerate estimate: mean magnitude {mean} coincides with the corrected cutoff {cutoff}")]
    DegenerateEstimate { mean: f64, cutoff: f64 },


    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog file error: {0}")]
    CatalogFile(String),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Estimation errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::InvalidCatalog(_) => 20,
            Error::EmptyCatalog => 21,
            Error::MalformedMagnitude { .. } => 22,
            Error::InvalidBinWidth(_) => 23,
            Error::InvalidQuery(_) => 24,
            Error::InvalidCompleteness(_) => 25,
            Error::DegenerateEstimate { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::CatalogFile(_) => 62,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => ErrorCategory::Config,

            Error::InvalidCatalog(_)
            | Error::EmptyCatalog
            | Error::MalformedMagnitude { .. }
            | Error::InvalidBinWidth(_)
            | Error::InvalidQuery(_)
            | Error::InvalidCompleteness(_) => ErrorCategory::Input,

            Error::DegenerateEstimate { .. } => ErrorCategory::Estimation,

            Error::Io(_) | Error::Json(_) | Error::CatalogFile(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error can be resolved by changing inputs.
    ///
    /// Nothing here is transient: retrying the same call fails the same way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => true,
            Error::InvalidCatalog(_) => true,
            Error::EmptyCatalog => false,
            Error::MalformedMagnitude { .. } => true,
            Error::InvalidBinWidth(_) => true,
            Error::InvalidQuery(_) => true,
            Error::InvalidCompleteness(_) => true,
            Error::DegenerateEstimate { .. } => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
            Error::CatalogFile(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'gr-core config validate' to check the configuration file."
            }
            Error::InvalidConfig(_) => {
                "Fix the reported field in analysis.json, or remove the file to use built-in defaults."
            }
            Error::InvalidCatalog(_) => {
                "Check the catalog file for non-finite or missing magnitudes."
            }
            Error::EmptyCatalog => {
                "The catalog holds no events. Widen the query window before retrieving the catalog."
            }
            Error::MalformedMagnitude { .. } => {
                "Every row needs a numeric Magnitude column. Fix or drop the reported row."
            }
            Error::InvalidBinWidth(_) => "Pass a positive bin width, e.g. '--mbin 0.1'.",
            Error::InvalidQuery(_) => {
                "Check that each min/max pair is ordered and coordinates are within bounds."
            }
            Error::InvalidCompleteness(_) => "Pass a finite completeness magnitude, e.g. '--mc 3.0'.",
            Error::DegenerateEstimate { .. } => {
                "Lower the completeness magnitude or check that magnitudes were not clipped at the cutoff."
            }
            Error::Io(_) => "Check that the path exists and is readable/writable.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq .' or restore from backup.",
            Error::CatalogFile(_) => {
                "The catalog must be CSV with header 'Origin Time,Latitude,Longitude,Magnitude,Depth'."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Analysis Configuration",
            Error::InvalidCatalog(_) => "Invalid Catalog",
            Error::EmptyCatalog => "Empty Catalog",
            Error::MalformedMagnitude { .. } => "Malformed Magnitude",
            Error::InvalidBinWidth(_) => "Invalid Bin Width",
            Error::InvalidQuery(_) => "Invalid Catalog Query",
            Error::InvalidCompleteness(_) => "Invalid Completeness Magnitude",
            Error::DegenerateEstimate { .. } => "Degenerate Estimate",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
            Error::CatalogFile(_) => "Catalog File Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether changing inputs can resolve the error.
    pub recoverable: bool,

    /// Additional structured context (e.g., row, cutoff).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::MalformedMagnitude { row, value } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::InvalidBinWidth(width) => {
                context.insert("bin_width".to_string(), serde_json::json!(width));
            }
            Error::InvalidCompleteness(mc) => {
                context.insert("completeness_magnitude".to_string(), serde_json::json!(mc));
            }
            Error::DegenerateEstimate { mean, cutoff } => {
                context.insert("mean_magnitude".to_string(), serde_json::json!(mean));
                context.insert("cutoff".to_string(), serde_json::json!(cutoff));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
