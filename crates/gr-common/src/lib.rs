//! Common types shared across the b-value analysis crates.
//!
//! This crate provides:
//! - The unified error type with stable codes
//! - Run identifiers and schema versioning
//! - Output format selection
//! - Seismic event records and the catalog query handed to retrieval

pub mod error;
pub mod event;
pub mod id;
pub mod output;
pub mod query;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use event::SeismicEvent;
pub use id::RunId;
pub use output::OutputFormat;
pub use query::{CatalogQuery, QueryError};

/// Schema version of machine-readable command output.
pub const SCHEMA_VERSION: &str = "1.0.0";
