//! Structured event definitions for logging.
//!
//! Every event carries the run and host IDs and the pipeline stage it was
//! emitted from; see the `log_event!` macro.

use serde::{Deserialize, Serialize};

/// Stages of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the catalog file.
    Load,
    /// Aki maximum-likelihood estimate.
    Estimate,
    /// Frequency-magnitude binning.
    Bin,
    /// Rendering the payload.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Estimate => "estimate",
            Stage::Bin => "bin",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Load stage
    pub const CATALOG_LOADED: &str = "load.catalog_loaded";

    // Estimate stage
    pub const ESTIMATE_FITTED: &str = "estimate.fitted";
    pub const ESTIMATE_INSUFFICIENT: &str = "estimate.insufficient";
    pub const ESTIMATE_DEGENERATE: &str = "estimate.degenerate";

    // Bin stage
    pub const BIN_FINISHED: &str = "bin.finished";

    // Error events
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation IDs shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub host_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            host_id: host_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Load,
            Stage::Estimate,
            Stage::Bin,
            Stage::Report,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }
}
