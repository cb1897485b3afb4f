//! Command payload rendering.
//!
//! Every command produces a payload that renders three ways:
//! - `json`: the payload wrapped in an envelope with schema version, run ID
//!   and timestamp (the default, for programs)
//! - `md`: a Markdown report
//! - `summary`: one line
//!
//! Payloads go to stdout; errors go to stderr in the same format.

pub mod payloads;

pub use payloads::{ConfigReport, QueryRequest, VersionInfo};

use chrono::Utc;
use gr_common::error::format_error_human;
use gr_common::{Error, OutputFormat, RunId, StructuredError, SCHEMA_VERSION};
use gr_config::ConfigSnapshot;
use serde::Serialize;

/// A command payload that can be rendered for people.
pub trait Render {
    /// Command name recorded in the envelope.
    fn command(&self) -> &'static str;

    fn to_markdown(&self) -> String;

    fn to_summary(&self) -> String;
}

/// JSON wrapper around a payload.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub run_id: String,
    pub generated_at: String,
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a ConfigSnapshot>,
    pub result: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(
        run_id: &RunId,
        command: &'static str,
        config: Option<&'a ConfigSnapshot>,
        result: &'a T,
    ) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION,
            run_id: run_id.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            command,
            config,
            result,
        }
    }
}

/// Render `payload` in `format`.
pub fn render<T: Render + Serialize>(
    format: OutputFormat,
    run_id: &RunId,
    config: Option<&ConfigSnapshot>,
    payload: &T,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope::new(run_id, payload.command(), config, payload);
            serde_json::to_string_pretty(&envelope)
        }
        OutputFormat::Md => Ok(payload.to_markdown()),
        OutputFormat::Summary => Ok(format!("[{}] {}", run_id, payload.to_summary())),
    }
}

/// Render an error for stderr in `format`.
pub fn render_error(format: OutputFormat, run_id: &RunId, error: &Error, use_color: bool) -> String {
    match format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id.to_string(),
                "generated_at": Utc::now().to_rfc3339(),
                "status": "error",
                "error": StructuredError::from(error),
            });
            serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| StructuredError::from(error).to_json())
        }
        OutputFormat::Md => format_error_human(error, use_color),
        OutputFormat::Summary => format!("[{}] error {}: {}", run_id, error.code(), error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Ping {
        n: u32,
    }

    impl Render for Ping {
        fn command(&self) -> &'static str {
            "ping"
        }
        fn to_markdown(&self) -> String {
            format!("# ping\n\nn = {}\n", self.n)
        }
        fn to_summary(&self) -> String {
            format!("ping n={}", self.n)
        }
    }

    #[test]
    fn json_envelope_fields() {
        let run_id = RunId::new();
        let out = render(OutputFormat::Json, &run_id, None, &Ping { n: 3 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["command"], "ping");
        assert_eq!(value["run_id"], run_id.to_string());
        assert_eq!(value["result"]["n"], 3);
        assert!(value.get("config").is_none());
    }

    #[test]
    fn summary_is_prefixed_with_run_id() {
        let run_id = RunId::new();
        let out = render(OutputFormat::Summary, &run_id, None, &Ping { n: 1 }).unwrap();
        assert_eq!(out, format!("[{}] ping n=1", run_id));
    }

    #[test]
    fn error_json_carries_code() {
        let out = render_error(OutputFormat::Json, &RunId::new(), &Error::EmptyCatalog, false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], 21);
        assert_eq!(value["error"]["category"], "input");
    }
}
