//! [`Render`] impls for every command payload.

use super::Render;
use crate::analysis::BValueReport;
use crate::map::MapExtent;
use gr_common::CatalogQuery;
use gr_config::ConfigSnapshot;
use gr_math::{BValueEstimate, FrequencyDistribution};
use serde::Serialize;
use std::fmt::Write;

const INSUFFICIENT: &str = "insufficient data (fewer than 2 events above the cutoff)";

fn histogram_table(out: &mut String, midpoints: &[f64], counts: &[u64], cumulative: &[u64]) {
    out.push_str("| Magnitude | Count | Cumulative |\n|---:|---:|---:|\n");
    for ((m, c), n) in midpoints.iter().zip(counts).zip(cumulative) {
        let _ = writeln!(out, "| {:.2} | {} | {} |", m, c, n);
    }
}

impl Render for BValueReport {
    fn command(&self) -> &'static str {
        "analyze"
    }

    fn to_markdown(&self) -> String {
        let mut out = String::from("# b-value analysis\n\n");
        let _ = writeln!(out, "- Events: {}", self.catalog_size);
        let _ = writeln!(out, "- {}", self.mc_label);
        let _ = writeln!(out, "- Bin width: {}", self.bin_width);
        let _ = writeln!(out, "- Selected: {}", self.selected);
        match &self.fit {
            Some(fit) => {
                let _ = writeln!(out, "- {}", fit.b_label);
                let _ = writeln!(out, "- a-value: {:.3}", fit.fit.a);
                let _ = writeln!(out, "- Aki uncertainty: {:.3}", fit.fit.aki_uncertainty);
                let _ = writeln!(out, "- Frequency at Mc: {:.3}", fit.frequency_at_mc);
            }
            None => {
                let _ = writeln!(out, "- Fit: {}", INSUFFICIENT);
            }
        }
        out.push_str("\n## Frequency-magnitude distribution\n\n");
        histogram_table(&mut out, &self.midpoints, &self.counts, &self.cumulative);
        out
    }

    fn to_summary(&self) -> String {
        match &self.fit {
            Some(fit) => format!(
                "analyze: {} events, {}, {}, a = {:.3}",
                self.catalog_size, self.mc_label, fit.b_label, fit.fit.a
            ),
            None => format!(
                "analyze: {} events, {}, {}",
                self.catalog_size, self.mc_label, INSUFFICIENT
            ),
        }
    }
}

impl Render for BValueEstimate {
    fn command(&self) -> &'static str {
        "estimate"
    }

    fn to_markdown(&self) -> String {
        let mut out = String::from("# b-value estimate\n\n");
        match self {
            BValueEstimate::Fitted(fit) => {
                let _ = writeln!(out, "| Field | Value |\n|---|---:|");
                let _ = writeln!(out, "| b | {:.4} |", fit.b);
                let _ = writeln!(out, "| a | {:.4} |", fit.a);
                let _ = writeln!(out, "| Aki uncertainty | {:.4} |", fit.aki_uncertainty);
                let _ = writeln!(out, "| Shi & Bolt uncertainty | {:.4} |", fit.shi_bolt_uncertainty);
                let _ = writeln!(out, "| Events | {} |", fit.n);
                let _ = writeln!(out, "| Mean magnitude | {:.4} |", fit.mean_magnitude);
                let _ = writeln!(out, "| Cutoff | {:.4} |", fit.cutoff);
            }
            BValueEstimate::InsufficientData { selected } => {
                let _ = writeln!(out, "{} ({} selected)", INSUFFICIENT, selected);
            }
        }
        out
    }

    fn to_summary(&self) -> String {
        match self {
            BValueEstimate::Fitted(fit) => format!(
                "estimate: b = {:.3} +/- {:.3}, a = {:.3}, n = {}",
                fit.b, fit.shi_bolt_uncertainty, fit.a, fit.n
            ),
            BValueEstimate::InsufficientData { selected } => {
                format!("estimate: {} ({} selected)", INSUFFICIENT, selected)
            }
        }
    }
}

impl Render for FrequencyDistribution {
    fn command(&self) -> &'static str {
        "histogram"
    }

    fn to_markdown(&self) -> String {
        let mut out = String::from("# Frequency-magnitude distribution\n\n");
        let _ = writeln!(out, "Bin width: {}\n", self.bin_width);
        histogram_table(&mut out, &self.midpoints(), &self.counts(), &self.cumulative());
        out
    }

    fn to_summary(&self) -> String {
        format!(
            "histogram: {} bins of width {}, {} events",
            self.len(),
            self.bin_width,
            self.total()
        )
    }
}

impl Render for MapExtent {
    fn command(&self) -> &'static str {
        "map"
    }

    fn to_markdown(&self) -> String {
        let [w, e, s, n] = self.region;
        let mut out = String::from("# Map extent\n\n");
        let _ = writeln!(out, "- Region: {:.3}/{:.3}/{:.3}/{:.3}", w, e, s, n);
        match self.depth_range {
            Some([lo, hi]) => {
                let _ = writeln!(out, "- Depth range: {} to {} km", lo, hi);
            }
            None => out.push_str("- Depth range: unknown\n"),
        }
        let _ = writeln!(out, "- Events: {}", self.points.len());
        out
    }

    fn to_summary(&self) -> String {
        let [w, e, s, n] = self.region;
        format!(
            "map: {} events in {:.3}/{:.3}/{:.3}/{:.3}",
            self.points.len(),
            w,
            e,
            s,
            n
        )
    }
}

/// Request handed to the catalog retrieval collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: CatalogQuery,
    pub base_url: String,
    pub url: String,
}

impl Render for QueryRequest {
    fn command(&self) -> &'static str {
        "query"
    }

    fn to_markdown(&self) -> String {
        let q = &self.query;
        let mut out = String::from("# Catalog query\n\n");
        let _ = writeln!(out, "- Catalog: {}", q.catalog);
        let _ = writeln!(out, "- Latitude: {} to {}", q.min_latitude, q.max_latitude);
        let _ = writeln!(out, "- Longitude: {} to {}", q.min_longitude, q.max_longitude);
        let _ = writeln!(out, "- Time: {} to {}", q.start_time.to_rfc3339(), q.end_time.to_rfc3339());
        let _ = writeln!(out, "- Magnitude: {} to {}", q.min_magnitude, q.max_magnitude);
        let _ = writeln!(out, "- Depth: {} to {} km", q.min_depth_km, q.max_depth_km);
        let _ = writeln!(out, "\n```\n{}\n```", self.url);
        out
    }

    fn to_summary(&self) -> String {
        format!("query: {}", self.url)
    }
}

/// `config show` and `config validate` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    #[serde(skip)]
    pub command: &'static str,
    pub snapshot: ConfigSnapshot,
    pub description: Option<String>,
    /// Set by `config validate`; invalid files are reported as errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl Render for ConfigReport {
    fn command(&self) -> &'static str {
        self.command
    }

    fn to_markdown(&self) -> String {
        let s = &self.snapshot;
        let mut out = String::from("# Analysis configuration\n\n");
        let _ = writeln!(out, "- Source: {}", s.source);
        if let Some(path) = &s.path {
            let _ = writeln!(out, "- Path: {}", path);
        }
        let _ = writeln!(out, "- Schema version: {}", s.schema_version);
        let _ = writeln!(out, "- Completeness magnitude: {}", s.completeness_magnitude);
        let _ = writeln!(out, "- Bin width: {}", s.bin_width);
        let _ = writeln!(out, "- Hash: {}", s.short_id());
        if let Some(valid) = self.valid {
            let _ = writeln!(out, "- Valid: {}", valid);
        }
        out
    }

    fn to_summary(&self) -> String {
        let s = &self.snapshot;
        format!(
            "{}: {} (mc = {}, mbin = {}, {})",
            self.command,
            s.source,
            s.completeness_magnitude,
            s.bin_width,
            s.short_id()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub schema_version: &'static str,
    pub config_schema_version: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        VersionInfo {
            version: env!("CARGO_PKG_VERSION"),
            schema_version: gr_common::SCHEMA_VERSION,
            config_schema_version: gr_config::CONFIG_SCHEMA_VERSION,
        }
    }
}

impl Render for VersionInfo {
    fn command(&self) -> &'static str {
        "version"
    }

    fn to_markdown(&self) -> String {
        format!(
            "# gr-core {}\n\n- Output schema: {}\n- Config schema: {}\n",
            self.version, self.schema_version, self.config_schema_version
        )
    }

    fn to_summary(&self) -> String {
        format!("gr-core {}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use gr_config::AnalysisConfig;
    use gr_math::MagnitudeCatalog;

    fn reference_report(mc: f64) -> BValueReport {
        let catalog =
            MagnitudeCatalog::new(vec![3.0, 3.1, 3.2, 3.3, 3.4, 3.5, 4.0, 4.5, 5.0]).unwrap();
        let config = AnalysisConfig::default().with_overrides(Some(mc), None);
        analyze(&catalog, &config).unwrap()
    }

    #[test]
    fn report_summary_carries_labels() {
        let summary = reference_report(3.0).to_summary();
        assert!(summary.contains("Mc = 3.0"));
        assert!(summary.contains("b-value = 0.606 +/- 0.194"));
    }

    #[test]
    fn report_markdown_has_table() {
        let md = reference_report(3.0).to_markdown();
        assert!(md.starts_with("# b-value analysis"));
        assert!(md.contains("| Magnitude | Count | Cumulative |"));
    }

    #[test]
    fn insufficient_report_says_so() {
        let report = reference_report(4.8);
        assert!(report.to_summary().contains("insufficient data"));
        assert!(report.to_markdown().contains("insufficient data"));
    }

    #[test]
    fn query_summary_is_the_url() {
        let query = CatalogQuery::default();
        let url = query.to_url("https://example.org/q").unwrap();
        let request = QueryRequest {
            query,
            base_url: "https://example.org/q".into(),
            url: url.clone(),
        };
        assert_eq!(request.to_summary(), format!("query: {}", url));
    }

    #[test]
    fn version_reports_package_version() {
        let info = VersionInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.to_summary().starts_with("gr-core "));
    }
}
