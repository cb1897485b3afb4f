//! The b-value analysis pipeline.
//!
//! Runs the estimator and the binner over one catalog and assembles the
//! payload the plotting collaborator draws: the cumulative
//! frequency-magnitude distribution, the fitted Gutenberg-Richter line and
//! the annotations.

use gr_config::AnalysisConfig;
use gr_math::{
    estimate, histogram, predicted_count, BValueEstimate, BValueFit, BinningError,
    EstimateError, FrequencyDistribution, MagnitudeCatalog,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Binning(#[from] BinningError),
}

impl AnalysisError {
    /// Convert to the unified error.
    pub fn to_common(&self) -> gr_common::Error {
        match self {
            AnalysisError::Estimate(EstimateError::InvalidBinWidth(w))
            | AnalysisError::Binning(BinningError::InvalidBinWidth(w)) => {
                gr_common::Error::InvalidBinWidth(*w)
            }
            AnalysisError::Estimate(EstimateError::InvalidCompleteness(mc)) => {
                gr_common::Error::InvalidCompleteness(*mc)
            }
            AnalysisError::Estimate(EstimateError::DegenerateEstimate { mean, cutoff }) => {
                gr_common::Error::DegenerateEstimate {
                    mean: *mean,
                    cutoff: *cutoff,
                }
            }
            AnalysisError::Binning(BinningError::EmptyCatalog) => gr_common::Error::EmptyCatalog,
            AnalysisError::Binning(BinningError::TooManyBins { .. }) => {
                gr_common::Error::InvalidCatalog(self.to_string())
            }
        }
    }
}

/// Fit-dependent part of the report. Absent when fewer than two events
/// clear the cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    #[serde(flatten)]
    pub fit: BValueFit,
    /// `10^(a − b·mc)`; equals the selected count up to rounding.
    pub frequency_at_mc: f64,
    /// Model count at every bin midpoint, aligned with the report's midpoints.
    pub fitted_curve: Vec<f64>,
    /// `b-value = {b:.3} +/- {shi_bolt:.3}`.
    pub b_label: String,
}

/// Everything needed to draw and annotate the frequency-magnitude plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BValueReport {
    pub catalog_size: usize,
    pub completeness_magnitude: f64,
    pub bin_width: f64,
    /// Events strictly above `mc − bin_width/2`.
    pub selected: usize,
    pub midpoints: Vec<f64>,
    pub counts: Vec<u64>,
    pub cumulative: Vec<u64>,
    /// Plot y-axis ceiling, `10^ceil(log10(catalog_size))`.
    pub y_max: f64,
    /// `Mc = {mc:.1}`.
    pub mc_label: String,
    pub fit: Option<FitSummary>,
}

impl BValueReport {
    pub fn is_insufficient(&self) -> bool {
        self.fit.is_none()
    }
}

/// Plot y-axis ceiling: the next power of ten at or above `n`.
pub fn y_axis_ceiling(n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    10f64.powf((n as f64).log10().ceil())
}

pub fn mc_label(mc: f64) -> String {
    format!("Mc = {:.1}", mc)
}

pub fn b_label(fit: &BValueFit) -> String {
    format!("b-value = {:.3} +/- {:.3}", fit.b, fit.shi_bolt_uncertainty)
}

/// Run the estimate and the binning over `catalog` and assemble the report.
pub fn analyze(
    catalog: &MagnitudeCatalog,
    config: &AnalysisConfig,
) -> Result<BValueReport, AnalysisError> {
    let mc = config.completeness_magnitude;
    let mbin = config.bin_width;

    let outcome = estimate(catalog, mbin, mc)?;
    let distribution = histogram(catalog, mbin)?;
    tracing::debug!(
        bins = distribution.len(),
        selected = outcome.selected(),
        "estimate and histogram computed"
    );

    Ok(assemble(catalog.len(), mc, mbin, &outcome, &distribution))
}

/// Combine an estimate and a distribution computed over the same catalog.
pub fn assemble(
    catalog_size: usize,
    mc: f64,
    mbin: f64,
    outcome: &BValueEstimate,
    distribution: &FrequencyDistribution,
) -> BValueReport {
    let midpoints = distribution.midpoints();

    let fit = outcome.fit().map(|fit| FitSummary {
        fit: *fit,
        frequency_at_mc: predicted_count(fit.a, fit.b, mc),
        fitted_curve: fit.model().curve(&midpoints),
        b_label: b_label(fit),
    });

    BValueReport {
        catalog_size,
        completeness_magnitude: mc,
        bin_width: mbin,
        selected: outcome.selected(),
        counts: distribution.counts(),
        cumulative: distribution.cumulative(),
        midpoints,
        y_max: y_axis_ceiling(catalog_size),
        mc_label: mc_label(mc),
        fit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_catalog() -> MagnitudeCatalog {
        MagnitudeCatalog::new(vec![3.0, 3.1, 3.2, 3.3, 3.4, 3.5, 4.0, 4.5, 5.0]).unwrap()
    }

    fn config(mc: f64, mbin: f64) -> AnalysisConfig {
        AnalysisConfig::default().with_overrides(Some(mc), Some(mbin))
    }

    #[test]
    fn reference_report() {
        let report = analyze(&reference_catalog(), &config(3.0, 0.1)).unwrap();
        assert_eq!(report.catalog_size, 9);
        assert_eq!(report.selected, 9);
        assert_eq!(report.midpoints.len(), 20);
        assert_eq!(report.counts.len(), 20);
        assert_eq!(report.cumulative[0], 9);
        assert_eq!(report.y_max, 10.0);
        assert_eq!(report.mc_label, "Mc = 3.0");

        let fit = report.fit.as_ref().unwrap();
        assert!((fit.fit.b - 0.6059923003301191).abs() < 1e-12);
        assert!((fit.fit.a - 2.772219410429682).abs() < 1e-12);
        assert_eq!(fit.b_label, "b-value = 0.606 +/- 0.194");
        assert_eq!(fit.fitted_curve.len(), report.midpoints.len());
    }

    #[test]
    fn frequency_at_mc_matches_model_exactly() {
        let report = analyze(&reference_catalog(), &config(3.0, 0.1)).unwrap();
        let fit = report.fit.unwrap();
        let direct = predicted_count(fit.fit.a, fit.fit.b, 3.0);
        assert_eq!(fit.frequency_at_mc.to_bits(), direct.to_bits());
        assert!((fit.frequency_at_mc - 9.0).abs() < 1e-9);
    }

    #[test]
    fn insufficient_data_keeps_distribution() {
        let report = analyze(&reference_catalog(), &config(4.8, 0.1)).unwrap();
        assert!(report.is_insufficient());
        assert_eq!(report.selected, 1);
        assert_eq!(report.counts.iter().sum::<u64>(), 9);
        assert_eq!(report.mc_label, "Mc = 4.8");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let err = analyze(&MagnitudeCatalog::default(), &config(3.0, 0.1)).unwrap_err();
        assert_eq!(err, AnalysisError::Binning(BinningError::EmptyCatalog));
        assert_eq!(err.to_common().code(), 21);
    }

    #[test]
    fn degenerate_maps_to_common_code() {
        let cutoff = gr_math::math::aki::corrected_cutoff(3.0, 0.1);
        let just_above = f64::from_bits(cutoff.to_bits() + 1);
        let cat = MagnitudeCatalog::new(vec![just_above; 3]).unwrap();
        let err = analyze(&cat, &config(3.0, 0.1)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Estimate(EstimateError::DegenerateEstimate { .. })
        ));
        assert_eq!(err.to_common().code(), 30);
    }

    #[test]
    fn zero_bin_width_is_rejected_before_binning() {
        let err = analyze(&reference_catalog(), &config(3.0, 0.0)).unwrap_err();
        assert_eq!(err, AnalysisError::Estimate(EstimateError::InvalidBinWidth(0.0)));
    }

    #[test]
    fn y_axis_ceiling_powers_of_ten() {
        assert_eq!(y_axis_ceiling(1), 1.0);
        assert_eq!(y_axis_ceiling(9), 10.0);
        assert_eq!(y_axis_ceiling(10), 10.0);
        assert_eq!(y_axis_ceiling(11), 100.0);
        assert_eq!(y_axis_ceiling(0), 1.0);
    }
}
