//! Aki (1965) maximum-likelihood b-value estimation.
//!
//! Given magnitudes above a completeness threshold `mc`, assumed to follow the
//! Gutenberg-Richter law (an exponential distribution truncated below), the
//! maximum-likelihood slope is
//!
//! ```text
//! b = log10(e) / (m̄ − (mc − Δm/2))
//! ```
//!
//! where `Δm` is the magnitude bin width. The half-bin shift treats the bin
//! centred on `mc` as fully included.
//!
//! Two uncertainty figures are reported:
//! - Aki:        `b / sqrt(n)`
//! - Shi & Bolt: `2.3 · b² · sqrt(Σ(mᵢ − m̄)² / (n(n−1)))`

use super::catalog::MagnitudeCatalog;
use super::gutenberg_richter::GutenbergRichter;
use super::stable::{is_rounding_zero, mean, sum_sq_dev, LOG10_E};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of selected events for a defined estimate.
pub const MIN_EVENTS: usize = 2;

/// Shi & Bolt (1982) scale factor (≈ ln 10).
const SHI_BOLT_FACTOR: f64 = 2.3;

/// Failures of the estimator. Insufficient data is *not* one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("bin width must be finite and positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("completeness magnitude must be finite, got {0}")]
    InvalidCompleteness(f64),

    #[error(
        "degenerate estimate: mean magnitude {mean} coincides with the corrected cutoff {cutoff}"
    )]
    DegenerateEstimate { mean: f64, cutoff: f64 },
}

/// A defined b-value fit. All four figures exist together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BValueFit {
    /// Intercept: log10 of the predicted count at magnitude 0.
    pub a: f64,
    /// Slope of log10(N) against magnitude.
    pub b: f64,
    /// Aki (1965) standard error, `b / sqrt(n)`.
    pub aki_uncertainty: f64,
    /// Shi & Bolt (1982) standard error.
    pub shi_bolt_uncertainty: f64,
    /// Number of events above the corrected cutoff.
    pub n: usize,
    /// Mean magnitude of the selected events.
    pub mean_magnitude: f64,
    /// `mc − mbin/2`, the truncation point of the likelihood.
    pub cutoff: f64,
}

impl BValueFit {
    /// The fitted relation log10(N) = a − b·M.
    pub fn model(&self) -> GutenbergRichter {
        GutenbergRichter::new(self.a, self.b)
    }
}

/// Outcome of [`estimate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BValueEstimate {
    Fitted(BValueFit),
    /// Fewer than [`MIN_EVENTS`] events above the corrected cutoff.
    InsufficientData { selected: usize },
}

impl BValueEstimate {
    pub fn fit(&self) -> Option<&BValueFit> {
        match self {
            BValueEstimate::Fitted(fit) => Some(fit),
            BValueEstimate::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, BValueEstimate::InsufficientData { .. })
    }

    /// `(a, b, aki_uncertainty, shi_bolt_uncertainty)`, all or nothing.
    pub fn figures(&self) -> Option<(f64, f64, f64, f64)> {
        self.fit()
            .map(|f| (f.a, f.b, f.aki_uncertainty, f.shi_bolt_uncertainty))
    }

    /// Number of events that passed the cutoff.
    pub fn selected(&self) -> usize {
        match self {
            BValueEstimate::Fitted(fit) => fit.n,
            BValueEstimate::InsufficientData { selected } => *selected,
        }
    }
}

/// Validate a magnitude bin width.
pub fn check_bin_width(mbin: f64) -> Result<(), EstimateError> {
    if !mbin.is_finite() || mbin <= 0.0 {
        return Err(EstimateError::InvalidBinWidth(mbin));
    }
    Ok(())
}

/// The likelihood truncation point, `mc − mbin/2`.
pub fn corrected_cutoff(mc: f64, mbin: f64) -> f64 {
    mc - mbin / 2.0
}

/// Aki slope from a sample mean and the truncation point.
///
/// Fails with [`EstimateError::DegenerateEstimate`] when the divisor vanishes
/// (or only exists through rounding), or when the result is not finite.
pub fn aki_b_value(mean_magnitude: f64, cutoff: f64) -> Result<f64, EstimateError> {
    let spread = mean_magnitude - cutoff;
    if spread <= 0.0 || is_rounding_zero(spread, cutoff) {
        return Err(EstimateError::DegenerateEstimate {
            mean: mean_magnitude,
            cutoff,
        });
    }
    let b = LOG10_E / spread;
    if !b.is_finite() {
        return Err(EstimateError::DegenerateEstimate {
            mean: mean_magnitude,
            cutoff,
        });
    }
    Ok(b)
}

/// Estimate a, b and their uncertainties from a magnitude catalog.
///
/// # Arguments
/// * `catalog` - Magnitudes; order is irrelevant
/// * `mbin` - Magnitude bin width (> 0)
/// * `mc` - Completeness magnitude
///
/// # Returns
/// * `Ok(Fitted)` for two or more events strictly above `mc − mbin/2`
/// * `Ok(InsufficientData)` otherwise
/// * `Err` for invalid parameters or a degenerate sample
///
/// # Reference
/// Aki (1965), *Maximum likelihood estimate of b in the formula log N = a − bM
/// and its confidence limits*. Shi & Bolt (1982), *The standard error of the
/// magnitude-frequency b value*.
pub fn estimate(
    catalog: &MagnitudeCatalog,
    mbin: f64,
    mc: f64,
) -> Result<BValueEstimate, EstimateError> {
    check_bin_width(mbin)?;
    if !mc.is_finite() {
        return Err(EstimateError::InvalidCompleteness(mc));
    }

    let cutoff = corrected_cutoff(mc, mbin);
    let selected = catalog.above(cutoff);
    let n = selected.len();
    if n < MIN_EVENTS {
        return Ok(BValueEstimate::InsufficientData { selected: n });
    }

    let n_f = n as f64;
    let mbar = mean(&selected);
    let b = aki_b_value(mbar, cutoff)?;
    let a = n_f.log10() + b * mc;
    let aki_uncertainty = b / n_f.sqrt();
    let variance_of_mean = sum_sq_dev(&selected, mbar) / (n_f * (n_f - 1.0));
    let shi_bolt_uncertainty = SHI_BOLT_FACTOR * b * b * variance_of_mean.sqrt();

    Ok(BValueEstimate::Fitted(BValueFit {
        a,
        b,
        aki_uncertainty,
        shi_bolt_uncertainty,
        n,
        mean_magnitude: mbar,
        cutoff,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-3;

    fn catalog(values: &[f64]) -> MagnitudeCatalog {
        MagnitudeCatalog::from_slice(values).unwrap()
    }

    fn scenario() -> MagnitudeCatalog {
        catalog(&[3.0, 3.1, 3.2, 3.3, 3.4, 3.5, 4.0, 4.5, 5.0])
    }

    #[test]
    fn reference_scenario_figures() {
        let out = estimate(&scenario(), 0.1, 3.0).unwrap();
        let fit = out.fit().expect("nine events should fit");
        assert_eq!(fit.n, 9);
        assert!((fit.mean_magnitude - 3.666_666_7).abs() < 1e-6);
        assert!((fit.cutoff - 2.95).abs() < 1e-12);
        assert!((fit.b - 0.605_992).abs() < TOL, "b = {}", fit.b);
        assert!((fit.a - 2.772_219).abs() < TOL, "a = {}", fit.a);
        assert!((fit.aki_uncertainty - 0.201_997).abs() < TOL);
        assert!((fit.shi_bolt_uncertainty - 0.194_038).abs() < TOL);
    }

    #[test]
    fn intercept_reproduces_selected_count_at_mc() {
        let fit = *estimate(&scenario(), 0.1, 3.0).unwrap().fit().unwrap();
        let predicted = fit.model().predicted_count(3.0);
        assert!((predicted - 9.0).abs() < 1e-9);
    }

    #[test]
    fn single_event_above_mc_is_insufficient() {
        let out = estimate(&catalog(&[1.0, 1.5, 2.0, 4.2]), 0.1, 4.0).unwrap();
        assert_eq!(out, BValueEstimate::InsufficientData { selected: 1 });
        assert!(out.figures().is_none());
        assert!(out.is_insufficient());
    }

    #[test]
    fn empty_catalog_is_insufficient_not_error() {
        let out = estimate(&catalog(&[]), 0.1, 3.0).unwrap();
        assert_eq!(out, BValueEstimate::InsufficientData { selected: 0 });
    }

    #[test]
    fn half_bin_correction_includes_bin_at_mc() {
        // 3.96 lies below mc but inside the bin centred on mc.
        let out = estimate(&catalog(&[3.96, 4.3]), 0.1, 4.0).unwrap();
        assert_eq!(out.selected(), 2);
    }

    #[test]
    fn events_on_cutoff_are_excluded() {
        let out = estimate(&catalog(&[2.0, 2.0, 3.0]), 1.0, 2.5).unwrap();
        assert_eq!(out, BValueEstimate::InsufficientData { selected: 1 });
    }

    #[test]
    fn piled_at_cutoff_is_degenerate() {
        let mc = 3.0;
        let mbin = 0.1;
        let cutoff = corrected_cutoff(mc, mbin);
        let just_above = f64::from_bits(cutoff.to_bits() + 1);
        let err = estimate(&catalog(&[just_above; 5]), mbin, mc).unwrap_err();
        assert!(matches!(err, EstimateError::DegenerateEstimate { .. }));
    }

    #[test]
    fn degenerate_is_distinct_from_insufficient() {
        let err = aki_b_value(2.95, 2.95).unwrap_err();
        assert_eq!(
            err,
            EstimateError::DegenerateEstimate {
                mean: 2.95,
                cutoff: 2.95
            }
        );
    }

    #[test]
    fn zero_bin_width_rejected_before_computing() {
        assert_eq!(
            estimate(&catalog(&[]), 0.0, 3.0).unwrap_err(),
            EstimateError::InvalidBinWidth(0.0)
        );
        assert!(matches!(
            estimate(&scenario(), -0.1, 3.0),
            Err(EstimateError::InvalidBinWidth(_))
        ));
        assert!(matches!(
            estimate(&scenario(), f64::NAN, 3.0),
            Err(EstimateError::InvalidBinWidth(_))
        ));
    }

    #[test]
    fn non_finite_mc_rejected() {
        assert!(matches!(
            estimate(&scenario(), 0.1, f64::NAN),
            Err(EstimateError::InvalidCompleteness(_))
        ));
    }

    #[test]
    fn order_independent() {
        let forward = estimate(&scenario(), 0.1, 3.0).unwrap();
        let mut reversed: Vec<f64> = scenario().as_slice().to_vec();
        reversed.reverse();
        let backward = estimate(&catalog(&reversed), 0.1, 3.0).unwrap();
        let (a1, b1, _, _) = forward.figures().unwrap();
        let (a2, b2, _, _) = backward.figures().unwrap();
        assert!((a1 - a2).abs() < 1e-12);
        assert!((b1 - b2).abs() < 1e-12);
    }

    #[test]
    fn shi_bolt_zero_spread_is_zero() {
        let out = estimate(&catalog(&[3.5, 3.5, 3.5]), 0.1, 3.0).unwrap();
        let fit = out.fit().unwrap();
        assert_eq!(fit.shi_bolt_uncertainty, 0.0);
        assert!(fit.aki_uncertainty > 0.0);
    }
}
