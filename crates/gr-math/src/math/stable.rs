//! Numerically stable summation primitives for catalog statistics.
//!
//! Magnitude catalogs routinely hold tens of thousands of values that sit in a
//! narrow band (e.g. 2.0..6.0). Naive accumulation drifts by a few ulps per
//! thousand terms, which matters when the estimator later divides by a small
//! difference `mean - cutoff`.

/// log10(e), the numerator of the Aki estimator.
pub const LOG10_E: f64 = std::f64::consts::LOG10_E;

/// Compensated (Neumaier) sum.
///
/// Returns 0.0 for empty input and NaN if any value is NaN.
pub fn neumaier_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Arithmetic mean using compensated summation.
///
/// Returns NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    neumaier_sum(values) / values.len() as f64
}

/// Sum of squared deviations from `center`, Σ(xᵢ − center)².
///
/// Two-pass form: callers pass the mean computed beforehand, which avoids the
/// cancellation of the Σx² − n·x̄² shortcut.
pub fn sum_sq_dev(values: &[f64], center: f64) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let d = v - center;
        let term = d * d;
        let t = sum + term;
        if sum >= term {
            compensation += (sum - t) + term;
        } else {
            compensation += (term - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Whether `diff` is indistinguishable from zero at the precision of
/// `reference`.
///
/// Used to detect divisors that only exist because of rounding.
pub fn is_rounding_zero(diff: f64, reference: f64) -> bool {
    const ULP_SLACK: f64 = 4.0;
    diff.abs() <= ULP_SLACK * f64::EPSILON * reference.abs().max(1.0)
}
