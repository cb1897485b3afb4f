//! The Gutenberg-Richter frequency-magnitude relation.
//!
//! ```text
//! log10(N(M)) = a − b·M
//! ```
//!
//! `N(M)` is the expected number of events at or above magnitude `M`.

use serde::{Deserialize, Serialize};

/// Predicted cumulative count at `magnitude`, `10^(a − b·magnitude)`.
///
/// Valid for any real inputs; overflow saturates to +inf.
pub fn predicted_count(a: f64, b: f64, magnitude: f64) -> f64 {
    10f64.powf(a - b * magnitude)
}

/// Magnitude at which the relation above `m_min` reaches exceedance
/// probability `1 − u`.
///
/// Inverse CDF of the exponential magnitude law: with `u ~ U(0, 1)` this
/// draws a magnitude from a Gutenberg-Richter population of slope `b`
/// truncated at `m_min`. Returns NaN for `u` outside `[0, 1)` or `b <= 0`.
pub fn exceedance_quantile(u: f64, b: f64, m_min: f64) -> f64 {
    if !(0.0..1.0).contains(&u) || b <= 0.0 || b.is_nan() {
        return f64::NAN;
    }
    m_min - (1.0 - u).log10() / b
}

/// A fitted Gutenberg-Richter relation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GutenbergRichter {
    pub a: f64,
    pub b: f64,
}

impl GutenbergRichter {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// `10^(a − b·magnitude)`.
    pub fn predicted_count(&self, magnitude: f64) -> f64 {
        10f64.powf(self.log10_count(magnitude))
    }

    /// `a − b·magnitude`.
    pub fn log10_count(&self, magnitude: f64) -> f64 {
        self.a - self.b * magnitude
    }

    /// The fitted line evaluated at each magnitude, in input order.
    pub fn curve(&self, magnitudes: &[f64]) -> Vec<f64> {
        magnitudes
            .iter()
            .map(|&m| self.predicted_count(m))
            .collect()
    }

    /// Magnitude at which the relation predicts `count` events.
    ///
    /// `None` for a flat relation or a non-positive count.
    pub fn magnitude_for_count(&self, count: f64) -> Option<f64> {
        if self.b == 0.0 || count <= 0.0 || count.is_nan() {
            return None;
        }
        Some((self.a - count.log10()) / self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicted_count_at_zero_magnitude_is_ten_to_a() {
        assert!((predicted_count(3.0, 1.0, 0.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn one_unit_of_magnitude_scales_by_ten_to_b() {
        let gr = GutenbergRichter::new(5.0, 1.0);
        let ratio = gr.predicted_count(3.0) / gr.predicted_count(4.0);
        assert!((ratio - 10.0).abs() < 1e-9);
    }

    #[test]
    fn method_and_free_function_agree_exactly() {
        let gr = GutenbergRichter::new(2.772_219_410_429_682, 0.605_992_300_330_119_1);
        assert_eq!(gr.predicted_count(3.0), predicted_count(gr.a, gr.b, 3.0));
    }

    #[test]
    fn log10_count_is_the_fitted_line() {
        let gr = GutenbergRichter::new(2.772, 0.606);
        assert_eq!(gr.log10_count(0.0), 2.772);
        assert!((gr.log10_count(4.0) - (2.772 - 0.606 * 4.0)).abs() < 1e-12);
        assert!((gr.log10_count(4.0) - gr.predicted_count(4.0).log10()).abs() < 1e-12);
    }

    #[test]
    fn curve_preserves_order() {
        let gr = GutenbergRichter::new(4.0, 1.0);
        let c = gr.curve(&[1.0, 2.0, 3.0]);
        assert_eq!(c.len(), 3);
        assert!(c[0] > c[1] && c[1] > c[2]);
    }

    #[test]
    fn magnitude_for_count_inverts() {
        let gr = GutenbergRichter::new(4.2, 0.9);
        let m = gr.magnitude_for_count(gr.predicted_count(3.7)).unwrap();
        assert!((m - 3.7).abs() < 1e-9);
        assert_eq!(GutenbergRichter::new(1.0, 0.0).magnitude_for_count(5.0), None);
        assert_eq!(gr.magnitude_for_count(0.0), None);
    }

    #[test]
    fn exceedance_quantile_bounds() {
        assert_eq!(exceedance_quantile(0.0, 1.0, 2.0), 2.0);
        assert!(exceedance_quantile(0.9, 1.0, 2.0) > 2.0);
        assert!((exceedance_quantile(0.9, 1.0, 2.0) - 3.0).abs() < 1e-12);
        assert!(exceedance_quantile(1.0, 1.0, 2.0).is_nan());
        assert!(exceedance_quantile(0.5, -1.0, 2.0).is_nan());
    }
}
