//! Gutenberg-Richter b-value estimation.
//!
//! Pure functions over an in-memory magnitude catalog:
//! - [`estimate`]: Aki (1965) maximum-likelihood a/b with Aki and Shi & Bolt
//!   uncertainties
//! - [`histogram`]: per-bin and cumulative frequency-magnitude distribution
//! - [`GutenbergRichter`]: the fitted relation log10(N) = a − b·M

pub mod math;

pub use math::aki::{estimate, BValueEstimate, BValueFit, EstimateError};
pub use math::binning::{histogram, BinningError, FrequencyBin, FrequencyDistribution};
pub use math::catalog::{CatalogError, MagnitudeCatalog};
pub use math::gutenberg_richter::{exceedance_quantile, predicted_count, GutenbergRichter};
pub use math::stable::*;
