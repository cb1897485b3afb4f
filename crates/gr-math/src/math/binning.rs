//! Frequency-magnitude binning and the cumulative (survival) distribution.
//!
//! Bin edges start at the smallest magnitude and step by the bin width up to
//! one bin beyond the largest magnitude:
//!
//! ```text
//! edges = min, min + Δm, min + 2Δm, ...   (ceil((max + Δm − min) / Δm) edges)
//! ```
//!
//! Bins are half-open `[lo, hi)` except the last, which is closed so that the
//! largest magnitude is always counted. The cumulative count of a bin is the
//! number of events in that bin or any higher one.

use super::catalog::MagnitudeCatalog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the number of bins a single histogram may allocate.
pub const MAX_BINS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinningError {
    #[error("cannot bin an empty catalog")]
    EmptyCatalog,

    #[error("bin width must be finite and positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("magnitude range {min}..{max} at bin width {bin_width} needs more than {max_bins} bins")]
    TooManyBins {
        min: f64,
        max: f64,
        bin_width: f64,
        max_bins: usize,
    },
}

/// One magnitude bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBin {
    /// Mean of the bin's two edges.
    pub midpoint: f64,
    /// Events falling in this bin.
    pub count: u64,
    /// Events in this bin or any higher bin.
    pub cumulative: u64,
}

/// Per-bin and cumulative counts over a catalog's magnitude range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyDistribution {
    pub bin_width: f64,
    /// `bins.len() + 1` edges, ascending.
    pub edges: Vec<f64>,
    pub bins: Vec<FrequencyBin>,
}

impl FrequencyDistribution {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn midpoints(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.midpoint).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn cumulative(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.cumulative).collect()
    }

    /// Number of binned events (the cumulative count of the lowest bin).
    pub fn total(&self) -> u64 {
        self.bins.first().map_or(0, |b| b.cumulative)
    }
}

/// Bin edges covering `[min, max]` at width `bin_width`.
fn bin_edges(min: f64, max: f64, bin_width: f64) -> Result<Vec<f64>, BinningError> {
    let span = (max + bin_width - min) / bin_width;
    let too_many = || BinningError::TooManyBins {
        min,
        max,
        bin_width,
        max_bins: MAX_BINS,
    };
    if !span.is_finite() || span > MAX_BINS as f64 {
        return Err(too_many());
    }

    // At least one bin, even when min == max.
    let n_edges = (span.ceil() as usize).max(2);
    let mut edges: Vec<f64> = (0..n_edges)
        .map(|i| min + i as f64 * bin_width)
        .collect();

    // Rounding can leave the last edge a hair below max.
    if let Some(&last) = edges.last() {
        if last < max {
            edges.push(min + n_edges as f64 * bin_width);
        }
    }
    if edges.len() - 1 > MAX_BINS {
        return Err(too_many());
    }
    Ok(edges)
}

/// Index of the bin containing `m`, or `None` outside `[edges[0], edges[last]]`.
fn bin_index(edges: &[f64], min: f64, bin_width: f64, m: f64) -> Option<usize> {
    let n_bins = edges.len() - 1;
    if m < edges[0] || m > edges[n_bins] {
        return None;
    }
    let mut idx = (((m - min) / bin_width).floor() as usize).min(n_bins - 1);
    // The arithmetic guess can be one off near an edge; the edges decide.
    if m < edges[idx] {
        idx = idx.saturating_sub(1);
    } else if idx + 1 < n_bins && m >= edges[idx + 1] {
        idx += 1;
    }
    Some(idx)
}

/// Build the frequency-magnitude distribution of `catalog`.
///
/// # Arguments
/// * `catalog` - Non-empty magnitude catalog
/// * `bin_width` - Magnitude bin width (> 0)
///
/// # Returns
/// Bins ordered by ascending magnitude. Cumulative counts are a suffix sum
/// over the per-bin counts, so they never increase with bin index and the
/// first equals the catalog size.
pub fn histogram(
    catalog: &MagnitudeCatalog,
    bin_width: f64,
) -> Result<FrequencyDistribution, BinningError> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(BinningError::InvalidBinWidth(bin_width));
    }
    let (min, max) = catalog.range().ok_or(BinningError::EmptyCatalog)?;
    let edges = bin_edges(min, max, bin_width)?;
    let n_bins = edges.len() - 1;

    let mut counts = vec![0_u64; n_bins];
    for m in catalog.iter() {
        if let Some(idx) = bin_index(&edges, min, bin_width, m) {
            counts[idx] += 1;
        }
    }

    // Suffix sum: cumulative[i] = counts[i] + cumulative[i + 1].
    let mut bins = vec![
        FrequencyBin {
            midpoint: 0.0,
            count: 0,
            cumulative: 0,
        };
        n_bins
    ];
    let mut running = 0_u64;
    for i in (0..n_bins).rev() {
        running += counts[i];
        bins[i] = FrequencyBin {
            midpoint: 0.5 * (edges[i] + edges[i + 1]),
            count: counts[i],
            cumulative: running,
        };
    }

    Ok(FrequencyDistribution {
        bin_width,
        edges,
        bins,
    })
}
