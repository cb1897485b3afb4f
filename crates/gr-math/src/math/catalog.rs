//! Magnitude catalog: the validated, read-only input to every statistic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a [`MagnitudeCatalog`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("magnitude at index {index} is not a finite number ({value})")]
    NonFiniteMagnitude { index: usize, value: f64 },
}

/// An ordered, immutable sequence of earthquake magnitudes.
///
/// Every value is finite. Order carries no meaning for the statistics, but it
/// is preserved so callers can line magnitudes back up with their events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MagnitudeCatalog {
    magnitudes: Vec<f64>,
}

impl MagnitudeCatalog {
    /// Build a catalog, rejecting NaN and infinite magnitudes.
    pub fn new(magnitudes: Vec<f64>) -> Result<Self, CatalogError> {
        if let Some((index, &value)) = magnitudes
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite())
        {
            return Err(CatalogError::NonFiniteMagnitude { index, value });
        }
        Ok(Self { magnitudes })
    }

    /// Build a catalog from a borrowed slice.
    pub fn from_slice(magnitudes: &[f64]) -> Result<Self, CatalogError> {
        Self::new(magnitudes.to_vec())
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.magnitudes.iter().copied()
    }

    /// Smallest magnitude, `None` for an empty catalog.
    pub fn min(&self) -> Option<f64> {
        self.iter().reduce(f64::min)
    }

    /// Largest magnitude, `None` for an empty catalog.
    pub fn max(&self) -> Option<f64> {
        self.iter().reduce(f64::max)
    }

    /// `(min, max)` in a single pass.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut it = self.iter();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m))))
    }

    /// Magnitudes strictly greater than `cutoff`, in catalog order.
    pub fn above(&self, cutoff: f64) -> Vec<f64> {
        self.iter().filter(|&m| m > cutoff).collect()
    }
}

impl TryFrom<Vec<f64>> for MagnitudeCatalog {
    type Error = CatalogError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MagnitudeCatalog> for Vec<f64> {
    fn from(catalog: MagnitudeCatalog) -> Self {
        catalog.magnitudes
    }
}
