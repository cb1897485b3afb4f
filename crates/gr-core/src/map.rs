//! Map extent handed to the map collaborator.
//!
//! Region is the event bounding box padded by [`REGION_PAD_DEG`] on every
//! side; symbols scale as `0.02 · 2^magnitude`; the colour scale spans the
//! known depths.

use gr_common::SeismicEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Padding added around the event bounding box, in degrees.
pub const REGION_PAD_DEG: f64 = 0.1;

/// Symbol size at magnitude 0.
pub const SYMBOL_BASE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("cannot map an empty catalog")]
    EmptyCatalog,

    #[error("event {index} has a non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
}

impl MapError {
    pub fn to_common(&self) -> gr_common::Error {
        match self {
            MapError::EmptyCatalog => gr_common::Error::EmptyCatalog,
            MapError::NonFiniteCoordinate { .. } => {
                gr_common::Error::InvalidCatalog(self.to_string())
            }
        }
    }
}

/// One plotted event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: Option<f64>,
    pub size: f64,
}

/// Region, symbols and depth colour range for one catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    /// `[west, east, south, north]`.
    pub region: [f64; 4],
    /// `[min, max]` over events with a known depth; `None` if none has one.
    pub depth_range: Option<[f64; 2]>,
    pub points: Vec<MapPoint>,
}

pub fn symbol_size(magnitude: f64) -> f64 {
    SYMBOL_BASE * 2f64.powf(magnitude)
}

/// Compute the map extent of `events`.
pub fn map_extent(events: &[SeismicEvent]) -> Result<MapExtent, MapError> {
    if events.is_empty() {
        return Err(MapError::EmptyCatalog);
    }

    let mut west = f64::INFINITY;
    let mut east = f64::NEG_INFINITY;
    let mut south = f64::INFINITY;
    let mut north = f64::NEG_INFINITY;
    let mut depth_range: Option<[f64; 2]> = None;
    let mut points = Vec::with_capacity(events.len());

    for (index, event) in events.iter().enumerate() {
        if !event.latitude.is_finite() || !event.longitude.is_finite() {
            return Err(MapError::NonFiniteCoordinate {
                index,
                latitude: event.latitude,
                longitude: event.longitude,
            });
        }
        west = west.min(event.longitude);
        east = east.max(event.longitude);
        south = south.min(event.latitude);
        north = north.max(event.latitude);

        if let Some(depth) = event.depth_km.filter(|d| d.is_finite()) {
            depth_range = Some(match depth_range {
                Some([lo, hi]) => [lo.min(depth), hi.max(depth)],
                None => [depth, depth],
            });
        }

        points.push(MapPoint {
            longitude: event.longitude,
            latitude: event.latitude,
            depth_km: event.depth_km,
            size: symbol_size(event.magnitude),
        });
    }

    Ok(MapExtent {
        region: [
            west - REGION_PAD_DEG,
            east + REGION_PAD_DEG,
            south - REGION_PAD_DEG,
            north + REGION_PAD_DEG,
        ],
        depth_range,
        points,
    })
}
