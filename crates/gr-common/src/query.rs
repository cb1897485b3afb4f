//! Catalog query handed to the event retrieval service.
//!
//! Retrieval itself happens outside this workspace; this type describes the
//! request (FDSN event web-service parameters) and validates it.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default FDSN event endpoint.
pub const DEFAULT_FDSN_BASE: &str = "https://service.iris.edu/fdsnws/event/1/query";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("{field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("{field} {value} outside [{lo}, {hi}]")]
    OutOfBounds {
        field: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
    },

    #[error("catalog name {0:?} must be non-empty ASCII alphanumerics, '-' or '_'")]
    InvalidCatalogName(String),
}

/// Spatial, temporal, magnitude and depth window of a catalog request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_depth_km: f64,
    pub max_depth_km: f64,
    /// Contributing catalog, e.g. `ISC`.
    pub catalog: String,
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl Default for CatalogQuery {
    /// Garhwal-Kumaon Himalaya, 2010-2020, all magnitudes, upper 100 km.
    fn default() -> Self {
        Self {
            min_latitude: 29.0,
            max_latitude: 32.0,
            min_longitude: 77.0,
            max_longitude: 81.0,
            start_time: utc_midnight(2010, 1, 1),
            end_time: utc_midnight(2020, 1, 1),
            min_magnitude: 0.0,
            max_magnitude: 10.0,
            min_depth_km: 0.0,
            max_depth_km: 100.0,
            catalog: "ISC".to_string(),
        }
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), QueryError> {
    if min > max || min.is_nan() || max.is_nan() {
        return Err(QueryError::InvertedRange {
            field,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

fn within(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<(), QueryError> {
    if !(lo..=hi).contains(&value) {
        return Err(QueryError::OutOfBounds {
            field,
            value,
            lo,
            hi,
        });
    }
    Ok(())
}

impl CatalogQuery {
    /// Check ordered ranges, coordinate bounds and the catalog name.
    pub fn validate(&self) -> Result<(), QueryError> {
        within("min_latitude", self.min_latitude, -90.0, 90.0)?;
        within("max_latitude", self.max_latitude, -90.0, 90.0)?;
        within("min_longitude", self.min_longitude, -180.0, 180.0)?;
        within("max_longitude", self.max_longitude, -180.0, 180.0)?;
        ordered("latitude", self.min_latitude, self.max_latitude)?;
        ordered("longitude", self.min_longitude, self.max_longitude)?;
        ordered("magnitude", self.min_magnitude, self.max_magnitude)?;
        ordered("depth", self.min_depth_km, self.max_depth_km)?;
        if self.start_time > self.end_time {
            return Err(QueryError::InvertedRange {
                field: "time",
                min: self.start_time.to_rfc3339(),
                max: self.end_time.to_rfc3339(),
            });
        }
        let name_ok = !self.catalog.is_empty()
            && self
                .catalog
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !name_ok {
            return Err(QueryError::InvalidCatalogName(self.catalog.clone()));
        }
        Ok(())
    }

    /// FDSN event-service parameters in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let time = |t: &DateTime<Utc>| t.format("%Y-%m-%dT%H:%M:%S").to_string();
        vec![
            ("starttime", time(&self.start_time)),
            ("endtime", time(&self.end_time)),
            ("minlatitude", self.min_latitude.to_string()),
            ("maxlatitude", self.max_latitude.to_string()),
            ("minlongitude", self.min_longitude.to_string()),
            ("maxlongitude", self.max_longitude.to_string()),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("maxmagnitude", self.max_magnitude.to_string()),
            ("mindepth", self.min_depth_km.to_string()),
            ("maxdepth", self.max_depth_km.to_string()),
            ("catalog", self.catalog.clone()),
        ]
    }

    /// Full request URL against `base`.
    ///
    /// Validates first; every emitted value is URL-safe once validation passes.
    pub fn to_url(&self, base: &str) -> Result<String, QueryError> {
        self.validate()?;
        let query = self
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{base}?{query}"))
    }
}
