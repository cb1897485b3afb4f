//! Seismic event records as delivered by the catalog retrieval service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalog event.
///
/// `origin_time` is kept verbatim so a catalog written back out is
/// byte-identical to the one read in; [`SeismicEvent::origin_time_utc`]
/// parses it on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    /// ISO-8601-like timestamp, e.g. `2012-03-04T05:06:07.890000Z`.
    pub origin_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    /// Depth in kilometres; `None` when the origin has no depth.
    pub depth_km: Option<f64>,
}

impl SeismicEvent {
    /// Parse the origin time as UTC.
    ///
    /// Accepts RFC 3339 (`...Z`, `...+00:00`) and naive `YYYY-MM-DDTHH:MM:SS[.f]`
    /// or space-separated timestamps, which are taken as UTC.
    pub fn origin_time_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.origin_time.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        None
    }
}
