//! Longitude domain normalization.
//!
//! Sources mix [-180, 180] and [0, 360] longitudes. Mesh construction and
//! display need one continuous domain, so callers pick one explicitly and
//! normalize before building meshes: a swath crossing the antimeridian
//! should be moved to [0, 360], one crossing Greenwich to [-180, 180].

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// Target longitude domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeDomain {
    /// [-180, 180]
    Signed,
    /// [0, 360]
    Positive,
}

impl LongitudeDomain {
    /// Parse "-180..180"/"signed" or "0..360"/"positive".
    pub fn parse(s: &str) -> GeoResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "signed" | "-180..180" | "[-180,180]" => Ok(Self::Signed),
            "positive" | "0..360" | "[0,360]" => Ok(Self::Positive),
            other => Err(GeoError::invalid_parameter(
                "longitude_domain",
                format!("'{}', expected 'signed' or 'positive'", other),
            )),
        }
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Signed => (-180.0, 180.0),
            Self::Positive => (0.0, 360.0),
        }
    }
}

/// Map a longitude into `domain`.
///
/// Values already inside the closed domain are returned unchanged, so both
/// -180 and 180 survive in the signed domain. NaN passes through.
pub fn normalize_longitude(lon: f64, domain: LongitudeDomain) -> f64 {
    let (lo, hi) = domain.bounds();
    if !lon.is_finite() || (lo..=hi).contains(&lon) {
        return lon;
    }
    (lon - lo).rem_euclid(360.0) + lo
}

/// Normalize a slice of longitudes into a new vector.
pub fn normalize_longitudes(lons: &[f64], domain: LongitudeDomain) -> Vec<f64> {
    lons.iter().map(|&lon| normalize_longitude(lon, domain)).collect()
}

/// Check if consecutive samples jump by more than 180°, which is how a track
/// crossing the edge of the current domain shows up.
pub fn spans_dateline(lons: &[f64]) -> bool {
    lons.windows(2)
        .any(|w| w[0].is_finite() && w[1].is_finite() && (w[1] - w[0]).abs() > 180.0)
}
