//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// A geographic bounding box in degrees.
///
/// Longitudes may be in either [-180, 180] or [0, 360]; the box itself does not
/// wrap, so a region crossing the antimeridian must be expressed in the
/// [0, 360] domain by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Parse a comma separated "min_lon,min_lat,max_lon,max_lat" string.
    pub fn parse(s: &str) -> GeoResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(GeoError::invalid_parameter(
                "bbox",
                format!("'{}', expected 'min_lon,min_lat,max_lon,max_lat'", s),
            ));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| GeoError::invalid_parameter("bbox", format!("invalid number '{}'", part)))?;
        }

        let bbox = Self::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that the box is finite, non-empty and has latitudes within [-90, 90].
    pub fn validate(&self) -> GeoResult<()> {
        let finite = [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(GeoError::invalid_parameter("bbox", "coordinates must be finite"));
        }
        if self.max_lon <= self.min_lon || self.max_lat <= self.min_lat {
            return Err(GeoError::invalid_parameter(
                "bbox",
                format!("empty or inverted extent {:?}", self),
            ));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(GeoError::invalid_parameter(
                "bbox",
                format!("latitude outside [-90, 90]: {} .. {}", self.min_lat, self.max_lat),
            ));
        }
        Ok(())
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Get the center point of the bounding box as (lon, lat).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_lon: self.min_lon.max(other.min_lon),
            min_lat: self.min_lat.max(other.min_lat),
            max_lon: self.max_lon.min(other.max_lon),
            max_lat: self.max_lat.min(other.max_lat),
        })
    }

    /// Smallest box enclosing every finite (lon, lat) pair, or None if there are none.
    pub fn enclosing<'a, I>(points: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = (&'a f64, &'a f64)>,
    {
        let mut bbox: Option<BoundingBox> = None;
        for (&lon, &lat) in points {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            bbox = Some(match bbox {
                None => BoundingBox::new(lon, lat, lon, lat),
                Some(b) => BoundingBox::new(
                    b.min_lon.min(lon),
                    b.min_lat.min(lat),
                    b.max_lon.max(lon),
                    b.max_lat.max(lat),
                ),
            });
        }
        bbox
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        // Global coverage
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }
}
