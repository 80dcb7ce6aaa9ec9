//! Geographic (lon/lat) pass-through.

use crate::MapProjection;

/// Identity projection: coordinates are already degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl MapProjection for Geographic {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        Some((lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some((x, y))
    }
}
