//! Spherical sinusoidal projection (MODIS land tiles).
//!
//! Equal-area pseudo-cylindrical with the central meridian at Greenwich:
//! - x = R · λ · cos φ
//! - y = R · φ

use crate::{wrap_radians, MapProjection};
use geo_common::MODIS_SPHERE_RADIUS;
use std::f64::consts::{FRAC_PI_2, PI};

/// Tolerance for points that sit exactly on the map edge.
const EDGE_EPS: f64 = 1e-9;

/// Sinusoidal projection on a sphere.
#[derive(Debug, Clone, Copy)]
pub struct Sinusoidal {
    /// Sphere radius (meters)
    pub radius: f64,
}

impl Sinusoidal {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// The MODIS authalic sphere.
    pub fn modis() -> Self {
        Self::new(MODIS_SPHERE_RADIUS)
    }
}

impl MapProjection for Sinusoidal {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let phi = lat.to_radians();
        let lam = wrap_radians(lon.to_radians());
        Some((self.radius * lam * phi.cos(), self.radius * phi))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let phi = y / self.radius;
        if phi.abs() > FRAC_PI_2 + EDGE_EPS {
            return None;
        }
        let phi = phi.clamp(-FRAC_PI_2, FRAC_PI_2);
        let cos_phi = phi.cos();
        if cos_phi < 1e-12 {
            // The pole is a single point; any x on that row maps to it.
            return Some((0.0, phi.to_degrees()));
        }
        let lam = x / (self.radius * cos_phi);
        if lam.abs() > PI + EDGE_EPS {
            return None;
        }
        Some((lam.clamp(-PI, PI).to_degrees(), phi.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let proj = Sinusoidal::modis();
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn test_modis_tile_corner() {
        // Upper-left corner of tile h08v05 sits at 40°N on the 10° tile boundary.
        let proj = Sinusoidal::modis();
        let (lon, lat) = proj.inverse(-11_119_505.196667, 4_447_802.078667).unwrap();
        assert!((lat - 40.0).abs() < 1e-6, "lat = {}", lat);
        assert!((lon + 130.5407).abs() < 1e-3, "lon = {}", lon);
    }

    #[test]
    fn test_outside_map_edge() {
        let proj = Sinusoidal::modis();
        // At 60°N the map is only half as wide as at the equator.
        let half_width = proj.radius * PI;
        assert!(proj.inverse(half_width * 0.9, proj.radius * 60f64.to_radians()).is_none());
        assert!(proj.inverse(0.0, proj.radius * 2.0).is_none());
        assert!(proj.forward(0.0, 91.0).is_none());
    }

    #[test]
    fn test_roundtrip() {
        let proj = Sinusoidal::modis();
        for &(lon, lat) in &[(-179.9, -85.0), (-45.0, 12.0), (0.0, 0.0), (120.0, 60.0), (180.0, 85.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-9, "{} -> {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "{} -> {}", lat, lat2);
        }
    }
}
