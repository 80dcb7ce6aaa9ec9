//! Spherical Lambert azimuthal equal-area projection.
//!
//! Used by the original EASE-Grid north and south hemisphere grids, which
//! are centered on the poles. Oblique centers are supported as well.
//!
//! Forward (Snyder, Map Projections: A Working Manual, eq. 24-2..24-4):
//! - k' = sqrt(2 / (1 + sin φ1 sin φ + cos φ1 cos φ cos(λ - λ0)))
//! - x = R k' cos φ sin(λ - λ0)
//! - y = R k' (cos φ1 sin φ - sin φ1 cos φ cos(λ - λ0))

use crate::{wrap_radians, MapProjection};
use geo_common::normalize_longitude;
use geo_common::LongitudeDomain;

/// Lambert azimuthal equal-area projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct LambertAzimuthalEqualArea {
    /// Sphere radius (meters)
    pub radius: f64,
    /// Latitude of the projection center in radians
    pub lat0: f64,
    /// Longitude of the projection center in radians
    pub lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl LambertAzimuthalEqualArea {
    /// Create a projection centered on (`center_lon`, `center_lat`) degrees.
    pub fn new(radius: f64, center_lat: f64, center_lon: f64) -> Self {
        let lat0 = center_lat.to_radians();
        Self {
            radius,
            lat0,
            lon0: center_lon.to_radians(),
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
        }
    }
}

impl MapProjection for LambertAzimuthalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let phi = lat.to_radians();
        let dlam = wrap_radians(lon.to_radians() - self.lon0);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let cos_dlam = dlam.cos();

        let denom = 1.0 + self.sin_lat0 * sin_phi + self.cos_lat0 * cos_phi * cos_dlam;
        if denom <= 1e-15 {
            // Antipode of the center maps to the whole bounding circle.
            return None;
        }
        let k = (2.0 / denom).sqrt();

        let x = self.radius * k * cos_phi * dlam.sin();
        let y = self.radius * k * (self.cos_lat0 * sin_phi - self.sin_lat0 * cos_phi * cos_dlam);
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let rho = x.hypot(y);
        if rho < 1e-10 {
            return Some((
                normalize_longitude(self.lon0.to_degrees(), LongitudeDomain::Signed),
                self.lat0.to_degrees(),
            ));
        }

        let s = rho / (2.0 * self.radius);
        if s > 1.0 + 1e-12 {
            return None;
        }
        let c = 2.0 * s.min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let phi = (cos_c * self.sin_lat0 + y * sin_c * self.cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lam = self.lon0
            + (x * sin_c).atan2(rho * self.cos_lat0 * cos_c - y * self.sin_lat0 * sin_c);

        Some((
            normalize_longitude(lam.to_degrees(), LongitudeDomain::Signed),
            phi.to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::EASE_SPHERE_RADIUS;

    #[test]
    fn test_snyder_oblique_example() {
        // Snyder p. 334: R = 3, center (40°N, 100°W), point (20°S, 100°E)
        let proj = LambertAzimuthalEqualArea::new(3.0, 40.0, -100.0);
        let (x, y) = proj.forward(100.0, -20.0).unwrap();
        assert!((x + 4.2339303).abs() < 1e-6, "x = {}", x);
        assert!((y - 4.0257775).abs() < 1e-6, "y = {}", y);

        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon - 100.0).abs() < 1e-9);
        assert!((lat + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_polar_aspect() {
        let proj = LambertAzimuthalEqualArea::new(EASE_SPHERE_RADIUS, 90.0, 0.0);

        let (x, y) = proj.forward(0.0, 90.0).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

        // The equator is a circle of radius R·sqrt(2); 0° lies straight down.
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!((y + EASE_SPHERE_RADIUS * 2f64.sqrt()).abs() < 1e-6);

        // 90°E lies to the right.
        let (x, y) = proj.forward(90.0, 0.0).unwrap();
        assert!((x - EASE_SPHERE_RADIUS * 2f64.sqrt()).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_center_and_outside_disk() {
        let proj = LambertAzimuthalEqualArea::new(EASE_SPHERE_RADIUS, -90.0, 0.0);
        assert_eq!(proj.inverse(0.0, 0.0), Some((0.0, -90.0)));
        assert!(proj.inverse(2.1 * EASE_SPHERE_RADIUS, 0.0).is_none());
        // Antipode of a south-centered projection is the north pole.
        assert!(proj.forward(0.0, 90.0).is_none());
    }

    #[test]
    fn test_roundtrip_both_hemispheres() {
        for center in [90.0, -90.0] {
            let proj = LambertAzimuthalEqualArea::new(EASE_SPHERE_RADIUS, center, 0.0);
            for lon in [-179.0, -90.0, -12.5, 0.0, 45.0, 179.0] {
                for lat in [-85.0, -30.0, 0.0, 30.0, 85.0] {
                    let (x, y) = proj.forward(lon, lat).unwrap();
                    let (lon2, lat2) = proj.inverse(x, y).unwrap();
                    assert!((lon - lon2).abs() < 1e-6, "{} -> {}", lon, lon2);
                    assert!((lat - lat2).abs() < 1e-6, "{} -> {}", lat, lat2);
                }
            }
        }
    }
}
