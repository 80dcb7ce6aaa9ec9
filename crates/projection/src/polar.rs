//! Ellipsoidal polar stereographic projection (NSIDC sea ice grids).
//!
//! Formulas follow Snyder, Map Projections: A Working Manual, §21, for the
//! north polar aspect. The south aspect is handled by mirroring: latitudes,
//! longitudes and the central meridian are negated, the north formulas are
//! applied, and the resulting x/y are negated.

use crate::MapProjection;
use geo_common::{normalize_longitude, Ellipsoid, Hemisphere, LongitudeDomain};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE: f64 = 1e-14;

/// Polar stereographic projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct PolarStereographic {
    pub hemisphere: Hemisphere,
    /// Latitude of true scale in degrees (signed)
    pub true_scale_lat: f64,
    /// Longitude pointing "down" from the pole in degrees
    pub central_meridian: f64,
    pub ellipsoid: Ellipsoid,
    /// First eccentricity
    e: f64,
    /// ρ / t
    rho_per_t: f64,
}

impl PolarStereographic {
    pub fn new(
        hemisphere: Hemisphere,
        true_scale_lat: f64,
        central_meridian: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let e = ellipsoid.eccentricity();
        let a = ellipsoid.semi_major;
        let phi_c = (hemisphere.sign() * true_scale_lat).to_radians();

        let rho_per_t = if (phi_c - FRAC_PI_2).abs() < 1e-10 {
            2.0 * a / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            a * m(phi_c, e) / t(phi_c, e)
        };

        Self {
            hemisphere,
            true_scale_lat,
            central_meridian,
            ellipsoid,
            e,
            rho_per_t,
        }
    }

    /// NSIDC north grid: Hughes 1980, true scale at 70°N, 45°W at the bottom.
    pub fn nsidc_north() -> Self {
        Self::new(Hemisphere::North, 70.0, -45.0, Ellipsoid::HUGHES_1980)
    }

    /// NSIDC south grid: Hughes 1980, true scale at 70°S, 0° at the top.
    pub fn nsidc_south() -> Self {
        Self::new(Hemisphere::South, -70.0, 0.0, Ellipsoid::HUGHES_1980)
    }

    /// Geodetic latitude from the isometric t value, by fixed-point iteration.
    fn phi_from_t(&self, t_val: f64) -> f64 {
        let e = self.e;
        let mut phi = FRAC_PI_2 - 2.0 * t_val.atan();
        for _ in 0..MAX_ITERATIONS {
            let es = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t_val * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
            let delta = (next - phi).abs();
            phi = next;
            if delta < CONVERGENCE {
                break;
            }
        }
        phi
    }
}

fn t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

fn m(phi: f64, e: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e * e * s * s).sqrt()
}

impl MapProjection for PolarStereographic {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let s = self.hemisphere.sign();
        let phi = (s * lat).to_radians();
        if phi <= -FRAC_PI_2 + 1e-12 {
            // Opposite pole projects to infinity.
            return None;
        }
        let dlam = (s * lon).to_radians() - (s * self.central_meridian).to_radians();

        let rho = self.rho_per_t * t(phi, self.e);
        let x = rho * dlam.sin();
        let y = -rho * dlam.cos();
        Some((s * x, s * y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let s = self.hemisphere.sign();
        let (xn, yn) = (s * x, s * y);
        let rho = xn.hypot(yn);
        if rho < 1e-10 {
            return Some((
                normalize_longitude(self.central_meridian, LongitudeDomain::Signed),
                s * 90.0,
            ));
        }

        let phi = self.phi_from_t(rho / self.rho_per_t);
        let lam = (s * self.central_meridian).to_radians() + xn.atan2(-yn);

        Some((
            normalize_longitude(s * lam.to_degrees(), LongitudeDomain::Signed),
            s * phi.to_degrees(),
        ))
    }
}
