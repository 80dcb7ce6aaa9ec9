//! Map projection transforms for gridded satellite products.
//!
//! Each projection is a small struct holding precomputed constants with
//! scalar `forward` (lon/lat degrees to meters) and `inverse` (meters to
//! lon/lat degrees) methods. [`ProjectionTransformer`] dispatches on a
//! [`geo_common::ProjectionKind`] and applies a projection over whole arrays.

pub mod geographic;
pub mod lambert_azimuthal;
pub mod polar;
pub mod sinusoidal;
pub mod transform;

pub use geographic::Geographic;
pub use lambert_azimuthal::LambertAzimuthalEqualArea;
pub use polar::PolarStereographic;
pub use sinusoidal::Sinusoidal;
pub use transform::ProjectionTransformer;

/// Scalar forward/inverse pair.
///
/// Both directions return `None` for points outside the projection's domain
/// (past the edge of the map, the antipode of an azimuthal center, the
/// opposite pole of a polar projection).
pub trait MapProjection {
    /// Geographic (lon, lat) in degrees to projected (x, y) in meters.
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;

    /// Projected (x, y) in meters to geographic (lon, lat) in degrees.
    ///
    /// Longitudes come back in [-180, 180].
    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Wrap a longitude difference in radians to [-π, π].
///
/// Values already in range are returned unchanged, so both ±π survive.
pub(crate) fn wrap_radians(dlon: f64) -> f64 {
    use std::f64::consts::PI;
    if (-PI..=PI).contains(&dlon) {
        return dlon;
    }
    (dlon + PI).rem_euclid(2.0 * PI) - PI
}
