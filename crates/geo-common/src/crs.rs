//! Projection definitions carried alongside a grid.
//!
//! These types only hold parameters. The forward/inverse math lives in the
//! `projection` crate, which dispatches on [`ProjectionKind`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeoError, GeoResult};

/// Authalic sphere radius used by the MODIS land sinusoidal grids (meters).
pub const MODIS_SPHERE_RADIUS: f64 = 6_371_007.181;

/// Sphere radius of the original NSIDC EASE-Grid (meters).
pub const EASE_SPHERE_RADIUS: f64 = 6_371_228.0;

/// Hemisphere of a polar projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// +1 for north, -1 for south.
    pub fn sign(&self) -> f64 {
        match self {
            Hemisphere::North => 1.0,
            Hemisphere::South => -1.0,
        }
    }
}

/// Reference ellipsoid given by semi-major axis and first eccentricity squared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub semi_major: f64,
    /// First eccentricity squared
    pub eccentricity_squared: f64,
}

impl Ellipsoid {
    /// Hughes 1980 ellipsoid used by the NSIDC polar stereographic grids.
    pub const HUGHES_1980: Ellipsoid = Ellipsoid {
        semi_major: 6_378_273.0,
        eccentricity_squared: 0.006_693_883,
    };

    /// WGS84 ellipsoid.
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        eccentricity_squared: 0.006_694_379_990_14,
    };

    /// A sphere of the given radius expressed as a degenerate ellipsoid.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            eccentricity_squared: 0.0,
        }
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared.sqrt()
    }
}

/// A named projected coordinate system with exactly the parameters its
/// forward/inverse formulas need. Angles are in degrees, lengths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Spherical sinusoidal, central meridian at Greenwich.
    Sinusoidal { radius: f64 },
    /// Spherical Lambert azimuthal equal-area (EASE-Grid north/south).
    LambertAzimuthalEqualArea {
        radius: f64,
        center_lat: f64,
        center_lon: f64,
    },
    /// Ellipsoidal polar stereographic.
    PolarStereographic {
        hemisphere: Hemisphere,
        true_scale_lat: f64,
        central_meridian: f64,
        ellipsoid: Ellipsoid,
    },
    /// Plain longitude/latitude; transforms are the identity.
    Geographic,
    /// A projection named by a product or by file metadata for which no
    /// transform exists. Transforming with it is always an error.
    Other { name: String },
}

impl ProjectionKind {
    /// MODIS land tile sinusoidal grid.
    pub fn modis_sinusoidal() -> Self {
        ProjectionKind::Sinusoidal {
            radius: MODIS_SPHERE_RADIUS,
        }
    }

    /// Northern hemisphere EASE-Grid (azimuthal, original 1992 definition).
    pub fn ease_grid_north() -> Self {
        ProjectionKind::LambertAzimuthalEqualArea {
            radius: EASE_SPHERE_RADIUS,
            center_lat: 90.0,
            center_lon: 0.0,
        }
    }

    /// Southern hemisphere EASE-Grid (azimuthal, original 1992 definition).
    pub fn ease_grid_south() -> Self {
        ProjectionKind::LambertAzimuthalEqualArea {
            radius: EASE_SPHERE_RADIUS,
            center_lat: -90.0,
            center_lon: 0.0,
        }
    }

    /// NSIDC sea ice polar stereographic north (true scale at 70°N, 45°W up).
    pub fn nsidc_polar_north() -> Self {
        ProjectionKind::PolarStereographic {
            hemisphere: Hemisphere::North,
            true_scale_lat: 70.0,
            central_meridian: -45.0,
            ellipsoid: Ellipsoid::HUGHES_1980,
        }
    }

    /// NSIDC sea ice polar stereographic south (true scale at 70°S).
    pub fn nsidc_polar_south() -> Self {
        ProjectionKind::PolarStereographic {
            hemisphere: Hemisphere::South,
            true_scale_lat: -70.0,
            central_meridian: 0.0,
            ellipsoid: Ellipsoid::HUGHES_1980,
        }
    }

    /// Short identifier used in logs and configuration.
    pub fn name(&self) -> &str {
        match self {
            ProjectionKind::Sinusoidal { .. } => "sinusoidal",
            ProjectionKind::LambertAzimuthalEqualArea { .. } => "lambert_azimuthal_equal_area",
            ProjectionKind::PolarStereographic { .. } => "polar_stereographic",
            ProjectionKind::Geographic => "geographic",
            ProjectionKind::Other { name } => name,
        }
    }

    /// Check if coordinates under this projection are already lon/lat degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(self, ProjectionKind::Geographic)
    }

    /// Validate the numeric parameters.
    ///
    /// An [`ProjectionKind::Other`] passes validation; it is rejected when a
    /// transform is requested.
    pub fn validate(&self) -> GeoResult<()> {
        match self {
            ProjectionKind::Sinusoidal { radius } => check_radius(*radius),
            ProjectionKind::LambertAzimuthalEqualArea {
                radius,
                center_lat,
                center_lon,
            } => {
                check_radius(*radius)?;
                check_lat("center_lat", *center_lat)?;
                check_finite("center_lon", *center_lon)
            }
            ProjectionKind::PolarStereographic {
                hemisphere,
                true_scale_lat,
                central_meridian,
                ellipsoid,
            } => {
                check_lat("true_scale_lat", *true_scale_lat)?;
                if *true_scale_lat == 0.0 || true_scale_lat.signum() != hemisphere.sign() {
                    return Err(GeoError::invalid_parameter(
                        "true_scale_lat",
                        format!(
                            "{} is not in the {:?} hemisphere",
                            true_scale_lat, hemisphere
                        ),
                    ));
                }
                check_finite("central_meridian", *central_meridian)?;
                check_radius(ellipsoid.semi_major)?;
                if !(0.0..1.0).contains(&ellipsoid.eccentricity_squared) {
                    return Err(GeoError::invalid_parameter(
                        "eccentricity_squared",
                        format!("{} outside [0, 1)", ellipsoid.eccentricity_squared),
                    ));
                }
                Ok(())
            }
            ProjectionKind::Geographic | ProjectionKind::Other { .. } => Ok(()),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn check_radius(radius: f64) -> GeoResult<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GeoError::invalid_parameter(
            "radius",
            format!("{} must be a positive length", radius),
        ))
    }
}

fn check_lat(param: &str, lat: f64) -> GeoResult<()> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(GeoError::invalid_parameter(param, format!("{} outside [-90, 90]", lat)))
    }
}

fn check_finite(param: &str, value: f64) -> GeoResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeoError::invalid_parameter(param, "must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_projections_validate() {
        for kind in [
            ProjectionKind::modis_sinusoidal(),
            ProjectionKind::ease_grid_north(),
            ProjectionKind::ease_grid_south(),
            ProjectionKind::nsidc_polar_north(),
            ProjectionKind::nsidc_polar_south(),
            ProjectionKind::Geographic,
        ] {
            kind.validate().unwrap();
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(ProjectionKind::Sinusoidal { radius: 0.0 }.validate().is_err());
        assert!(ProjectionKind::Sinusoidal { radius: f64::NAN }.validate().is_err());

        let wrong_hemisphere = ProjectionKind::PolarStereographic {
            hemisphere: Hemisphere::South,
            true_scale_lat: 70.0,
            central_meridian: 0.0,
            ellipsoid: Ellipsoid::HUGHES_1980,
        };
        assert!(wrong_hemisphere.validate().is_err());

        let bad_center = ProjectionKind::LambertAzimuthalEqualArea {
            radius: EASE_SPHERE_RADIUS,
            center_lat: 95.0,
            center_lon: 0.0,
        };
        assert!(bad_center.validate().is_err());
    }

    #[test]
    fn test_yaml_tagged_form() {
        let kind: ProjectionKind =
            serde_yaml::from_str("kind: sinusoidal\nradius: 6371007.181\n").unwrap();
        assert_eq!(kind, ProjectionKind::modis_sinusoidal());

        let kind: ProjectionKind = serde_yaml::from_str("kind: geographic\n").unwrap();
        assert!(kind.is_geographic());

        let kind: ProjectionKind = serde_yaml::from_str("kind: other\nname: utm\n").unwrap();
        assert_eq!(kind.name(), "utm");
    }
}
