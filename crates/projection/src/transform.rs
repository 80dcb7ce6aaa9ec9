//! Array-level projection dispatch.

use crate::{
    Geographic, LambertAzimuthalEqualArea, MapProjection, PolarStereographic, Sinusoidal,
};
use geo_common::{GeoError, GeoResult, ProjectionKind};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use tracing::debug;

/// Arrays at least this large are transformed on the rayon pool.
const PARALLEL_THRESHOLD: usize = 65_536;

/// A concrete projection selected from a [`ProjectionKind`].
#[derive(Debug, Clone, Copy)]
pub enum ProjectionTransformer {
    Sinusoidal(Sinusoidal),
    LambertAzimuthal(LambertAzimuthalEqualArea),
    PolarStereographic(PolarStereographic),
    Geographic(Geographic),
}

impl ProjectionTransformer {
    /// Build the transformer for `kind`.
    ///
    /// Fails with [`GeoError::UnsupportedProjection`] for
    /// [`ProjectionKind::Other`]; there is no fallback to a default projection.
    pub fn new(kind: &ProjectionKind) -> GeoResult<Self> {
        kind.validate()?;
        let transformer = match kind {
            ProjectionKind::Sinusoidal { radius } => Self::Sinusoidal(Sinusoidal::new(*radius)),
            ProjectionKind::LambertAzimuthalEqualArea {
                radius,
                center_lat,
                center_lon,
            } => Self::LambertAzimuthal(LambertAzimuthalEqualArea::new(
                *radius,
                *center_lat,
                *center_lon,
            )),
            ProjectionKind::PolarStereographic {
                hemisphere,
                true_scale_lat,
                central_meridian,
                ellipsoid,
            } => Self::PolarStereographic(PolarStereographic::new(
                *hemisphere,
                *true_scale_lat,
                *central_meridian,
                *ellipsoid,
            )),
            ProjectionKind::Geographic => Self::Geographic(Geographic),
            ProjectionKind::Other { name } => {
                return Err(GeoError::UnsupportedProjection(name.clone()))
            }
        };
        Ok(transformer)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sinusoidal(_) => "sinusoidal",
            Self::LambertAzimuthal(_) => "lambert_azimuthal_equal_area",
            Self::PolarStereographic(_) => "polar_stereographic",
            Self::Geographic(_) => "geographic",
        }
    }

    /// Project a single lon/lat point. `None` outside the projection domain.
    pub fn forward_point(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        self.projection().forward(lon, lat)
    }

    /// Unproject a single x/y point. `None` outside the projection domain.
    pub fn inverse_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.projection().inverse(x, y)
    }

    /// Transform projected coordinate arrays to (lon, lat) arrays of the same
    /// shape. Points outside the projection domain become NaN.
    pub fn to_geographic<S1, S2, D>(
        &self,
        x: &ArrayBase<S1, D>,
        y: &ArrayBase<S2, D>,
    ) -> GeoResult<(Array<f64, D>, Array<f64, D>)>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        let proj = self.projection();
        self.map_arrays(x, y, |a, b| proj.inverse(a, b))
    }

    /// Transform (lon, lat) arrays to projected (x, y) arrays of the same
    /// shape. Points outside the projection domain become NaN.
    pub fn from_geographic<S1, S2, D>(
        &self,
        lon: &ArrayBase<S1, D>,
        lat: &ArrayBase<S2, D>,
    ) -> GeoResult<(Array<f64, D>, Array<f64, D>)>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        let proj = self.projection();
        self.map_arrays(lon, lat, |a, b| proj.forward(a, b))
    }

    fn projection(&self) -> &(dyn MapProjection + Sync) {
        match self {
            Self::Sinusoidal(p) => p,
            Self::LambertAzimuthal(p) => p,
            Self::PolarStereographic(p) => p,
            Self::Geographic(p) => p,
        }
    }

    fn map_arrays<S1, S2, D, F>(
        &self,
        a: &ArrayBase<S1, D>,
        b: &ArrayBase<S2, D>,
        f: F,
    ) -> GeoResult<(Array<f64, D>, Array<f64, D>)>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
        F: Fn(f64, f64) -> Option<(f64, f64)> + Sync + Send,
    {
        if a.shape() != b.shape() {
            return Err(GeoError::shape_mismatch(a.shape(), b.shape()));
        }

        let mut out_a = Array::from_elem(a.raw_dim(), f64::NAN);
        let mut out_b = Array::from_elem(a.raw_dim(), f64::NAN);
        let apply = |oa: &mut f64, ob: &mut f64, &va: &f64, &vb: &f64| {
            if let Some((p, q)) = f(va, vb) {
                *oa = p;
                *ob = q;
            }
        };

        let zip = Zip::from(&mut out_a).and(&mut out_b).and(a).and(b);
        if a.len() >= PARALLEL_THRESHOLD {
            zip.par_for_each(apply);
        } else {
            zip.for_each(apply);
        }

        let out_of_domain = Zip::from(&out_a)
            .and(a)
            .and(b)
            .fold(0usize, |n, r, va, vb| {
                n + usize::from(r.is_nan() && va.is_finite() && vb.is_finite())
            });
        if out_of_domain > 0 {
            debug!(
                projection = self.name(),
                points = a.len(),
                out_of_domain,
                "Points outside projection domain set to NaN"
            );
        }

        Ok((out_a, out_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_other_projection_is_unsupported() {
        let err = ProjectionTransformer::new(&ProjectionKind::Other {
            name: "GCTP_UTM".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, GeoError::UnsupportedProjection(ref n) if n == "GCTP_UTM"));
    }

    #[test]
    fn test_shape_mismatch() {
        let t = ProjectionTransformer::new(&ProjectionKind::modis_sinusoidal()).unwrap();
        let x = Array2::<f64>::zeros((2, 3));
        let y = Array2::<f64>::zeros((3, 2));
        let err = t.to_geographic(&x, &y).unwrap_err();
        assert!(matches!(err, GeoError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_geographic_identity_arrays() {
        let t = ProjectionTransformer::new(&ProjectionKind::Geographic).unwrap();
        let x = array![[-180.0, 180.0], [-180.0, 180.0]];
        let y = array![[90.0, 90.0], [-90.0, -90.0]];
        let (lon, lat) = t.to_geographic(&x, &y).unwrap();
        assert_eq!(lon, x);
        assert_eq!(lat, y);
    }

    #[test]
    fn test_out_of_domain_becomes_nan() {
        let t = ProjectionTransformer::new(&ProjectionKind::modis_sinusoidal()).unwrap();
        let x = array![0.0, 1.9e7];
        let y = array![0.0, 6.0e6];
        let (lon, lat) = t.to_geographic(&x, &y).unwrap();
        assert_eq!(lon[0], 0.0);
        assert_eq!(lat[0], 0.0);
        assert!(lon[1].is_nan() && lat[1].is_nan());
    }

    #[test]
    fn test_nan_input_stays_nan() {
        let t = ProjectionTransformer::new(&ProjectionKind::ease_grid_north()).unwrap();
        let (lon, lat) = t.to_geographic(&array![f64::NAN], &array![0.0]).unwrap();
        assert!(lon[0].is_nan() && lat[0].is_nan());
    }
}
