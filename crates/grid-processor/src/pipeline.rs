//! End-to-end grid processing for one product.

use geo_common::{
    normalize_longitude, GeoError, GeoResult, GridDescriptor, LongitudeDomain, ProductProfile,
};
use grid_metadata::descriptor_from_metadata;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::AsPrimitive;
use projection::ProjectionTransformer;
use tracing::{debug, info};

use crate::config::ProcessorConfig;
use crate::decode::{PhysicalRaster, ValueDecoder};
use crate::mesh::CoordinateMeshBuilder;
use crate::resample::{SwathResampler, TargetGrid};

/// Projected and geographic coordinates of every cell of a grid.
#[derive(Debug, Clone)]
pub struct GeoMesh {
    /// Projected x (meters, or degrees for geographic grids)
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    /// Longitude in degrees, NaN where the cell is off the projection's domain
    pub lon: Array2<f64>,
    pub lat: Array2<f64>,
}

impl GeoMesh {
    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.lon.dim()
    }

    /// Number of cells with a valid lon/lat.
    pub fn valid_count(&self) -> usize {
        self.lon
            .iter()
            .zip(self.lat.iter())
            .filter(|(lon, lat)| lon.is_finite() && lat.is_finite())
            .count()
    }

    /// Move every longitude into `domain`.
    pub fn normalize_longitudes(&mut self, domain: LongitudeDomain) {
        self.lon.mapv_inplace(|lon| normalize_longitude(lon, domain));
    }
}

/// Metadata, geolocation, decoding and resampling wired together for the
/// constants of one [`ProductProfile`].
#[derive(Debug, Clone)]
pub struct GridPipeline {
    profile: ProductProfile,
    config: ProcessorConfig,
}

impl GridPipeline {
    /// # Errors
    /// Fails if the profile or configuration is invalid, or if the profile's
    /// projection has no transform.
    pub fn new(profile: ProductProfile, config: ProcessorConfig) -> GeoResult<Self> {
        profile.validate()?;
        config.validate()?;
        ProjectionTransformer::new(&profile.projection)?;
        debug!(product = %profile.name, projection = %profile.projection, "Pipeline ready");
        Ok(Self { profile, config })
    }

    pub fn profile(&self) -> &ProductProfile {
        &self.profile
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Grid descriptor from the embedded metadata text.
    ///
    /// `grid_name` overrides the profile's default grid.
    pub fn descriptor(&self, metadata: &str, grid_name: Option<&str>) -> GeoResult<GridDescriptor> {
        descriptor_from_metadata(metadata, &self.profile, grid_name, None)
    }

    /// Like [`GridPipeline::descriptor`] for metadata that carries corners
    /// but no dimensions.
    pub fn descriptor_with_shape(
        &self,
        metadata: &str,
        shape: (usize, usize),
    ) -> GeoResult<GridDescriptor> {
        descriptor_from_metadata(metadata, &self.profile, None, Some(shape))
    }

    /// Build the cell mesh of `grid` and unproject it.
    pub fn geolocate(&self, grid: &GridDescriptor) -> GeoResult<GeoMesh> {
        let transformer = ProjectionTransformer::new(grid.projection())?;
        let (x, y) = CoordinateMeshBuilder::from_descriptor(grid).build();
        let (lon, lat) = transformer.to_geographic(&x, &y)?;
        let mesh = GeoMesh { x, y, lon, lat };

        debug!(
            projection = transformer.name(),
            shape = ?mesh.shape(),
            valid = mesh.valid_count(),
            "Geolocated grid"
        );
        Ok(mesh)
    }

    /// A decoder preset with the profile's scale order, if it has one.
    pub fn decoder(&self) -> ValueDecoder {
        match self.profile.scale_order {
            Some(order) => ValueDecoder::new().scale_order(order),
            None => ValueDecoder::new(),
        }
    }

    /// Geolocate a grid and decode its raster in parallel.
    ///
    /// # Errors
    /// [`GeoError::ShapeMismatch`] if the raster does not match
    /// the grid, plus any error from geolocation or decoding.
    pub fn process<T, S>(
        &self,
        grid: &GridDescriptor,
        raw: &ArrayBase<S, Ix2>,
        decoder: &ValueDecoder,
    ) -> GeoResult<(GeoMesh, PhysicalRaster)>
    where
        T: AsPrimitive<f64> + Sync,
        S: Data<Elem = T> + Sync,
    {
        if raw.dim() != grid.shape() {
            return Err(GeoError::shape_mismatch(grid.shape(), raw.dim()));
        }
        let (mesh, raster) = rayon::join(|| self.geolocate(grid), || decoder.decode(raw));
        let (mesh, raster) = (mesh?, raster?);

        info!(
            product = %self.profile.name,
            shape = ?grid.shape(),
            geolocated = mesh.valid_count(),
            valid = raster.valid_count(),
            "Processed grid"
        );
        Ok((mesh, raster))
    }

    /// Resample a decoded swath onto `target` with this pipeline's settings.
    pub fn resample<S1, S2>(
        &self,
        lon: &ArrayBase<S1, Ix2>,
        lat: &ArrayBase<S2, Ix2>,
        raster: &PhysicalRaster,
        target: &TargetGrid,
    ) -> GeoResult<PhysicalRaster>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        SwathResampler::new(self.config.clone())?.resample_raster(lon, lat, raster, target)
    }
}
