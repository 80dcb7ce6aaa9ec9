//! Per-product configuration.
//!
//! Everything that differs between satellite products but is constant for a
//! product family (projection parameters, corner units, grid spacing
//! convention, scale/offset order, which reader to use) is collected in a
//! [`ProductProfile`]. Profiles are passed explicitly into the pipeline; there
//! is no process-wide product state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::crs::ProjectionKind;
use crate::error::{GeoError, GeoResult};
use crate::grid::EndpointConvention;

/// Which file-reading backend the surrounding layer should use for a product.
///
/// The readers themselves live outside this workspace; the strategy is
/// carried so that the choice is made per call instead of by global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReaderStrategy {
    /// The format's own library (HDF4 SD / HDF5).
    #[serde(rename = "native")]
    Native,
    /// GDAL subdatasets.
    #[serde(rename = "gdal")]
    Gdal,
    /// netCDF-4 API.
    #[serde(rename = "netcdf4")]
    NetCdf4,
}

impl ReaderStrategy {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> GeoResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" | "hdf" | "hdf4" | "hdf5" => Ok(Self::Native),
            "gdal" => Ok(Self::Gdal),
            "netcdf4" | "netcdf" | "nc4" => Ok(Self::NetCdf4),
            other => Err(GeoError::invalid_parameter(
                "reader",
                format!("'{}', expected 'native', 'gdal' or 'netcdf4'", other),
            )),
        }
    }
}

impl fmt::Display for ReaderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Gdal => write!(f, "gdal"),
            Self::NetCdf4 => write!(f, "netcdf4"),
        }
    }
}

/// Composition order of scale factor and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleOrder {
    /// `raw * scale + offset` (CF convention)
    MultiplyThenAdd,
    /// `scale * (raw - offset)` (HDF4 SD calibration convention)
    SubtractThenMultiply,
}

impl ScaleOrder {
    /// Apply the composition to one raw value.
    #[inline]
    pub fn apply(&self, raw: f64, scale: f64, offset: f64) -> f64 {
        match self {
            Self::MultiplyThenAdd => raw * scale + offset,
            Self::SubtractThenMultiply => scale * (raw - offset),
        }
    }
}

/// Units of the corner coordinates found in grid metadata.
///
/// The same `UpperLeftPointMtrs` key carries meters for projected grids and
/// packed degrees for geographic ones, so the conversion is named per product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CornerUnits {
    /// Use the parsed values as they are.
    #[default]
    Native,
    /// Multiply by a fixed factor (e.g. 1e-6 for micro-degrees).
    Scaled { factor: f64 },
    /// HDF-EOS packed degrees `DDDMMMSSS.SS`.
    PackedDms,
}

impl CornerUnits {
    /// Convert one parsed corner value.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            CornerUnits::Native => value,
            CornerUnits::Scaled { factor } => value * factor,
            CornerUnits::PackedDms => unpack_dms(value),
        }
    }

    /// Convert an (x, y) pair.
    pub fn apply_pair(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.apply(x), self.apply(y))
    }
}

/// Decode an HDF-EOS packed `DDDMMMSSS.SS` angle into decimal degrees.
pub fn unpack_dms(packed: f64) -> f64 {
    let sign = if packed < 0.0 { -1.0 } else { 1.0 };
    let value = packed.abs();
    let degrees = (value / 1_000_000.0).floor();
    let minutes = ((value - degrees * 1_000_000.0) / 1_000.0).floor();
    let seconds = value - degrees * 1_000_000.0 - minutes * 1_000.0;
    sign * (degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Constants describing one product family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfile {
    /// Profile identifier (e.g. "modis_sinusoidal").
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Projection the grid corners are expressed in.
    pub projection: ProjectionKind,
    /// Spacing convention between corners.
    pub endpoint: EndpointConvention,
    /// Units of the corner values in the grid metadata.
    #[serde(default)]
    pub corner_units: CornerUnits,
    /// Scale/offset composition for this product, if it is known for the
    /// whole family. `None` means each dataset read must state it.
    #[serde(default)]
    pub scale_order: Option<ScaleOrder>,
    /// Reader backend for the surrounding layer.
    pub reader: ReaderStrategy,
    /// `GridName` to select when the metadata holds several grids.
    #[serde(default)]
    pub grid_name: Option<String>,
}

impl ProductProfile {
    /// Validate projection parameters and corner conversion.
    pub fn validate(&self) -> GeoResult<()> {
        if self.name.trim().is_empty() {
            return Err(GeoError::Config("product profile without a name".to_string()));
        }
        self.projection.validate()?;
        if let CornerUnits::Scaled { factor } = self.corner_units {
            if !factor.is_finite() || factor == 0.0 {
                return Err(GeoError::invalid_parameter(
                    "corner_units.factor",
                    format!("{} must be finite and non-zero", factor),
                ));
            }
        }
        Ok(())
    }
}

/// A named set of product profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<ProductProfile>,
}

impl ProductCatalog {
    /// Parse a catalog from YAML text and validate every profile.
    pub fn from_yaml_str(yaml: &str) -> GeoResult<Self> {
        let catalog: ProductCatalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        debug!(products = catalog.products.len(), "Loaded product catalog");
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> GeoResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GeoError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Profiles for the product families handled out of the box.
    pub fn builtin() -> Self {
        Self {
            products: vec![
                ProductProfile {
                    name: "modis_sinusoidal".to_string(),
                    description: Some("MODIS land tiles (MOD09/MOD11/MOD13 ...)".to_string()),
                    projection: ProjectionKind::modis_sinusoidal(),
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::Native,
                    scale_order: None,
                    reader: ReaderStrategy::Native,
                    grid_name: None,
                },
                ProductProfile {
                    name: "ease_grid_north".to_string(),
                    description: Some("NSIDC EASE-Grid northern hemisphere".to_string()),
                    projection: ProjectionKind::ease_grid_north(),
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::Native,
                    scale_order: Some(ScaleOrder::MultiplyThenAdd),
                    reader: ReaderStrategy::Native,
                    grid_name: Some("Northern Hemisphere".to_string()),
                },
                ProductProfile {
                    name: "ease_grid_south".to_string(),
                    description: Some("NSIDC EASE-Grid southern hemisphere".to_string()),
                    projection: ProjectionKind::ease_grid_south(),
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::Native,
                    scale_order: Some(ScaleOrder::MultiplyThenAdd),
                    reader: ReaderStrategy::Native,
                    grid_name: Some("Southern Hemisphere".to_string()),
                },
                ProductProfile {
                    name: "nsidc_polar_north".to_string(),
                    description: Some("NSIDC sea ice polar stereographic north".to_string()),
                    projection: ProjectionKind::nsidc_polar_north(),
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::Native,
                    scale_order: Some(ScaleOrder::MultiplyThenAdd),
                    reader: ReaderStrategy::NetCdf4,
                    grid_name: None,
                },
                ProductProfile {
                    name: "nsidc_polar_south".to_string(),
                    description: Some("NSIDC sea ice polar stereographic south".to_string()),
                    projection: ProjectionKind::nsidc_polar_south(),
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::Native,
                    scale_order: Some(ScaleOrder::MultiplyThenAdd),
                    reader: ReaderStrategy::NetCdf4,
                    grid_name: None,
                },
                ProductProfile {
                    name: "geographic_cmg".to_string(),
                    description: Some("HDF-EOS geographic climate modeling grids".to_string()),
                    projection: ProjectionKind::Geographic,
                    endpoint: EndpointConvention::Exclusive,
                    corner_units: CornerUnits::PackedDms,
                    scale_order: None,
                    reader: ReaderStrategy::Native,
                    grid_name: None,
                },
            ],
        }
    }

    /// Validate every profile and reject duplicate names.
    pub fn validate(&self) -> GeoResult<()> {
        let mut seen = std::collections::HashSet::new();
        for profile in &self.products {
            profile.validate()?;
            if !seen.insert(profile.name.as_str()) {
                return Err(GeoError::Config(format!(
                    "duplicate product profile '{}'",
                    profile.name
                )));
            }
        }
        Ok(())
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> GeoResult<&ProductProfile> {
        self.products
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| GeoError::Config(format!("unknown product profile '{}'", name)))
    }

    /// Names of all profiles in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_dms() {
        assert_eq!(unpack_dms(-180_000_000.0), -180.0);
        assert_eq!(unpack_dms(90_000_000.0), 90.0);
        assert!((unpack_dms(10_030_000.0) - 10.5).abs() < 1e-12);
        assert!((unpack_dms(-45_015_036.0) - (-45.26)).abs() < 1e-12);
    }

    #[test]
    fn test_corner_units() {
        assert_eq!(CornerUnits::Native.apply(123.0), 123.0);
        let micro = CornerUnits::Scaled { factor: 1e-6 };
        let (x, y) = micro.apply_pair((-180_000_000.0, 90_000_000.0));
        assert!((x + 180.0).abs() < 1e-9);
        assert!((y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_order() {
        assert_eq!(ScaleOrder::MultiplyThenAdd.apply(50.0, 0.1, 2.0), 7.0);
        assert_eq!(ScaleOrder::SubtractThenMultiply.apply(50.0, 0.1, 20.0), 3.0);
    }

    #[test]
    fn test_reader_strategy_parse() {
        assert_eq!(ReaderStrategy::parse("GDAL").unwrap(), ReaderStrategy::Gdal);
        assert_eq!(ReaderStrategy::parse("hdf4").unwrap(), ReaderStrategy::Native);
        assert_eq!(ReaderStrategy::parse("nc4").unwrap(), ReaderStrategy::NetCdf4);
        assert!(ReaderStrategy::parse("pyhdf").is_err());
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = ProductCatalog::builtin();
        catalog.validate().unwrap();
        assert!(catalog.get("modis_sinusoidal").is_ok());
        assert!(catalog.get("nope").is_err());
        assert_eq!(catalog.names().len(), catalog.products.len());
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
products:
  - name: amsre_ease
    projection:
      kind: lambert_azimuthal_equal_area
      radius: 6371228.0
      center_lat: 90.0
      center_lon: 0.0
    endpoint: inclusive
    scale_order: subtract_then_multiply
    reader: gdal
  - name: cmg
    projection:
      kind: geographic
    endpoint: exclusive
    corner_units:
      kind: scaled
      factor: 1.0e-6
    reader: netcdf4
"#;
        let catalog = ProductCatalog::from_yaml_str(yaml).unwrap();
        let ease = catalog.get("amsre_ease").unwrap();
        assert_eq!(ease.projection, ProjectionKind::ease_grid_north());
        assert_eq!(ease.endpoint, EndpointConvention::Inclusive);
        assert_eq!(ease.scale_order, Some(ScaleOrder::SubtractThenMultiply));
        assert_eq!(ease.reader, ReaderStrategy::Gdal);
        assert_eq!(ease.corner_units, CornerUnits::Native);

        let cmg = catalog.get("cmg").unwrap();
        assert_eq!(cmg.corner_units, CornerUnits::Scaled { factor: 1.0e-6 });
        assert_eq!(cmg.scale_order, None);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let yaml = r#"
products:
  - name: a
    projection: { kind: geographic }
    endpoint: exclusive
    reader: native
  - name: a
    projection: { kind: geographic }
    endpoint: inclusive
    reader: native
"#;
        let err = ProductCatalog::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, GeoError::Config(_)));
    }

    #[test]
    fn test_catalog_rejects_bad_projection() {
        let yaml = r#"
products:
  - name: broken
    projection: { kind: sinusoidal, radius: -1.0 }
    endpoint: exclusive
    reader: native
"#;
        assert!(ProductCatalog::from_yaml_str(yaml).is_err());
    }
}
