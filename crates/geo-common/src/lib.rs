//! Common types shared by the grid decoding and reprojection crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod longitude;
pub mod product;

pub use bbox::BoundingBox;
pub use crs::{Ellipsoid, Hemisphere, ProjectionKind, EASE_SPHERE_RADIUS, MODIS_SPHERE_RADIUS};
pub use error::{GeoError, GeoResult};
pub use grid::{EndpointConvention, GridDescriptor};
pub use longitude::{normalize_longitude, normalize_longitudes, spans_dateline, LongitudeDomain};
pub use product::{CornerUnits, ProductCatalog, ProductProfile, ReaderStrategy, ScaleOrder};
