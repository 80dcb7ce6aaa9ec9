//! Coordinate meshes, value decoding and swath resampling.
//!
//! This crate turns the pieces of a satellite product into plottable
//! arrays:
//!
//! ```text
//! metadata text ──► GridDescriptor ──► CoordinateMeshBuilder ──► (X, Y)
//!                                                                  │
//!                                           ProjectionTransformer ◄┘
//!                                                    │
//!                                                    ▼
//!                                               (lon, lat)
//! raw array ──► ValueDecoder ──► PhysicalRaster ─────┤
//!                                                    ▼
//!                                   SwathResampler ──► regular lon/lat grid
//! ```
//!
//! [`GridPipeline`] wires these together for one product profile.
//!
//! # Example
//!
//! ```
//! use geo_common::{BoundingBox, ScaleOrder};
//! use grid_processor::{ProcessorConfig, ResampleMode, SwathResampler, TargetGrid, ValueDecoder};
//! use ndarray::array;
//!
//! let raw = array![[-9999i16, 50]];
//! let raster = ValueDecoder::new()
//!     .fill_value(-9999.0)
//!     .scale_factor(0.1)
//!     .scale_order(ScaleOrder::MultiplyThenAdd)
//!     .decode(&raw)
//!     .unwrap();
//!
//! let lon = array![[10.0, 10.2]];
//! let lat = array![[20.0, 20.0]];
//! let target = TargetGrid::new(BoundingBox::new(9.0, 19.0, 11.0, 21.0), 1.0).unwrap();
//! let config = ProcessorConfig::default()
//!     .with_mode(ResampleMode::Bucket)
//!     .with_radius(200_000.0);
//! let gridded = SwathResampler::new(config)
//!     .unwrap()
//!     .resample_raster(&lon, &lat, &raster, &target)
//!     .unwrap();
//! assert_eq!(gridded.valid_count(), 1);
//! ```

pub mod config;
pub mod decode;
pub mod mesh;
pub mod pipeline;
pub mod resample;

pub use config::{ProcessorConfig, ResampleMode};
pub use decode::{PhysicalRaster, ValueDecoder};
pub use mesh::CoordinateMeshBuilder;
pub use pipeline::{GeoMesh, GridPipeline};
pub use resample::{SwathResampler, TargetGrid, MAX_TARGET_CELLS};
