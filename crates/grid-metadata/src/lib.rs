//! Grid metadata parsing for HDF-EOS products.
//!
//! HDF-EOS files embed an ODL-style `StructMetadata` text attribute that
//! describes each grid: its name, dimensions, corner coordinates and GCTP
//! projection code. This crate pulls those values out of the text. Reading
//! the attribute from the file is left to the caller.
//!
//! # Example
//!
//! ```
//! use grid_metadata::parse_grid_corners;
//!
//! let text = "UpperLeftPointMtrs=(-180.0,90.0)\nLowerRightMtrs=(180.0,-90.0)";
//! let corners = parse_grid_corners(text).unwrap();
//! assert_eq!(corners.upper_left, (-180.0, 90.0));
//! assert_eq!(corners.lower_right, (180.0, -90.0));
//! ```

mod corners;
mod descriptor;
mod structure;

pub use corners::{parse_grid_corners, GridCorners};
pub use descriptor::descriptor_from_metadata;
pub use structure::{find_grid, parse_grid_structures, GctpProjection, GridStructure};
