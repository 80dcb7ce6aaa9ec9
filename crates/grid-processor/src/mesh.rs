//! Per-cell coordinate meshes of projected grids.

use geo_common::{EndpointConvention, GeoError, GeoResult, GridDescriptor};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Builds the (X, Y) coordinate arrays of a grid.
///
/// Cell (0, 0) is exactly the upper-left corner. Whether the last cell lands
/// on the lower-right corner depends on the [`EndpointConvention`].
#[derive(Debug, Clone)]
pub struct CoordinateMeshBuilder {
    rows: usize,
    cols: usize,
    upper_left: (f64, f64),
    lower_right: (f64, f64),
    endpoint: EndpointConvention,
}

impl CoordinateMeshBuilder {
    /// Create a builder from raw corner coordinates.
    ///
    /// # Errors
    /// [`GeoError::InvalidGridShape`] if either dimension is zero.
    pub fn new(
        rows: usize,
        cols: usize,
        upper_left: (f64, f64),
        lower_right: (f64, f64),
        endpoint: EndpointConvention,
    ) -> GeoResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(GeoError::InvalidGridShape(format!(
                "shape ({}, {}) must be positive",
                rows, cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            upper_left,
            lower_right,
            endpoint,
        })
    }

    /// Create a builder for an already validated descriptor.
    pub fn from_descriptor(grid: &GridDescriptor) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            upper_left: grid.upper_left(),
            lower_right: grid.lower_right(),
            endpoint: grid.endpoint(),
        }
    }

    /// Column coordinates, length `cols`.
    pub fn x_axis(&self) -> Array1<f64> {
        let (x0, x1) = (self.upper_left.0, self.lower_right.0);
        Array1::from_shape_fn(self.cols, |c| self.endpoint.coordinate(x0, x1, c, self.cols))
    }

    /// Row coordinates, length `rows`.
    pub fn y_axis(&self) -> Array1<f64> {
        let (y0, y1) = (self.upper_left.1, self.lower_right.1);
        Array1::from_shape_fn(self.rows, |r| self.endpoint.coordinate(y0, y1, r, self.rows))
    }

    /// Build the two `(rows, cols)` arrays; `X[r, c] = x_axis[c]` and
    /// `Y[r, c] = y_axis[r]`.
    pub fn build(&self) -> (Array2<f64>, Array2<f64>) {
        let xs = self.x_axis();
        let ys = self.y_axis();

        let x = Array2::from_shape_fn((self.rows, self.cols), |(_, c)| xs[c]);
        let y = Array2::from_shape_fn((self.rows, self.cols), |(r, _)| ys[r]);

        debug!(
            rows = self.rows,
            cols = self.cols,
            endpoint = %self.endpoint,
            "Built coordinate mesh"
        );
        (x, y)
    }
}
