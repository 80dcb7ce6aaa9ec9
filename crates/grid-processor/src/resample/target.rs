//! Regular lon/lat output grids.

use geo_common::{
    BoundingBox, EndpointConvention, GeoError, GeoResult, GridDescriptor, ProjectionKind,
};
use ndarray::Array2;

/// Largest number of cells a [`TargetGrid`] may have (0.01° over the globe
/// is 648 million; this allows 0.025°).
pub const MAX_TARGET_CELLS: usize = 120_000_000;

/// A regular geographic grid covering a bounding box with square cells.
///
/// Row 0 is the northernmost row and column 0 the westernmost column, the
/// row-major layout plotting libraries expect. When the box is not a whole
/// number of cells the last row/column extends past `max_lat`/`min_lat`
/// and `max_lon`.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    bbox: BoundingBox,
    cell_size: f64,
    rows: usize,
    cols: usize,
}

impl TargetGrid {
    /// Create a grid over `bbox` with `cell_size` degree cells.
    ///
    /// # Errors
    /// [`GeoError::InvalidParameter`] for an invalid box, a non-positive
    /// cell size, or more than [`MAX_TARGET_CELLS`] cells.
    pub fn new(bbox: BoundingBox, cell_size: f64) -> GeoResult<Self> {
        bbox.validate()?;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GeoError::invalid_parameter(
                "cell_size",
                format!("{} must be > 0", cell_size),
            ));
        }

        let count = |extent: f64| ((extent / cell_size) - 1e-9).ceil().max(1.0);
        let (rows, cols) = (count(bbox.height()), count(bbox.width()));
        if rows * cols > MAX_TARGET_CELLS as f64 {
            return Err(GeoError::invalid_parameter(
                "cell_size",
                format!(
                    "{} gives {} x {} cells, more than {}",
                    cell_size, rows, cols, MAX_TARGET_CELLS
                ),
            ));
        }
        Ok(Self {
            rows: rows as usize,
            cols: cols as usize,
            bbox,
            cell_size,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false; the constructor guarantees at least one cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (lon, lat) of the center of cell (row, col).
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.bbox.min_lon + (col as f64 + 0.5) * self.cell_size,
            self.bbox.max_lat - (row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Fractional (row, col) position of a point; integer parts name the
    /// cell that contains it. May be negative or past the grid.
    pub(crate) fn fractional_position(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (self.bbox.max_lat - lat) / self.cell_size,
            (lon - self.bbox.min_lon) / self.cell_size,
        )
    }

    /// The cell containing (lon, lat), or `None` outside the grid.
    pub fn cell_of(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let (r, c) = self.fractional_position(lon, lat);
        if r < 0.0 || c < 0.0 {
            return None;
        }
        let (r, c) = (r.floor() as usize, c.floor() as usize);
        (r < self.rows && c < self.cols).then_some((r, c))
    }

    /// Cell-center longitude and latitude arrays, shape (rows, cols).
    pub fn lon_lat_mesh(&self) -> (Array2<f64>, Array2<f64>) {
        let lon = Array2::from_shape_fn(self.shape(), |(r, c)| self.cell_center(r, c).0);
        let lat = Array2::from_shape_fn(self.shape(), |(r, c)| self.cell_center(r, c).1);
        (lon, lat)
    }

    /// Geographic descriptor whose corners are the outer cell edges.
    pub fn to_descriptor(&self) -> GeoResult<GridDescriptor> {
        GridDescriptor::new(
            self.rows,
            self.cols,
            (self.bbox.min_lon, self.bbox.max_lat),
            (
                self.bbox.min_lon + self.cols as f64 * self.cell_size,
                self.bbox.max_lat - self.rows as f64 * self.cell_size,
            ),
            ProjectionKind::Geographic,
            EndpointConvention::Exclusive,
        )
    }
}
