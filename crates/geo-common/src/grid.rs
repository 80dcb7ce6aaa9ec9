//! Projected grid descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crs::ProjectionKind;
use crate::error::{GeoError, GeoResult};

/// How cell coordinates are spaced between the two corner points.
///
/// Products disagree on this, so it is always chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointConvention {
    /// `n` points from the first corner to the second, both included.
    Inclusive,
    /// `n` points of step `(end - start) / n`; the second corner is not reached.
    Exclusive,
}

impl EndpointConvention {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> GeoResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "inclusive" => Ok(Self::Inclusive),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(GeoError::invalid_parameter(
                "endpoint",
                format!("'{}', expected 'inclusive' or 'exclusive'", other),
            )),
        }
    }

    /// Coordinate of point `index` out of `count` between `start` and `end`.
    ///
    /// Index 0 is always exactly `start`. In inclusive mode the last index is
    /// exactly `end`.
    pub fn coordinate(&self, start: f64, end: f64, index: usize, count: usize) -> f64 {
        if index == 0 {
            return start;
        }
        match self {
            Self::Inclusive => {
                if index + 1 == count {
                    end
                } else {
                    start + index as f64 * (end - start) / (count - 1) as f64
                }
            }
            Self::Exclusive => start + index as f64 * (end - start) / count as f64,
        }
    }
}

impl fmt::Display for EndpointConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusive => write!(f, "inclusive"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// A regular grid in some map projection, defined by its shape and the
/// upper-left and lower-right corner coordinates.
///
/// Immutable after construction; [`GridDescriptor::new`] enforces a positive
/// shape and a non-degenerate extent.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescriptor {
    rows: usize,
    cols: usize,
    upper_left: (f64, f64),
    lower_right: (f64, f64),
    projection: ProjectionKind,
    endpoint: EndpointConvention,
}

impl GridDescriptor {
    /// Create a grid descriptor.
    ///
    /// # Arguments
    /// * `rows`, `cols` - Grid shape; both must be non-zero
    /// * `upper_left` - (x0, y0) of cell (0, 0) in projection units
    /// * `lower_right` - (x1, y1) of the opposite corner
    /// * `projection` - Projection the corner coordinates are expressed in
    /// * `endpoint` - Spacing convention between the corners
    pub fn new(
        rows: usize,
        cols: usize,
        upper_left: (f64, f64),
        lower_right: (f64, f64),
        projection: ProjectionKind,
        endpoint: EndpointConvention,
    ) -> GeoResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(GeoError::InvalidGridShape(format!(
                "shape ({}, {}) must be positive",
                rows, cols
            )));
        }

        let (x0, y0) = upper_left;
        let (x1, y1) = lower_right;
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return Err(GeoError::InvalidGridShape(format!(
                "non-finite corners {:?} / {:?}",
                upper_left, lower_right
            )));
        }
        if x1 == x0 || y1 == y0 {
            return Err(GeoError::InvalidGridShape(format!(
                "degenerate extent {:?} / {:?}",
                upper_left, lower_right
            )));
        }

        projection.validate()?;

        Ok(Self {
            rows,
            cols,
            upper_left,
            lower_right,
            projection,
            endpoint,
        })
    }

    /// Grid shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn upper_left(&self) -> (f64, f64) {
        self.upper_left
    }

    pub fn lower_right(&self) -> (f64, f64) {
        self.lower_right
    }

    pub fn projection(&self) -> &ProjectionKind {
        &self.projection
    }

    pub fn endpoint(&self) -> EndpointConvention {
        self.endpoint
    }

    /// Nominal cell size `((x1 - x0) / cols, (y1 - y0) / rows)`.
    ///
    /// The y increment is negative for the usual north-up layout.
    pub fn increments(&self) -> (f64, f64) {
        (
            (self.lower_right.0 - self.upper_left.0) / self.cols as f64,
            (self.lower_right.1 - self.upper_left.1) / self.rows as f64,
        )
    }

    /// X coordinate of column `col`.
    pub fn x_at(&self, col: usize) -> f64 {
        self.endpoint
            .coordinate(self.upper_left.0, self.lower_right.0, col, self.cols)
    }

    /// Y coordinate of row `row`.
    pub fn y_at(&self, row: usize) -> f64 {
        self.endpoint
            .coordinate(self.upper_left.1, self.lower_right.1, row, self.rows)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false; a descriptor cannot be constructed with an empty shape.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
