//! Synthetic swath and raster generators.
//!
//! These produce predictable, verifiable patterns so that tests can check
//! exactly which input ended up where.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a raw raster with predictable values.
///
/// Each cell value is `col * 100 + row`, so a decoded value can be traced
/// back to its position.
///
/// # Example
///
/// ```
/// use test_utils::create_test_raster;
///
/// let raster = create_test_raster(3, 4);
/// assert_eq!(raster.dim(), (3, 4));
/// assert_eq!(raster[[0, 1]], 100);
/// assert_eq!(raster[[2, 0]], 2);
/// ```
pub fn create_test_raster(rows: usize, cols: usize) -> Array2<i16> {
    Array2::from_shape_fn((rows, cols), |(r, c)| (c * 100 + r) as i16)
}

/// Like [`create_test_raster`] with `fill` written on the main diagonal.
pub fn create_raster_with_fill(rows: usize, cols: usize, fill: i16) -> Array2<i16> {
    let mut raster = create_test_raster(rows, cols);
    for i in 0..rows.min(cols) {
        raster[[i, i]] = fill;
    }
    raster
}

/// A swath as three parallel arrays of the same shape.
#[derive(Debug, Clone)]
pub struct SyntheticSwath {
    pub lon: Array2<f64>,
    pub lat: Array2<f64>,
    pub values: Array2<f64>,
}

impl SyntheticSwath {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Creates a regular "scan" swath: `rows` scan lines of `cols` pixels with
/// the given spacing in degrees, starting at (`lon0`, `lat0`) in the
/// upper-left and running south-east. Values are the flat pixel index.
pub fn create_scan_swath(
    rows: usize,
    cols: usize,
    lon0: f64,
    lat0: f64,
    spacing: f64,
) -> SyntheticSwath {
    SyntheticSwath {
        lon: Array2::from_shape_fn((rows, cols), |(_, c)| lon0 + c as f64 * spacing),
        lat: Array2::from_shape_fn((rows, cols), |(r, _)| lat0 - r as f64 * spacing),
        values: Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f64),
    }
}

/// Creates `n` uniformly scattered points inside `bbox`
/// (min_lon, min_lat, max_lon, max_lat) with values in [0, 100).
///
/// The same seed always produces the same swath.
pub fn create_random_swath(n: usize, bbox: (f64, f64, f64, f64), seed: u64) -> SyntheticSwath {
    let (min_lon, min_lat, max_lon, max_lat) = bbox;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        lon.push(rng.gen_range(min_lon..max_lon));
        lat.push(rng.gen_range(min_lat..max_lat));
        values.push(rng.gen_range(0.0..100.0));
    }

    SyntheticSwath {
        lon: to_row(lon),
        lat: to_row(lat),
        values: to_row(values),
    }
}

fn to_row(v: Vec<f64>) -> Array2<f64> {
    let n = v.len();
    Array2::from_shape_vec((1, n), v).expect("1 x n shape always matches")
}
