//! Nearest-neighbor resampling of swath points onto a [`TargetGrid`].

use geo_common::{GeoError, GeoResult};
use ndarray::{Array2, ArrayBase, Data, Dimension, Ix2, Zip};
use tracing::{debug, info, warn};

use super::index::{chord, chord_for_arc, unit_vector, IndexedPoint, SphereIndex};
use super::target::TargetGrid;
use crate::config::{ProcessorConfig, ResampleMode};
use crate::decode::PhysicalRaster;

/// A valid input observation.
#[derive(Debug, Clone, Copy)]
struct SwathPoint {
    lon: f64,
    lat: f64,
    value: f64,
}

/// Assigns scattered (lon, lat, value) observations to target grid cells.
///
/// Cells with no input within the radius of influence are masked and hold
/// NaN. Distances are great-circle distances on a sphere of
/// `earth_radius_m`.
#[derive(Debug, Clone)]
pub struct SwathResampler {
    config: ProcessorConfig,
}

impl SwathResampler {
    /// # Errors
    /// [`GeoError::InvalidParameter`] if the configuration is invalid.
    pub fn new(config: ProcessorConfig) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Resample parallel coordinate and value arrays of any (equal) shape.
    ///
    /// Points with a non-finite longitude, latitude or value, or a latitude
    /// outside [-90, 90], are ignored.
    ///
    /// # Errors
    /// - [`GeoError::ShapeMismatch`] if the three arrays differ in shape
    /// - [`GeoError::EmptyInput`] if no valid point remains
    pub fn resample<S1, S2, S3, D>(
        &self,
        lon: &ArrayBase<S1, D>,
        lat: &ArrayBase<S2, D>,
        values: &ArrayBase<S3, D>,
        target: &TargetGrid,
    ) -> GeoResult<PhysicalRaster>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
        D: Dimension,
    {
        check_shapes(lon.shape(), lat.shape())?;
        check_shapes(lon.shape(), values.shape())?;

        let points = collect_points(
            lon.iter().zip(lat.iter()).zip(values.iter()).map(|((&x, &y), &v)| (x, y, v, false)),
        );
        let (values, mask) = self.assign(&points, lon.len(), target)?;
        PhysicalRaster::new(values, mask, "", "")
    }

    /// Resample a decoded swath raster using 2-D geolocation arrays.
    ///
    /// Masked raster cells are ignored. Units and long name carry over.
    pub fn resample_raster<S1, S2>(
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
        check_shapes(lon.shape(), lat.shape())?;
        check_shapes(lon.shape(), raster.values().shape())?;

        let points = collect_points(
            lon.iter()
                .zip(lat.iter())
                .zip(raster.values().iter().zip(raster.mask().iter()))
                .map(|((&x, &y), (&v, &m))| (x, y, v, m)),
        );
        let (values, mask) = self.assign(&points, lon.len(), target)?;
        PhysicalRaster::new(values, mask, raster.units(), raster.long_name())
    }

    fn assign(
        &self,
        points: &[SwathPoint],
        total: usize,
        target: &TargetGrid,
    ) -> GeoResult<(Array2<f64>, Array2<bool>)> {
        if points.is_empty() {
            return Err(GeoError::EmptyInput(format!(
                "all {} input points are masked or invalid",
                total
            )));
        }
        warn_on_wide_span(points);

        let radius = self.config.earth_radius_m;
        let max_chord = chord_for_arc(self.config.radius_of_influence_m, radius) / radius;
        let tolerance = self.config.tie_tolerance_m / radius;

        let chosen = match self.config.mode {
            ResampleMode::Nearest => self.assign_nearest(points, target, max_chord, tolerance),
            ResampleMode::Bucket => assign_bucket(points, target, max_chord, tolerance),
        };

        let mut values = Array2::from_elem(target.shape(), f64::NAN);
        let mut mask = Array2::from_elem(target.shape(), true);
        let mut filled = 0usize;
        Zip::from(&mut values)
            .and(&mut mask)
            .and(&chosen)
            .for_each(|v, m, c| {
                if let Some(i) = c {
                    *v = points[*i].value;
                    *m = false;
                    filled += 1;
                }
            });

        info!(
            mode = %self.config.mode,
            inputs = total,
            valid = points.len(),
            cells = target.len(),
            filled,
            radius_m = self.config.radius_of_influence_m,
            "Resampled swath"
        );
        Ok((values, mask))
    }

    /// For every cell, the nearest point within range. Returns positions into
    /// `points`.
    fn assign_nearest(
        &self,
        points: &[SwathPoint],
        target: &TargetGrid,
        max_chord: f64,
        tolerance: f64,
    ) -> Array2<Option<usize>> {
        // `points` is ordered by input index, so the position in it ranks
        // exactly like the input index for tie-breaking.
        let index = SphereIndex::new(
            points
                .iter()
                .enumerate()
                .map(|(pos, p)| IndexedPoint {
                    xyz: unit_vector(p.lon, p.lat),
                    index: pos,
                })
                .collect(),
        );
        debug!(points = index.len(), "Built spatial index");

        let query = |(row, col): (usize, usize), out: &mut Option<usize>| {
            let (lon, lat) = target.cell_center(row, col);
            *out = index
                .nearest_within(&unit_vector(lon, lat), max_chord, tolerance)
                .map(|(pos, _)| pos);
        };

        let mut chosen = Array2::from_elem(target.shape(), None);
        let zip = Zip::indexed(&mut chosen);
        if self.config.parallel {
            zip.par_for_each(query);
        } else {
            zip.for_each(query);
        }
        chosen
    }
}

/// Each point goes to its own nearest cell center among the 3 x 3 cells
/// around the cell containing it (clamped to the grid). Ties between cells
/// go to the lowest row-major cell; ties between points in one cell go to
/// the lowest input index.
fn assign_bucket(
    points: &[SwathPoint],
    target: &TargetGrid,
    max_chord: f64,
    tolerance: f64,
) -> Array2<Option<usize>> {
    let (rows, cols) = target.shape();
    let center_lon = (target.bbox().min_lon + target.bbox().max_lon) / 2.0;
    let mut best: Array2<Option<(usize, f64)>> = Array2::from_elem((rows, cols), None);

    for (pos, p) in points.iter().enumerate() {
        // Bring the longitude next to the grid so the containing cell is right
        // whichever domain the input uses.
        let lon = center_lon + wrap_degrees(p.lon - center_lon);
        let (fr, fc) = target.fractional_position(lon, p.lat);
        let r0 = clamp_index(fr, rows);
        let c0 = clamp_index(fc, cols);
        let xyz = unit_vector(p.lon, p.lat);

        let mut nearest: Option<((usize, usize), f64)> = None;
        for r in r0.saturating_sub(1)..=(r0 + 1).min(rows - 1) {
            for c in c0.saturating_sub(1)..=(c0 + 1).min(cols - 1) {
                let (clon, clat) = target.cell_center(r, c);
                let d = chord(&xyz, &unit_vector(clon, clat));
                // Row-major iteration: a later cell wins only if clearly closer.
                if nearest.map_or(true, |(_, bd)| d < bd - tolerance) {
                    nearest = Some(((r, c), d));
                }
            }
        }

        let Some((cell, d)) = nearest else { continue };
        if d > max_chord {
            continue;
        }
        let slot = &mut best[cell];
        let replace = match *slot {
            None => true,
            Some((_, bd)) => d < bd - tolerance,
        };
        // Points arrive in input order, so an equidistant later point never
        // replaces an earlier one.
        if replace {
            *slot = Some((pos, d));
        }
    }

    best.mapv(|b| b.map(|(pos, _)| pos))
}

fn clamp_index(fractional: f64, len: usize) -> usize {
    if fractional <= 0.0 {
        0
    } else {
        (fractional.floor() as usize).min(len - 1)
    }
}

fn wrap_degrees(d: f64) -> f64 {
    (d + 180.0).rem_euclid(360.0) - 180.0
}

fn check_shapes(expected: &[usize], actual: &[usize]) -> GeoResult<()> {
    if expected != actual {
        return Err(GeoError::shape_mismatch(expected, actual));
    }
    Ok(())
}

/// Keep valid observations in input order.
fn collect_points(items: impl Iterator<Item = (f64, f64, f64, bool)>) -> Vec<SwathPoint> {
    items
        .filter(|&(lon, lat, value, masked)| {
            !masked && lon.is_finite() && value.is_finite() && (-90.0..=90.0).contains(&lat)
        })
        .map(|(lon, lat, value, _)| SwathPoint { lon, lat, value })
        .collect()
}

fn warn_on_wide_span(points: &[SwathPoint]) {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.lon), hi.max(p.lon))
        });
    if max - min > 180.0 {
        warn!(
            min_lon = min,
            max_lon = max,
            "Input longitudes span more than 180 degrees; normalize the domain if the swath crosses the antimeridian"
        );
    }
}
