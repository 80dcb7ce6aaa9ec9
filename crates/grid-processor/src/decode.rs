//! Raw-to-physical value decoding.
//!
//! Masking is evaluated on the raw stored values: a cell is invalid when it
//! equals one of the fill codes, falls outside the valid range, or is NaN.
//! Unmasked cells are then converted with the scale/offset formula named by
//! an explicit [`ScaleOrder`].

use geo_common::{GeoError, GeoResult, ScaleOrder};
use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};
use num_traits::AsPrimitive;
use tracing::debug;

/// A decoded 2-D field with its validity mask.
///
/// `mask[r, c] == true` marks an invalid cell; its value is NaN and it is
/// excluded from every statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalRaster {
    values: Array2<f64>,
    mask: Array2<bool>,
    units: String,
    long_name: String,
}

impl PhysicalRaster {
    /// Assemble a raster from parts.
    ///
    /// Masked cells are forced to NaN and NaN cells are masked, so that the
    /// mask and values agree.
    ///
    /// # Errors
    /// [`GeoError::ShapeMismatch`] if `values` and `mask` differ in shape.
    pub fn new(
        mut values: Array2<f64>,
        mut mask: Array2<bool>,
        units: impl Into<String>,
        long_name: impl Into<String>,
    ) -> GeoResult<Self> {
        if values.dim() != mask.dim() {
            return Err(GeoError::shape_mismatch(values.dim(), mask.dim()));
        }
        Zip::from(&mut values).and(&mut mask).for_each(|v, m| {
            if *m || v.is_nan() {
                *v = f64::NAN;
                *m = true;
            }
        });
        Ok(Self {
            values,
            mask,
            units: units.into(),
            long_name: long_name.into(),
        })
    }

    /// Wrap already physical values; NaN cells are masked.
    pub fn from_values(values: Array2<f64>) -> Self {
        let mask = values.mapv(|v| v.is_nan());
        Self {
            values,
            mask,
            units: String::new(),
            long_name: String::new(),
        }
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<bool>) {
        (self.values, self.mask)
    }

    /// Value at (row, col), `None` if masked or out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.mask.get((row, col)) {
            Some(false) => self.values.get((row, col)).copied(),
            _ => None,
        }
    }

    /// Iterate over unmasked values in row-major order.
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .zip(self.mask.iter())
            .filter_map(|(&v, &m)| (!m).then_some(v))
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| !m).count()
    }

    pub fn min(&self) -> Option<f64> {
        self.valid_values().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.valid_values().reduce(f64::max)
    }

    /// Mean of unmasked values, `None` if every cell is masked.
    pub fn mean(&self) -> Option<f64> {
        let (sum, n) = self
            .valid_values()
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }
}

/// Converts raw stored arrays into [`PhysicalRaster`]s.
///
/// # Example
///
/// ```
/// use geo_common::ScaleOrder;
/// use grid_processor::ValueDecoder;
/// use ndarray::array;
///
/// let decoder = ValueDecoder::new()
///     .fill_value(-9999.0)
///     .scale_factor(0.1)
///     .scale_order(ScaleOrder::MultiplyThenAdd);
/// let raster = decoder.decode(&array![[-9999i16, 50]]).unwrap();
/// assert!(raster.mask()[[0, 0]]);
/// assert_eq!(raster.get(0, 1), Some(5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueDecoder {
    fill_values: Vec<f64>,
    valid_min: Option<f64>,
    valid_max: Option<f64>,
    scale_factor: Option<f64>,
    add_offset: Option<f64>,
    scale_order: Option<ScaleOrder>,
    units: String,
    long_name: String,
}

impl ValueDecoder {
    /// A decoder with no fill codes, no range and no scaling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fill code.
    pub fn fill_value(mut self, fill: f64) -> Self {
        self.fill_values.push(fill);
        self
    }

    /// Add several fill codes.
    pub fn fill_values(mut self, fills: impl IntoIterator<Item = f64>) -> Self {
        self.fill_values.extend(fills);
        self
    }

    pub fn valid_min(mut self, min: f64) -> Self {
        self.valid_min = Some(min);
        self
    }

    pub fn valid_max(mut self, max: f64) -> Self {
        self.valid_max = Some(max);
        self
    }

    /// Set both bounds of the raw valid range.
    pub fn valid_range(self, min: f64, max: f64) -> Self {
        self.valid_min(min).valid_max(max)
    }

    pub fn scale_factor(mut self, scale: f64) -> Self {
        self.scale_factor = Some(scale);
        self
    }

    pub fn add_offset(mut self, offset: f64) -> Self {
        self.add_offset = Some(offset);
        self
    }

    /// Composition of scale and offset. Required whenever either is set.
    pub fn scale_order(mut self, order: ScaleOrder) -> Self {
        self.scale_order = Some(order);
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    fn validate(&self) -> GeoResult<()> {
        if (self.scale_factor.is_some() || self.add_offset.is_some()) && self.scale_order.is_none()
        {
            return Err(GeoError::DecodeAmbiguity(format!(
                "scale_factor={:?} add_offset={:?} given without a scale order",
                self.scale_factor, self.add_offset
            )));
        }
        if let (Some(min), Some(max)) = (self.valid_min, self.valid_max) {
            if min > max {
                return Err(GeoError::invalid_parameter(
                    "valid_range",
                    format!("min {} > max {}", min, max),
                ));
            }
        }
        Ok(())
    }

    fn is_invalid(&self, raw: f64) -> bool {
        raw.is_nan()
            || self.fill_values.iter().any(|&f| raw == f)
            || self.valid_min.is_some_and(|min| raw < min)
            || self.valid_max.is_some_and(|max| raw > max)
    }

    fn convert(&self, raw: f64) -> f64 {
        match self.scale_order {
            Some(order) => order.apply(
                raw,
                self.scale_factor.unwrap_or(1.0),
                self.add_offset.unwrap_or(0.0),
            ),
            None => raw,
        }
    }

    /// Decode a raw array of any numeric storage type.
    ///
    /// # Errors
    /// - [`GeoError::DecodeAmbiguity`] if scale or offset is set without a
    ///   [`ScaleOrder`]
    /// - [`GeoError::InvalidParameter`] for an inverted valid range
    pub fn decode<T, S>(&self, raw: &ArrayBase<S, Ix2>) -> GeoResult<PhysicalRaster>
    where
        T: AsPrimitive<f64>,
        S: Data<Elem = T>,
    {
        self.validate()?;

        let mut values = Array2::from_elem(raw.raw_dim(), f64::NAN);
        let mut mask = Array2::from_elem(raw.raw_dim(), true);
        Zip::from(&mut values)
            .and(&mut mask)
            .and(raw)
            .for_each(|v, m, r| {
                let r: f64 = (*r).as_();
                if !self.is_invalid(r) {
                    *v = self.convert(r);
                    *m = false;
                }
            });

        let raster = PhysicalRaster {
            values,
            mask,
            units: self.units.clone(),
            long_name: self.long_name.clone(),
        };
        debug!(
            shape = ?raster.shape(),
            valid = raster.valid_count(),
            fills = self.fill_values.len(),
            order = ?self.scale_order,
            "Decoded raster"
        );
        Ok(raster)
    }

    /// Decode an existing raster again.
    ///
    /// Cells masked in the input stay masked; further fill codes and range
    /// limits can only mask more. With no fill codes, no range and no scale
    /// or offset the result equals the input.
    pub fn decode_raster(&self, raster: &PhysicalRaster) -> GeoResult<PhysicalRaster> {
        let mut decoded = self.decode(raster.values())?;
        Zip::from(&mut decoded.values)
            .and(&mut decoded.mask)
            .and(raster.mask())
            .for_each(|v, m, &was_masked| {
                if was_masked {
                    *v = f64::NAN;
                    *m = true;
                }
            });
        if decoded.units.is_empty() {
            decoded.units = raster.units.clone();
        }
        if decoded.long_name.is_empty() {
            decoded.long_name = raster.long_name.clone();
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fill_and_scale() {
        let decoder = ValueDecoder::new()
            .fill_value(-9999.0)
            .scale_factor(0.1)
            .add_offset(0.0)
            .scale_order(ScaleOrder::MultiplyThenAdd);
        let raster = decoder.decode(&array![[-9999i32, 50]]).unwrap();

        assert_eq!(raster.mask(), &array![[true, false]]);
        assert!(raster.values()[[0, 0]].is_nan());
        assert_eq!(raster.values()[[0, 1]], 5.0);
    }

    #[test]
    fn test_scale_without_order_is_ambiguous() {
        let decoder = ValueDecoder::new().scale_factor(0.02);
        let err = decoder.decode(&array![[1u16]]).unwrap_err();
        assert!(matches!(err, GeoError::DecodeAmbiguity(_)));

        let decoder = ValueDecoder::new().add_offset(-273.15);
        assert!(decoder.decode(&array![[1u16]]).is_err());
    }

    #[test]
    fn test_subtract_then_multiply() {
        // MODIS L2 style: value = scale * (raw - offset)
        let decoder = ValueDecoder::new()
            .scale_factor(0.5)
            .add_offset(100.0)
            .scale_order(ScaleOrder::SubtractThenMultiply);
        let raster = decoder.decode(&array![[110u8, 100]]).unwrap();
        assert_eq!(raster.values(), &array![[5.0, 0.0]]);
    }

    #[test]
    fn test_multiple_fill_codes_and_range() {
        let decoder = ValueDecoder::new()
            .fill_values([-32768.0, -32767.0])
            .valid_range(-100.0, 16000.0);
        let raster = decoder
            .decode(&array![[-32768i16, -32767, -101], [-100, 16000, 16001]])
            .unwrap();
        assert_eq!(
            raster.mask(),
            &array![[true, true, true], [false, false, true]]
        );
        assert_eq!(raster.valid_count(), 2);
    }

    #[test]
    fn test_float_nan_always_masked() {
        let raster = ValueDecoder::new()
            .decode(&array![[f32::NAN, 1.5f32]])
            .unwrap();
        assert_eq!(raster.mask(), &array![[true, false]]);
        assert_eq!(raster.get(0, 1), Some(1.5));
        assert_eq!(raster.get(0, 0), None);
        assert_eq!(raster.get(5, 5), None);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = ValueDecoder::new()
            .valid_range(10.0, 0.0)
            .decode(&array![[1.0f64]])
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidParameter { .. }));
    }

    #[test]
    fn test_statistics_skip_masked_cells() {
        let decoder = ValueDecoder::new()
            .fill_value(0.0)
            .scale_factor(2.0)
            .scale_order(ScaleOrder::MultiplyThenAdd);
        let raster = decoder.decode(&array![[0u8, 1, 2], [3, 0, 4]]).unwrap();
        assert_eq!(raster.valid_count(), 4);
        assert_eq!(raster.min(), Some(2.0));
        assert_eq!(raster.max(), Some(8.0));
        assert_eq!(raster.mean(), Some(5.0));
    }

    #[test]
    fn test_all_masked_statistics() {
        let raster = ValueDecoder::new()
            .fill_value(7.0)
            .decode(&array![[7i64, 7]])
            .unwrap();
        assert_eq!(raster.valid_count(), 0);
        assert_eq!(raster.min(), None);
        assert_eq!(raster.mean(), None);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let decoder = ValueDecoder::new()
            .fill_value(-1.0)
            .scale_factor(0.25)
            .add_offset(3.0)
            .scale_order(ScaleOrder::MultiplyThenAdd)
            .units("K")
            .long_name("brightness temperature");
        let once = decoder.decode(&array![[-1i16, 4, 8], [12, -1, 0]]).unwrap();
        let twice = ValueDecoder::new().decode_raster(&once).unwrap();

        assert_eq!(once.mask(), twice.mask());
        assert_eq!(once.units(), twice.units());
        assert_eq!(once.long_name(), twice.long_name());
        for (a, b) in once.values().iter().zip(twice.values().iter()) {
            assert!((a.is_nan() && b.is_nan()) || a == b);
        }
    }

    #[test]
    fn test_raster_new_masks_nan_values() {
        let raster = PhysicalRaster::new(
            array![[1.0, f64::NAN], [3.0, 4.0]],
            array![[false, false], [false, true]],
            "K",
            "",
        )
        .unwrap();

        assert_eq!(raster.mask(), &array![[false, true], [false, true]]);
        assert_eq!(raster.valid_count(), 2);
        assert_eq!(raster.mean(), Some(2.0));
        assert_eq!(raster.min(), Some(1.0));
        assert_eq!(raster.max(), Some(3.0));
        assert_eq!(raster.get(0, 1), None);
    }

    #[test]
    fn test_raster_new_shape_check() {
        let err = PhysicalRaster::new(
            Array2::zeros((2, 2)),
            Array2::from_elem((2, 3), false),
            "",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, GeoError::ShapeMismatch { .. }));

        let raster = PhysicalRaster::new(
            array![[1.0, 2.0]],
            array![[false, true]],
            "mm",
            "rain",
        )
        .unwrap();
        assert!(raster.values()[[0, 1]].is_nan());
        assert_eq!(raster.mean(), Some(1.0));
    }
}
