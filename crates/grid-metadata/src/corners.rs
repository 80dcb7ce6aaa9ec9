//! Corner coordinate extraction.

use geo_common::{GeoError, GeoResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// Tokens are captured loosely so that a malformed number is reported by
// name instead of surfacing as a missing key.
static UPPER_LEFT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UpperLeftPointMtrs\s*=\s*\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)")
        .expect("static regex")
});
static LOWER_RIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"LowerRightMtrs\s*=\s*\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)")
        .expect("static regex")
});

/// Upper-left and lower-right corners as stored in the metadata.
///
/// Values are returned exactly as parsed. Geographic grids store packed
/// degrees and some products micro-degrees under the same keys; converting
/// them is the job of the product's [`geo_common::CornerUnits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCorners {
    /// (x0, y0)
    pub upper_left: (f64, f64),
    /// (x1, y1)
    pub lower_right: (f64, f64),
}

/// Extract the first `UpperLeftPointMtrs=(X,Y)` and `LowerRightMtrs=(X,Y)`
/// pairs from a metadata blob.
///
/// The two keys may appear in either order and with any whitespace around
/// `=`, the parentheses and the comma.
///
/// # Errors
/// [`GeoError::MetadataParse`] if either key is missing or a captured token
/// is not a number.
pub fn parse_grid_corners(text: &str) -> GeoResult<GridCorners> {
    let upper_left = capture_pair(&UPPER_LEFT, text, "UpperLeftPointMtrs")?;
    let lower_right = capture_pair(&LOWER_RIGHT, text, "LowerRightMtrs")?;

    debug!(?upper_left, ?lower_right, "Parsed grid corners");

    Ok(GridCorners {
        upper_left,
        lower_right,
    })
}

pub(crate) fn capture_pair(re: &Regex, text: &str, key: &str) -> GeoResult<(f64, f64)> {
    let caps = re
        .captures(text)
        .ok_or_else(|| GeoError::metadata(format!("{} not found", key)))?;
    let x = parse_number(&caps[1], key)?;
    let y = parse_number(&caps[2], key)?;
    Ok((x, y))
}

pub(crate) fn parse_number(token: &str, key: &str) -> GeoResult<f64> {
    let value: f64 = token
        .parse()
        .map_err(|_| GeoError::metadata(format!("{}: '{}' is not a number", key, token)))?;
    if !value.is_finite() {
        return Err(GeoError::metadata(format!(
            "{}: '{}' is not a finite number",
            key, token
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let corners =
            parse_grid_corners("UpperLeftPointMtrs=(-180.0,90.0)\nLowerRightMtrs=(180.0,-90.0)")
                .unwrap();
        assert_eq!(corners.upper_left, (-180.0, 90.0));
        assert_eq!(corners.lower_right, (180.0, -90.0));
    }

    #[test]
    fn test_order_and_whitespace_tolerant() {
        let text = "LowerRightMtrs = ( 9036842.762500 , -9036842.762500 )\n\t\tUpperLeftPointMtrs=\t(-9036842.762500,9036842.762500)";
        let corners = parse_grid_corners(text).unwrap();
        assert_eq!(corners.upper_left, (-9036842.7625, 9036842.7625));
        assert_eq!(corners.lower_right, (9036842.7625, -9036842.7625));
    }

    #[test]
    fn test_scientific_and_packed_values() {
        let text = "UpperLeftPointMtrs=(-180000000.000000,9.0e7) LowerRightMtrs=(+180000000,-90000000.0)";
        let corners = parse_grid_corners(text).unwrap();
        assert_eq!(corners.upper_left, (-180_000_000.0, 90_000_000.0));
        assert_eq!(corners.lower_right, (180_000_000.0, -90_000_000.0));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "UpperLeftPointMtrs=(1,2)\nLowerRightMtrs=(3,4)\nUpperLeftPointMtrs=(5,6)\nLowerRightMtrs=(7,8)";
        let corners = parse_grid_corners(text).unwrap();
        assert_eq!(corners.upper_left, (1.0, 2.0));
        assert_eq!(corners.lower_right, (3.0, 4.0));
    }

    #[test]
    fn test_missing_key() {
        let err = parse_grid_corners("UpperLeftPointMtrs=(1,2)").unwrap_err();
        assert!(matches!(err, GeoError::MetadataParse(ref m) if m.contains("LowerRightMtrs")));

        let err = parse_grid_corners("").unwrap_err();
        assert!(matches!(err, GeoError::MetadataParse(ref m) if m.contains("UpperLeftPointMtrs")));
    }

    #[test]
    fn test_unparseable_token() {
        let err = parse_grid_corners("UpperLeftPointMtrs=(abc,2)\nLowerRightMtrs=(3,4)").unwrap_err();
        assert!(matches!(err, GeoError::MetadataParse(ref m) if m.contains("'abc'")));

        let err = parse_grid_corners("UpperLeftPointMtrs=(1,2)\nLowerRightMtrs=(3,inf)").unwrap_err();
        assert!(matches!(err, GeoError::MetadataParse(_)));
    }
}
