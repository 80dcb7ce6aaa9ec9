//! `GROUP=GRID_n ... END_GROUP=GRID_n` block parsing.

use std::collections::HashMap;
use std::fmt;

use geo_common::{GeoError, GeoResult, ProjectionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::corners::parse_number;

static GRID_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*GROUP\s*=\s*(GRID_\d+)\s*$").expect("static regex"));
static GRID_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*END_GROUP\s*=\s*(GRID_\d+)\s*$").expect("static regex"));
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*([A-Za-z][A-Za-z0-9_]*)\s*=\s*(.*?)\s*$").expect("static regex")
});

/// GCTP projection code named in a grid block.
///
/// Informational only: the projection used for transforms always comes from
/// the product profile. A known code that disagrees with the profile is
/// reported as an error by [`crate::descriptor_from_metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GctpProjection {
    Sinusoidal,
    LambertAzimuthal,
    PolarStereographic,
    Geographic,
    Other(String),
}

impl GctpProjection {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "GCTP_SNSOID" => Self::Sinusoidal,
            "GCTP_LAMAZ" => Self::LambertAzimuthal,
            "GCTP_PS" => Self::PolarStereographic,
            "GCTP_GEO" => Self::Geographic,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Sinusoidal => "GCTP_SNSOID",
            Self::LambertAzimuthal => "GCTP_LAMAZ",
            Self::PolarStereographic => "GCTP_PS",
            Self::Geographic => "GCTP_GEO",
            Self::Other(code) => code,
        }
    }

    /// Whether `kind` belongs to the same projection family.
    ///
    /// Returns `None` for unrecognized codes, where no judgement is possible.
    pub fn agrees_with(&self, kind: &ProjectionKind) -> Option<bool> {
        let agrees = match self {
            Self::Sinusoidal => matches!(kind, ProjectionKind::Sinusoidal { .. }),
            Self::LambertAzimuthal => {
                matches!(kind, ProjectionKind::LambertAzimuthalEqualArea { .. })
            }
            Self::PolarStereographic => matches!(kind, ProjectionKind::PolarStereographic { .. }),
            Self::Geographic => matches!(kind, ProjectionKind::Geographic),
            Self::Other(_) => return None,
        };
        Some(agrees)
    }
}

impl fmt::Display for GctpProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One grid definition from the `GridStructure` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStructure {
    /// ODL group name, e.g. `GRID_1`
    pub group: String,
    /// `GridName` with quotes removed
    pub name: String,
    /// Number of columns
    pub x_dim: usize,
    /// Number of rows
    pub y_dim: usize,
    pub upper_left: (f64, f64),
    pub lower_right: (f64, f64),
    pub projection: GctpProjection,
    /// `ProjParams` (GCTP packed parameter list), empty if absent
    pub proj_params: Vec<f64>,
    /// `GridOrigin`, e.g. `HDFE_GD_UL`
    pub grid_origin: Option<String>,
    pub sphere_code: Option<i32>,
}

impl GridStructure {
    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.y_dim, self.x_dim)
    }

    fn from_block(group: &str, body: &str) -> GeoResult<Self> {
        let fields = block_fields(body);
        let field = |key: &str| {
            fields.get(key).copied().ok_or_else(|| {
                GeoError::metadata(format!("{}: {} not found", group, key))
            })
        };

        let name = fields
            .get("GridName")
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or_else(|| group.to_string());
        let x_dim = parse_dim(group, "XDim", field("XDim")?)?;
        let y_dim = parse_dim(group, "YDim", field("YDim")?)?;
        let upper_left = parse_pair(group, "UpperLeftPointMtrs", field("UpperLeftPointMtrs")?)?;
        let lower_right = parse_pair(group, "LowerRightMtrs", field("LowerRightMtrs")?)?;

        let projection = fields
            .get("Projection")
            .map(|code| GctpProjection::from_code(code))
            .unwrap_or_else(|| GctpProjection::Other(String::new()));

        let proj_params = match fields.get("ProjParams") {
            Some(v) => parse_list(group, "ProjParams", v)?,
            None => Vec::new(),
        };

        let sphere_code = match fields.get("SphereCode") {
            Some(v) => Some(v.parse::<i32>().map_err(|_| {
                GeoError::metadata(format!("{}: SphereCode '{}' is not an integer", group, v))
            })?),
            None => None,
        };

        Ok(Self {
            group: group.to_string(),
            name,
            x_dim,
            y_dim,
            upper_left,
            lower_right,
            projection,
            proj_params,
            grid_origin: fields.get("GridOrigin").map(|v| v.to_string()),
            sphere_code,
        })
    }
}

/// A `GROUP=GRID_n` block before field parsing.
struct RawBlock<'a> {
    group: &'a str,
    body: &'a str,
}

fn raw_blocks(text: &str) -> GeoResult<Vec<RawBlock<'_>>> {
    let mut blocks = Vec::new();
    for caps in GRID_GROUP.captures_iter(text) {
        let (Some(whole), Some(group)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let rest = &text[whole.end()..];
        let end = GRID_END
            .captures_iter(rest)
            .find(|c| c.get(1).map(|g| g.as_str()) == Some(group.as_str()))
            .and_then(|c| c.get(0))
            .ok_or_else(|| {
                let group = group.as_str();
                GeoError::metadata(format!("{} has no END_GROUP={}", group, group))
            })?;
        blocks.push(RawBlock {
            group: group.as_str(),
            body: &rest[..end.start()],
        });
    }
    Ok(blocks)
}

/// Top-level `key=value` pairs of a block. Nested groups also contain
/// `key=value` lines; the first occurrence of a key wins, and the grid-level
/// keys always precede nested `Dimension`/`DataField` groups.
fn block_fields(body: &str) -> HashMap<&str, &str> {
    let mut fields = HashMap::new();
    for caps in KEY_VALUE.captures_iter(body) {
        if let (Some(k), Some(v)) = (caps.get(1), caps.get(2)) {
            fields.entry(k.as_str()).or_insert(v.as_str());
        }
    }
    fields
}

fn parse_dim(group: &str, key: &str, value: &str) -> GeoResult<usize> {
    value.parse::<usize>().map_err(|_| {
        GeoError::metadata(format!("{}: {} '{}' is not a dimension", group, key, value))
    })
}

fn parse_list(group: &str, key: &str, value: &str) -> GeoResult<Vec<f64>> {
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| GeoError::metadata(format!("{}: {} '{}' is not a list", group, key, value)))?;
    inner
        .split(',')
        .map(|token| parse_number(token.trim(), key))
        .collect()
}

fn parse_pair(group: &str, key: &str, value: &str) -> GeoResult<(f64, f64)> {
    match parse_list(group, key, value)?.as_slice() {
        [x, y] => Ok((*x, *y)),
        other => Err(GeoError::metadata(format!(
            "{}: {} has {} values, expected 2",
            group,
            key,
            other.len()
        ))),
    }
}

/// Parse every grid block in a `StructMetadata` text.
///
/// # Errors
/// [`GeoError::MetadataParse`] if there are no grid blocks, a block is not
/// terminated, or any block lacks `XDim`, `YDim` or one of the corners.
pub fn parse_grid_structures(text: &str) -> GeoResult<Vec<GridStructure>> {
    let blocks = raw_blocks(text)?;
    if blocks.is_empty() {
        return Err(GeoError::metadata("no GROUP=GRID_n blocks found"));
    }

    let grids = blocks
        .iter()
        .map(|b| GridStructure::from_block(b.group, b.body))
        .collect::<GeoResult<Vec<_>>>()?;

    debug!(
        count = grids.len(),
        names = ?grids.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
        "Parsed grid structures"
    );
    Ok(grids)
}

/// Find the grid whose `GridName` is `name` and parse only that block.
///
/// Other blocks are not validated, so a malformed sibling grid does not
/// prevent reading a well-formed one.
pub fn find_grid(text: &str, name: &str) -> GeoResult<GridStructure> {
    let blocks = raw_blocks(text)?;
    let mut available = Vec::new();

    for block in &blocks {
        let grid_name = block_fields(block.body)
            .get("GridName")
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or_else(|| block.group.to_string());
        if grid_name == name {
            return GridStructure::from_block(block.group, block.body);
        }
        available.push(grid_name);
    }

    Err(GeoError::metadata(format!(
        "grid '{}' not found (available: {:?})",
        name, available
    )))
}
