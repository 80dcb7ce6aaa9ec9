//! Building a [`GridDescriptor`] from metadata and a product profile.

use geo_common::{GeoError, GeoResult, GridDescriptor, ProductProfile};
use tracing::debug;

use crate::corners::parse_grid_corners;
use crate::structure::{find_grid, parse_grid_structures, GridStructure};

/// Build the descriptor of one grid in a metadata blob.
///
/// The grid is chosen by `grid_name`, falling back to the profile's
/// `grid_name`. Without a name the first corner pair in the text is used and
/// the shape comes from `shape` or, failing that, the first grid block.
///
/// Corner values are converted with the profile's corner units; the
/// projection and endpoint convention always come from the profile.
///
/// # Errors
/// - [`GeoError::MetadataParse`] for missing or malformed metadata
/// - [`GeoError::ShapeMismatch`] if `shape` disagrees with the named block
/// - [`GeoError::InvalidParameter`] if the block's GCTP code names a
///   different projection family than the profile
/// - [`GeoError::InvalidGridShape`] for empty or degenerate grids
pub fn descriptor_from_metadata(
    text: &str,
    profile: &ProductProfile,
    grid_name: Option<&str>,
    shape: Option<(usize, usize)>,
) -> GeoResult<GridDescriptor> {
    let name = grid_name.or(profile.grid_name.as_deref());

    let (rows, cols, upper_left, lower_right) = match name {
        Some(name) => {
            let grid = find_grid(text, name)?;
            check_projection(&grid, profile)?;
            if let Some(explicit) = shape {
                if explicit != grid.shape() {
                    return Err(GeoError::shape_mismatch(grid.shape(), explicit));
                }
            }
            (grid.y_dim, grid.x_dim, grid.upper_left, grid.lower_right)
        }
        None => {
            let corners = parse_grid_corners(text)?;
            let (rows, cols) = match shape {
                Some(s) => s,
                None => parse_grid_structures(text)
                    .map_err(|e| {
                        GeoError::metadata(format!(
                            "grid shape not given and not readable from metadata: {}",
                            e
                        ))
                    })?
                    .first()
                    .map(GridStructure::shape)
                    .ok_or_else(|| GeoError::metadata("no grid blocks"))?,
            };
            (rows, cols, corners.upper_left, corners.lower_right)
        }
    };

    let upper_left = profile.corner_units.apply_pair(upper_left);
    let lower_right = profile.corner_units.apply_pair(lower_right);

    debug!(
        product = %profile.name,
        grid = ?name,
        rows,
        cols,
        ?upper_left,
        ?lower_right,
        "Grid descriptor from metadata"
    );

    GridDescriptor::new(
        rows,
        cols,
        upper_left,
        lower_right,
        profile.projection.clone(),
        profile.endpoint,
    )
}

fn check_projection(grid: &GridStructure, profile: &ProductProfile) -> GeoResult<()> {
    match grid.projection.agrees_with(&profile.projection) {
        Some(false) => Err(GeoError::invalid_parameter(
            "projection",
            format!(
                "grid '{}' declares {} but product '{}' uses {}",
                grid.name, grid.projection, profile.name, profile.projection
            ),
        )),
        _ => Ok(()),
    }
}
