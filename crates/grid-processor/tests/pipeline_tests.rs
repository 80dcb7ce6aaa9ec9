//! End-to-end tests: metadata text to geolocated, decoded and resampled grids.

use geo_common::{BoundingBox, GeoError, GridDescriptor, LongitudeDomain, ProductCatalog, ScaleOrder};
use grid_processor::{GridPipeline, ProcessorConfig, ResampleMode, TargetGrid};
use test_utils::{
    assert_approx_eq, assert_coords_approx_eq, bbox, create_raster_with_fill, fill,
    init_test_tracing, metadata,
};

fn pipeline(name: &str, config: ProcessorConfig) -> GridPipeline {
    let profile = ProductCatalog::builtin().get(name).unwrap().clone();
    GridPipeline::new(profile, config).unwrap()
}

/// Same corners and projection as `grid`, fewer cells.
fn coarsen(grid: &GridDescriptor, rows: usize, cols: usize) -> GridDescriptor {
    GridDescriptor::new(
        rows,
        cols,
        grid.upper_left(),
        grid.lower_right(),
        grid.projection().clone(),
        grid.endpoint(),
    )
    .unwrap()
}

// =============================================================================
// MODIS sinusoidal tile
// =============================================================================

#[test]
fn test_modis_tile_geolocation() {
    init_test_tracing();
    let modis = pipeline("modis_sinusoidal", ProcessorConfig::default());

    let grid = modis.descriptor(metadata::MODIS_H08V05, None).unwrap();
    assert_eq!(grid.shape(), (2400, 2400));

    let mesh = modis.geolocate(&coarsen(&grid, 24, 24)).unwrap();
    assert_eq!(mesh.shape(), (24, 24));
    assert_eq!(mesh.valid_count(), 24 * 24);

    // Upper-left corner of h08v05
    assert_coords_approx_eq!(
        (mesh.lon[[0, 0]], mesh.lat[[0, 0]]),
        (-130.5407, 40.0),
        1e-3
    );
    // Rows run south, columns east
    assert!(mesh.lat[[23, 0]] < mesh.lat[[0, 0]]);
    assert!(mesh.lon[[0, 23]] > mesh.lon[[0, 0]]);
}

#[test]
fn test_modis_tile_decode_and_resample() {
    init_test_tracing();
    let config = ProcessorConfig::default().with_radius(60_000.0);
    let modis = pipeline("modis_sinusoidal", config);

    let grid = coarsen(&modis.descriptor(metadata::MODIS_H08V05, None).unwrap(), 24, 24);
    let raw = create_raster_with_fill(24, 24, fill::INT16_FILL);
    let decoder = modis
        .decoder()
        .fill_value(fill::INT16_FILL as f64)
        .scale_factor(0.0001)
        .scale_order(ScaleOrder::MultiplyThenAdd)
        .units("reflectance");

    let (mesh, raster) = modis.process(&grid, &raw, &decoder).unwrap();
    assert_eq!(raster.valid_count(), 24 * 24 - 24);
    assert!(raster.get(5, 5).is_none());
    assert_approx_eq!(raster.get(0, 1).unwrap(), 0.01, 1e-12);

    let (min_lon, min_lat, max_lon, max_lat) = bbox::WEST_US;
    let target =
        TargetGrid::new(BoundingBox::new(min_lon, min_lat, max_lon, max_lat), 0.25).unwrap();
    let gridded = modis.resample(&mesh.lon, &mesh.lat, &raster, &target).unwrap();

    assert_eq!(gridded.shape(), target.shape());
    assert_eq!(gridded.units(), "reflectance");
    assert!(gridded.valid_count() > 0);

    // Nearest neighbour never invents values
    let (lo, hi) = (raster.min().unwrap(), raster.max().unwrap());
    assert!(gridded.valid_values().all(|v| v >= lo && v <= hi));

    // Inside the tile
    let (row, col) = target.cell_of(-120.0, 38.0).unwrap();
    assert!(gridded.get(row, col).is_some());

    // The tile is a sinusoidal wedge: narrow to the north-east, and it
    // stops at 40°N
    for (lon, lat) in [(-110.1, 39.9), (-124.9, 30.1), (-120.0, 44.9)] {
        let (row, col) = target.cell_of(lon, lat).unwrap();
        assert!(gridded.get(row, col).is_none(), "({}, {}) was filled", lon, lat);
    }
}

#[test]
fn test_process_rejects_wrong_raster_shape() {
    let modis = pipeline("modis_sinusoidal", ProcessorConfig::default());
    let grid = coarsen(&modis.descriptor(metadata::MODIS_H08V05, None).unwrap(), 24, 24);
    let raw = create_raster_with_fill(24, 12, fill::INT16_FILL);
    let err = modis.process(&grid, &raw, &modis.decoder()).unwrap_err();
    assert!(matches!(err, GeoError::ShapeMismatch { .. }));
}

// =============================================================================
// EASE-Grid
// =============================================================================

#[test]
fn test_ease_grid_named_grids() {
    init_test_tracing();
    let north = pipeline("ease_grid_north", ProcessorConfig::default());
    let south = pipeline("ease_grid_south", ProcessorConfig::default());

    let grid_n = north.descriptor(metadata::AMSR_E_EASE, None).unwrap();
    let grid_s = south.descriptor(metadata::AMSR_E_EASE, None).unwrap();
    assert_eq!(grid_n.shape(), (721, 721));
    assert_eq!(grid_n.projection(), &north.profile().projection);
    assert_eq!(grid_s.projection(), &south.profile().projection);

    let mesh_n = north.geolocate(&coarsen(&grid_n, 72, 72)).unwrap();
    let mesh_s = south.geolocate(&coarsen(&grid_s, 72, 72)).unwrap();

    // Corners are off the disk
    assert!(mesh_n.lon[[0, 0]].is_nan());
    assert!(mesh_n.valid_count() < 72 * 72);
    assert!(mesh_n.valid_count() > 72 * 72 / 2);

    // The pole sits in the middle of the grid
    assert_approx_eq!(mesh_n.lat[[36, 36]], 90.0, 1e-6);
    assert_approx_eq!(mesh_s.lat[[36, 36]], -90.0, 1e-6);
}

#[test]
fn test_ease_grid_unknown_name() {
    let north = pipeline("ease_grid_north", ProcessorConfig::default());
    let err = north.descriptor(metadata::AMSR_E_EASE, Some("Equatorial")).unwrap_err();
    assert!(matches!(err, GeoError::MetadataParse(_)));
    assert!(err.to_string().contains("Northern Hemisphere"));
}

#[test]
fn test_ease_grid_wrong_family() {
    // A LAMAZ block read with the sinusoidal profile
    let modis = pipeline("modis_sinusoidal", ProcessorConfig::default());
    let err = modis
        .descriptor(metadata::AMSR_E_EASE, Some("Northern Hemisphere"))
        .unwrap_err();
    assert!(matches!(err, GeoError::InvalidParameter { .. }));
}

// =============================================================================
// Geographic grids
// =============================================================================

#[test]
fn test_global_grid_from_bare_corners() {
    let cmg = pipeline("geographic_cmg", ProcessorConfig::default());
    let mut profile = cmg.profile().clone();
    profile.corner_units = geo_common::CornerUnits::Native;
    profile.endpoint = geo_common::EndpointConvention::Inclusive;
    let global = GridPipeline::new(profile, ProcessorConfig::default()).unwrap();

    let grid = global.descriptor_with_shape(metadata::GLOBAL_2X2, (2, 2)).unwrap();
    let mut mesh = global.geolocate(&grid).unwrap();
    assert_eq!(mesh.lon[[0, 0]], -180.0);
    assert_eq!(mesh.lon[[0, 1]], 180.0);
    assert_eq!(mesh.lat[[1, 0]], -90.0);

    mesh.normalize_longitudes(LongitudeDomain::Positive);
    assert_eq!(mesh.lon[[0, 0]], 180.0);
    assert_eq!(mesh.lon[[0, 1]], 180.0);
}

#[test]
fn test_bucket_pipeline_single_point() {
    let config = ProcessorConfig::default()
        .with_mode(ResampleMode::Bucket)
        .with_radius(200_000.0);
    let cmg = pipeline("geographic_cmg", config);

    let (min_lon, min_lat, max_lon, max_lat) = bbox::SMALL;
    let target = TargetGrid::new(BoundingBox::new(min_lon, min_lat, max_lon, max_lat), 1.0).unwrap();
    let raster = grid_processor::PhysicalRaster::from_values(ndarray::array![[5.0]]);
    let out = cmg
        .resample(&ndarray::array![[10.0]], &ndarray::array![[20.0]], &raster, &target)
        .unwrap();

    assert_eq!(out.get(0, 0), Some(5.0));
    assert_eq!(out.valid_count(), 1);
}
