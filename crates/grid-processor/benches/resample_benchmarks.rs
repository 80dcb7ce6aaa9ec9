//! Benchmarks for mesh construction, decoding and swath resampling.
//!
//! Run with: cargo bench --package grid-processor
//! Or: cargo bench --package grid-processor --bench resample_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use geo_common::{BoundingBox, EndpointConvention, ScaleOrder};
use grid_processor::{
    CoordinateMeshBuilder, ProcessorConfig, ResampleMode, SwathResampler, TargetGrid, ValueDecoder,
};
use test_utils::{bbox, create_random_swath, create_raster_with_fill, fill};

// =============================================================================
// MESH BENCHMARKS
// =============================================================================

fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh");

    for size in [240usize, 1200, 2400] {
        let builder = CoordinateMeshBuilder::new(
            size,
            size,
            (-11_119_505.196667, 4_447_802.078667),
            (-10_007_554.677, 3_335_851.559),
            EndpointConvention::Exclusive,
        )
        .unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &builder, |b, builder| {
            b.iter(|| black_box(builder.build()))
        });
    }

    group.finish();
}

// =============================================================================
// DECODE BENCHMARKS
// =============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let decoder = ValueDecoder::new()
        .fill_value(fill::INT16_FILL as f64)
        .valid_range(-100.0, 16000.0)
        .scale_factor(0.0001)
        .scale_order(ScaleOrder::MultiplyThenAdd);

    for size in [240usize, 1200] {
        let raw = create_raster_with_fill(size, size, fill::INT16_FILL);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("int16", size), &raw, |b, raw| {
            b.iter(|| decoder.decode(black_box(raw)))
        });
    }

    group.finish();
}

// =============================================================================
// RESAMPLE BENCHMARKS
// =============================================================================

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    group.sample_size(20);

    let (min_lon, min_lat, max_lon, max_lat) = bbox::WEST_US;
    let target = TargetGrid::new(BoundingBox::new(min_lon, min_lat, max_lon, max_lat), 0.1).unwrap();

    for n in [10_000usize, 100_000] {
        let swath = create_random_swath(n, bbox::WEST_US, 1);
        group.throughput(Throughput::Elements(n as u64));

        for mode in [ResampleMode::Nearest, ResampleMode::Bucket] {
            let resampler = SwathResampler::new(
                ProcessorConfig::default()
                    .with_mode(mode)
                    .with_radius(15_000.0),
            )
            .unwrap();
            group.bench_with_input(BenchmarkId::new(mode.as_str(), n), &swath, |b, swath| {
                b.iter(|| {
                    resampler.resample(
                        black_box(&swath.lon),
                        black_box(&swath.lat),
                        black_box(&swath.values),
                        &target,
                    )
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_mesh, bench_decode, bench_resample);
criterion_main!(benches);
