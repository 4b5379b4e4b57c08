//! Benchmarks for texture encoding.
//!
//! Run with: cargo bench --package renderer --bench encode_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::{cloud, png, wind, ColorRamp};
use test_utils::{cloud_fields, create_test_rgba_pixels, grid, wind_fields};

const SIZES: [(&str, grid::GridSpec); 3] = [
    ("1p00", grid::GFS_1P00),
    ("0p50", grid::GFS_0P50),
    ("0p25", grid::GFS_0P25),
];

fn bench_wind_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("wind_encode");
    group.sample_size(20);

    for (name, spec) in SIZES {
        let fields = wind_fields(spec.width, spec.height);
        group.throughput(Throughput::Elements(spec.size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &fields, |b, fields| {
            b.iter(|| wind::encode_wind(black_box(fields)))
        });
    }

    group.finish();
}

fn bench_cloud_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloud_encode");
    group.sample_size(20);

    for (name, spec) in SIZES {
        let fields = cloud_fields(spec.width, spec.height);
        group.throughput(Throughput::Elements(spec.size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &fields, |b, fields| {
            b.iter(|| cloud::encode_cloud(black_box(fields)))
        });
    }

    group.finish();
}

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encode");

    for (name, spec) in SIZES {
        let (width, height) = spec.texture_size();
        let pixels = create_test_rgba_pixels(width, height);
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &pixels, |b, pixels| {
            b.iter(|| png::create_png(black_box(pixels), width, height))
        });
    }

    group.finish();
}

fn bench_color_ramp(c: &mut Criterion) {
    let ramp = ColorRamp::default();
    c.bench_function("color_ramp_png", |b| b.iter(|| black_box(&ramp).to_png()));
}

criterion_group!(
    benches,
    bench_wind_encoding,
    bench_cloud_encoding,
    bench_png_encoding,
    bench_color_ramp,
);
criterion_main!(benches);
