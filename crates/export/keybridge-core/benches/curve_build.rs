use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keybridge_core::{
    build_segments, export_property, sample, Destination, ExportConfig, ExportRequest,
    GeometryContext, KeyframeTrack, PropertyKind, TimeRange,
};
use keybridge_test_fixtures::properties;

fn load(name: &str) -> KeyframeTrack {
    properties::load(name).expect("fixture should load")
}

fn bench_curve_build(c: &mut Criterion) {
    let config = ExportConfig::default();
    let spatial = load("position-spatial");
    let scalar = load("scalar-ease");

    c.bench_function("build_segments_spatial", |b| {
        b.iter(|| build_segments(black_box(&spatial), &config).expect("curve"))
    });
    c.bench_function("build_segments_scalar", |b| {
        b.iter(|| build_segments(black_box(&scalar), &config).expect("curve"))
    });
}

fn bench_sampling(c: &mut Criterion) {
    let config = ExportConfig::default();
    let track = load("rotation-hold");
    // Ten seconds at 60 fps.
    let range = TimeRange::new(0.0, 10.0, 1.0 / 60.0).expect("range");

    c.bench_function("sample_600_frames", |b| {
        b.iter(|| sample(black_box(&track), &range, &config).expect("series"))
    });
}

fn bench_export(c: &mut Criterion) {
    let config = ExportConfig::default();
    let track = load("position-spatial");
    let geometry = GeometryContext::new(1920.0, 1080.0, 30.0);
    let keypoint = ExportRequest::new(PropertyKind::Position, Destination::Keypoint, geometry.clone());
    let table = ExportRequest::new(PropertyKind::Position, Destination::Table, geometry);

    c.bench_function("export_keypoint_position", |b| {
        b.iter(|| export_property(black_box(&track), &keypoint, &config).expect("export"))
    });
    c.bench_function("export_table_position", |b| {
        b.iter(|| export_property(black_box(&track), &table, &config).expect("export"))
    });
}

criterion_group!(benches, bench_curve_build, bench_sampling, bench_export);
criterion_main!(benches);
