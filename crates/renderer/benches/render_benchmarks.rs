//! Benchmarks for the renderer crate - stroking segments onto a mosaic.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use map_common::{GeoPoint, RenderConfig, Segment, ViewFragment};
use rand::Rng;
use renderer::{OutputTemplate, StrokeStyle, TileRasterizer};

/// Random walks around a viewport center, staying on the canvas at zoom 14.
fn generate_segments(count: usize, len: usize, center: GeoPoint) -> Vec<Segment> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut lat = center.lat + rng.gen_range(-0.01..0.01);
            let mut lon = center.lon + rng.gen_range(-0.01..0.01);
            (0..len)
                .map(|_| {
                    lat += rng.gen_range(-0.0002..0.0002);
                    lon += rng.gen_range(-0.0002..0.0002);
                    GeoPoint::new(lat, lon)
                })
                .collect()
        })
        .collect()
}

fn blank(config: &RenderConfig) -> RgbaImage {
    RgbaImage::from_pixel(
        config.canvas_width(),
        config.canvas_height(),
        Rgba([240, 240, 240, 255]),
    )
}

// =============================================================================
// SEGMENT DRAWING BENCHMARKS
// =============================================================================

fn bench_draw_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_segments");
    group.sample_size(20);

    let config = RenderConfig::default();
    let fragment = ViewFragment::new(14, 59.437, 24.7536);
    let rasterizer = TileRasterizer::new(config.clone(), OutputTemplate::default());

    for (count, len) in [(1usize, 1_000usize), (10, 100), (40, 60), (200, 20)] {
        let segments = generate_segments(count, len, fragment.center());
        group.throughput(Throughput::Elements((count * len) as u64));
        group.bench_with_input(
            BenchmarkId::new("segments", format!("{}x{}", count, len)),
            &segments,
            |b, segments| {
                b.iter(|| {
                    rasterizer
                        .draw(blank(&config), black_box(segments), &[], &fragment)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

// =============================================================================
// LINE WIDTH IMPACT BENCHMARKS
// =============================================================================

fn bench_line_width_impact(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_width_impact");
    group.sample_size(20);

    let config = RenderConfig::default();
    let fragment = ViewFragment::new(14, 59.437, 24.7536);
    let segments = generate_segments(10, 200, fragment.center());

    for line_width in [1.0f32, 4.0, 8.0] {
        let stroke = StrokeStyle {
            line_width,
            ..StrokeStyle::default()
        };
        let rasterizer =
            TileRasterizer::new(config.clone(), OutputTemplate::default()).with_stroke(stroke);

        group.bench_with_input(BenchmarkId::new("width", line_width), &segments, |b, segments| {
            b.iter(|| {
                rasterizer
                    .draw(blank(&config), black_box(segments), &[], &fragment)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_draw_segments, bench_line_width_impact);
criterion_main!(benches);
