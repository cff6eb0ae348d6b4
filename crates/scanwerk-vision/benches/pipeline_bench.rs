// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanwerk-vision pipeline: detection on a
// preview-sized frame and rectification of a skewed page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;

use scanwerk_core::{Point, Quad};
use scanwerk_vision::Pipeline;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 640x480 frame with a skewed white page on a dark desk.
fn preview_frame() -> DynamicImage {
    let mut img = RgbImage::from_pixel(640, 480, Rgb([35, 30, 28]));
    let page = [
        PixelPoint::new(110, 60),
        PixelPoint::new(520, 80),
        PixelPoint::new(500, 420),
        PixelPoint::new(130, 440),
    ];
    draw_polygon_mut(&mut img, &page, Rgb([245, 245, 240]));
    DynamicImage::ImageRgb8(img)
}

fn page_quad() -> Quad {
    Quad::new(
        Point::new(110.0, 60.0),
        Point::new(520.0, 80.0),
        Point::new(500.0, 420.0),
        Point::new(130.0, 440.0),
    )
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Detection is the per-frame hot path during live preview.
fn bench_detect(c: &mut Criterion) {
    let frame = preview_frame();
    let pipeline = Pipeline::default();

    c.bench_function("detect (640x480)", |b| {
        b.iter(|| {
            let result = pipeline.detect(black_box(&frame));
            black_box(result.ok());
        });
    });
}

/// Rectification of a ~410x380 page from the same frame.
fn bench_rectify(c: &mut Criterion) {
    let frame = preview_frame();
    let quad = page_quad();
    let pipeline = Pipeline::default();

    c.bench_function("rectify (640x480 -> page)", |b| {
        b.iter(|| {
            let result = pipeline.rectify(black_box(&frame), black_box(&quad));
            black_box(result.ok());
        });
    });
}

criterion_group!(benches, bench_detect, bench_rectify);
criterion_main!(benches);
