// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Full detect-then-rectify run on a synthetic skewed page.

mod common;

use common::{near, page_on_black};
use scanwerk_core::RectifyRequest;
use scanwerk_vision::Pipeline;
use scanwerk_vision::codec::decode_bytes;

const CORNERS: [(i32, i32); 4] = [(100, 100), (900, 120), (880, 880), (120, 900)];

#[test]
fn skewed_page_is_found_and_flattened() {
    let frame = page_on_black(1000, 1000, &CORNERS);
    let pipeline = Pipeline::default();

    let detection = pipeline
        .detect(&frame)
        .unwrap()
        .expect("the page should be detected");
    let quad = detection.quad;
    println!("detected {:?} confidence {}", quad, detection.confidence);

    assert!(near(quad.top_left, (100.0, 100.0), 8.0), "{:?}", quad.top_left);
    assert!(near(quad.top_right, (900.0, 120.0), 8.0), "{:?}", quad.top_right);
    assert!(near(quad.bottom_right, (880.0, 880.0), 8.0), "{:?}", quad.bottom_right);
    assert!(near(quad.bottom_left, (120.0, 900.0), 8.0), "{:?}", quad.bottom_left);
    assert!(detection.confidence > 0.6);
    assert_eq!((detection.image_width, detection.image_height), (1000, 1000));

    let jpeg = pipeline
        .rectify_encoded(&frame, RectifyRequest { quad, quality: 0.9 })
        .unwrap();
    let output = decode_bytes(&jpeg).unwrap().to_rgb8();
    let (w, h) = output.dimensions();
    assert!((770..=815).contains(&w), "width {w}");
    assert!((770..=815).contains(&h), "height {h}");

    // The detected outline sits on the edge band, so only the interior is
    // expected to be clean paper.
    let inset = 16;
    for y in inset..h - inset {
        for x in inset..w - inset {
            let p = output.get_pixel(x, y).0;
            assert!(p.iter().all(|&c| c >= 235), "pixel ({x}, {y}) = {p:?}");
        }
    }
}

#[test]
fn detection_is_repeatable() {
    let frame = page_on_black(1000, 1000, &CORNERS);
    let pipeline = Pipeline::default();
    let first = pipeline.detect(&frame).unwrap();
    let second = pipeline.detect(&frame).unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}
