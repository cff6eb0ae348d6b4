// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic frames shared by the scenario tests.

#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use scanwerk_core::Point;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A white convex polygon on a black background.
pub fn page_on_black(width: u32, height: u32, corners: &[(i32, i32)]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, BLACK);
    let poly: Vec<PixelPoint<i32>> = corners.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect();
    draw_polygon_mut(&mut img, &poly, WHITE);
    DynamicImage::ImageRgb8(img)
}

/// A white disc on a black background.
pub fn disc_on_black(size: u32, radius: i32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(size, size, BLACK);
    let c = size as i32 / 2;
    draw_filled_circle_mut(&mut img, (c, c), radius, WHITE);
    DynamicImage::ImageRgb8(img)
}

/// Deterministic texture with detail in every channel.
pub fn texture(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 13 % 256) as u8,
            (y * 29 % 256) as u8,
            ((x ^ y) * 5 % 256) as u8,
        ])
    }))
}

/// True when `a` and `b` are within `tol` pixels on both axes.
pub fn near(a: Point, b: (f64, f64), tol: f64) -> bool {
    (a.x - b.0).abs() <= tol && (a.y - b.1).abs() <= tol
}
