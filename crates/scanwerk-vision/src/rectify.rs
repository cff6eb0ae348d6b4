// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectifier: warps the region inside a quadrilateral onto an
// upright rectangle and encodes the result.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use scanwerk_core::Quad;
use scanwerk_core::config::RectifyConfig;
use scanwerk_core::error::{Result, ScanError};
use tracing::{debug, info, instrument};

use crate::geometry::target_dimensions;
use crate::homography::Homography;

/// Slack allowed when deciding whether a back-projected sample still lies
/// inside the source extent.
const EDGE_EPSILON: f64 = 1e-6;

/// Warp the region bounded by `quad` onto a fresh upright image.
///
/// The output is `target_dimensions(quad)` in size. Each output pixel centre
/// is mapped back into `image` through the inverse homography and sampled
/// bilinearly. Samples landing outside the source get the configured
/// background colour.
///
/// The quad's shape is not validated here; `Pipeline::rectify` does that
/// first. An output edge longer than `config.max_output_side` is rejected
/// with `InvalidGeometry` before anything is allocated.
#[instrument(skip(image, quad, config), fields(src_w = image.width(), src_h = image.height()))]
pub fn rectify_image(image: &DynamicImage, quad: &Quad, config: &RectifyConfig) -> Result<RgbImage> {
    let (width, height) = target_dimensions(quad);
    if width.max(height) > config.max_output_side {
        return Err(ScanError::InvalidGeometry(format!(
            "rectified output {width}x{height} exceeds the {} px limit",
            config.max_output_side
        )));
    }
    let (w, h) = (width as f64, height as f64);

    let src = quad.corners().map(|p| [p.x, p.y]);
    let dst = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];

    let forward = Homography::from_pairs(&src, &dst).ok_or_else(|| {
        ScanError::Processing("perspective transform could not be solved".into())
    })?;
    let inverse = forward
        .inverse()
        .ok_or_else(|| ScanError::Processing("perspective transform is not invertible".into()))?;
    debug!(width, height, "homography ready");

    let source = image.to_rgb8();
    let background = Rgb(config.background.rgb());

    let output = RgbImage::from_fn(width, height, |x, y| {
        let centre = [x as f64 + 0.5, y as f64 + 0.5];
        inverse
            .project(centre)
            .and_then(|[sx, sy]| sample_bilinear(&source, sx - 0.5, sy - 0.5))
            .unwrap_or(background)
    });

    info!(width, height, "Rectified document");
    Ok(output)
}

/// Bilinear sample at continuous pixel coordinates, where integer
/// coordinates address pixel centres.
///
/// Positions up to half a pixel beyond the outermost centres are clamped to
/// the edge; anything further out returns `None`.
pub fn sample_bilinear(image: &RgbImage, x: f64, y: f64) -> Option<Rgb<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let max_x = width as f64 - 1.0;
    let max_y = height as f64 - 1.0;
    if x < -0.5 - EDGE_EPSILON
        || y < -0.5 - EDGE_EPSILON
        || x > max_x + 0.5 + EDGE_EPSILON
        || y > max_y + 0.5 + EDGE_EPSILON
    {
        return None;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgb(out))
}

/// Map a quality in [0, 1] onto the JPEG encoder's 1..=100 scale.
///
/// Out-of-range values are clamped and NaN gives the lowest setting; callers
/// resolve missing or NaN qualities with `Pipeline::resolve_quality` first.
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

/// Encode `image` as JPEG at `quality` in [0, 1].
pub fn encode_jpeg(image: &RgbImage, quality: f64) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
    image
        .write_with_encoder(encoder)
        .map_err(|err| ScanError::Processing(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::Point;
    use scanwerk_core::config::Background;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) * 3 % 256) as u8])
        })
    }

    #[test]
    fn full_extent_quad_reproduces_image() {
        let src = gradient(64, 48);
        let out = rectify_image(
            &DynamicImage::ImageRgb8(src.clone()),
            &Quad::full_frame(64, 48),
            &RectifyConfig::default(),
        )
        .unwrap();
        assert_eq!(out.dimensions(), (64, 48));
        assert_eq!(out, src);
    }

    #[test]
    fn inner_region_is_extracted() {
        let mut src = RgbImage::from_pixel(200, 200, Rgb([10, 10, 10]));
        for y in 50..150 {
            for x in 40..160 {
                src.put_pixel(x, y, Rgb([200, 30, 30]));
            }
        }
        let quad = Quad::new(
            Point::new(40.0, 50.0),
            Point::new(160.0, 50.0),
            Point::new(160.0, 150.0),
            Point::new(40.0, 150.0),
        );
        let out = rectify_image(&DynamicImage::ImageRgb8(src), &quad, &RectifyConfig::default())
            .unwrap();
        assert_eq!(out.dimensions(), (120, 100));
        assert!(out.pixels().all(|p| *p == Rgb([200, 30, 30])));
    }

    #[test]
    fn outside_samples_use_background() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([0, 0, 255])));
        let quad = Quad::new(
            Point::new(-50.0, -50.0),
            Point::new(100.0, -50.0),
            Point::new(100.0, 100.0),
            Point::new(-50.0, 100.0),
        );
        let white = rectify_image(&src, &quad, &RectifyConfig::default()).unwrap();
        assert_eq!(*white.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*white.get_pixel(75, 75), Rgb([0, 0, 255]));

        let config = RectifyConfig {
            background: Background::Black,
            ..Default::default()
        };
        let black = rectify_image(&src, &quad, &config).unwrap();
        assert_eq!(*black.get_pixel(149, 149), Rgb([0, 0, 0]));
    }

    #[test]
    fn oversized_output_is_rejected_before_allocation() {
        let src = DynamicImage::ImageRgb8(gradient(10, 10));
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(5e9, 0.0),
            Point::new(5e9, 5e9),
            Point::new(0.0, 5e9),
        );
        assert!(matches!(
            rectify_image(&src, &quad, &RectifyConfig::default()),
            Err(ScanError::InvalidGeometry(_))
        ));

        let config = RectifyConfig {
            max_output_side: 40,
            ..Default::default()
        };
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(41.0, 0.0),
            Point::new(41.0, 10.0),
            Point::new(0.0, 10.0),
        );
        assert!(rectify_image(&src, &quad, &config).is_err());
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 10.0),
            Point::new(0.0, 10.0),
        );
        assert_eq!(rectify_image(&src, &quad, &config).unwrap().dimensions(), (40, 10));
    }

    #[test]
    fn collinear_corners_fail_to_solve() {
        let src = DynamicImage::ImageRgb8(gradient(10, 10));
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        );
        assert!(matches!(
            rectify_image(&src, &quad, &RectifyConfig::default()),
            Err(ScanError::Processing(_))
        ));
    }

    #[test]
    fn sampling_clamps_half_pixel_border() {
        let img = gradient(4, 4);
        assert_eq!(sample_bilinear(&img, -0.5, -0.5), Some(*img.get_pixel(0, 0)));
        assert_eq!(sample_bilinear(&img, 3.5, 3.5), Some(*img.get_pixel(3, 3)));
        assert_eq!(sample_bilinear(&img, -0.6, 1.0), None);
        assert_eq!(sample_bilinear(&img, f64::NAN, 1.0), None);
    }

    #[test]
    fn sampling_interpolates_midpoints() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([100, 200, 50]));
        assert_eq!(sample_bilinear(&img, 0.5, 0.0), Some(Rgb([50, 100, 25])));
    }

    #[test]
    fn quality_mapping() {
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(1.7), 100);
        assert_eq!(jpeg_quality(-3.0), 1);
        assert_eq!(jpeg_quality(f64::NAN), 1);
    }

    #[test]
    fn encodes_jpeg() {
        let bytes = encode_jpeg(&gradient(16, 16), 0.9).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
