// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge and contour extraction: turns a raw frame into a ranked, lazily
// simplified sequence of candidate document quadrilaterals.

use image::DynamicImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::morphology::dilate;
use imageproc::point::Point as PixelPoint;
use scanwerk_core::Point;
use scanwerk_core::Quad;
use scanwerk_core::config::DetectionConfig;
use tracing::{debug, instrument};

use crate::geometry::{arc_length, distance, is_convex, order_corners, polygon_area};

/// A closed boundary traced from the edge map, in frame pixel coordinates.
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point>,
    /// Enclosed area in px², computed once at extraction time.
    pub area: f64,
}

/// Candidate quadrilaterals for one frame, largest contour first.
///
/// Polygon simplification runs on demand in `next()`, so a consumer that
/// stops at the first acceptable candidate never pays for the rest. The
/// sequence owns all of its buffers and shares nothing with other frames.
pub struct Candidates {
    contours: std::vec::IntoIter<Contour>,
    epsilon_fraction: f64,
}

impl Candidates {
    /// An empty sequence (e.g. for a zero-sized frame).
    pub fn empty() -> Self {
        Self {
            contours: Vec::new().into_iter(),
            epsilon_fraction: DetectionConfig::default().approx_epsilon_fraction,
        }
    }

    /// Number of contours not yet examined.
    pub fn remaining(&self) -> usize {
        self.contours.len()
    }
}

impl Iterator for Candidates {
    type Item = Quad;

    fn next(&mut self) -> Option<Quad> {
        for contour in self.contours.by_ref() {
            let epsilon = self.epsilon_fraction * arc_length(&contour.points);
            let polygon = approximate_polygon(&contour.points, epsilon);

            if polygon.len() != 4 {
                debug!(vertices = polygon.len(), area = contour.area, "contour is not a quadrilateral");
                continue;
            }
            if !is_convex(&polygon) {
                debug!(area = contour.area, "quadrilateral is not convex");
                continue;
            }
            match order_corners([polygon[0], polygon[1], polygon[2], polygon[3]]) {
                Ok(quad) => return Some(quad),
                Err(err) => debug!(error = %err, "discarding candidate"),
            }
        }
        None
    }
}

/// Run grayscale, blur, Canny, dilation and contour tracing on `image`, and
/// return the outer contours large enough to be a document, ordered by
/// descending enclosed area.
///
/// ## Pipeline
///
/// 1. Convert to a single intensity channel
/// 2. Gaussian blur to suppress paper texture and sensor noise
/// 3. Canny edge detection to a binary edge map
/// 4. Dilation so that corners broken by non-maximum suppression close up
/// 5. Border following; only outer borders are kept
#[instrument(skip(image, config), fields(width = image.width(), height = image.height()))]
pub fn extract_candidates(image: &DynamicImage, config: &DetectionConfig) -> Candidates {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Candidates::empty();
    }

    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
    let mut edges = canny(&blurred, config.canny_low, config.canny_high);
    if config.dilation_radius > 0 {
        edges = dilate(&edges, Norm::LInf, config.dilation_radius);
    }
    debug!("edge map ready");

    let min_area = config.min_contour_area_fraction * width as f64 * height as f64;

    let mut contours: Vec<Contour> = find_contours::<i32>(&edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.points.len() >= 4)
        .filter_map(|c| {
            let points: Vec<Point> = c
                .points
                .iter()
                .map(|p| Point::new(p.x as f64, p.y as f64))
                .collect();
            let area = polygon_area(&points);
            (area >= min_area).then_some(Contour { points, area })
        })
        .collect();

    contours.sort_by(|a, b| b.area.total_cmp(&a.area));
    contours.truncate(config.max_candidates);
    debug!(contours = contours.len(), min_area, "contours retained");

    Candidates {
        contours: contours.into_iter(),
        epsilon_fraction: config.approx_epsilon_fraction,
    }
}

/// Simplify a closed curve with the Douglas-Peucker algorithm.
///
/// The curve is split at two far-apart anchor points (the point farthest
/// from the first point, and the point farthest from that one) so the
/// result does not depend on where border following happened to start.
/// Each half is then simplified as an open chain by imageproc.
pub fn approximate_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 || !(epsilon > 0.0) {
        return points.to_vec();
    }

    let farthest_from = |origin: Point| -> usize {
        let mut best = 0;
        let mut best_d = -1.0;
        for (i, &p) in points.iter().enumerate() {
            let d = distance(origin, p);
            if d > best_d {
                best_d = d;
                best = i;
            }
        }
        best
    };
    let a = farthest_from(points[0]);
    let b = farthest_from(points[a]);
    if a == b {
        return vec![points[a]];
    }

    // Two open chains a -> b and b -> a, walking forward with wrap-around.
    let chain = |from: usize, to: usize| -> Vec<PixelPoint<f64>> {
        let mut out = Vec::new();
        let mut i = from;
        loop {
            out.push(PixelPoint::new(points[i].x, points[i].y));
            if i == to {
                break;
            }
            i = (i + 1) % n;
        }
        out
    };
    let first = approximate_polygon_dp(&chain(a, b), epsilon, false);
    let second = approximate_polygon_dp(&chain(b, a), epsilon, false);

    // Each chain keeps both endpoints; drop the shared ones.
    first[..first.len() - 1]
        .iter()
        .chain(&second[..second.len() - 1])
        .map(|p| Point::new(p.x, p.y))
        .collect()
}
