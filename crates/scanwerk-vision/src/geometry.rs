// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point and quadrilateral math: corner ordering, area, output sizing and
// validity checks shared by detection and rectification.

use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{Point, Quad};

/// Two corners closer than this (in pixels) are treated as coincident.
pub const MIN_CORNER_DISTANCE: f64 = 1.0;

/// Minimum |sin| of the angle at any corner triple. Below this the three
/// points are considered collinear.
pub const COLLINEAR_TOLERANCE: f64 = 1e-3;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Signed polygon area via the shoelace formula.
///
/// Positive for clockwise winding in image space (y down), negative for
/// counter-clockwise.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    twice / 2.0
}

/// Unsigned polygon area.
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

/// Unsigned quadrilateral area.
pub fn quad_area(quad: &Quad) -> f64 {
    polygon_area(&quad.corners())
}

/// Perimeter of a closed polyline.
pub fn arc_length(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| distance(points[i], points[(i + 1) % n])).sum()
}

/// z-component of (b - a) x (c - b).
fn turn(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// True when every turn of the closed polygon has the same sign.
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for i in 0..n {
        let t = turn(points[i], points[(i + 1) % n], points[(i + 2) % n]);
        if t == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = t.signum();
        } else if t.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Assign four unordered points to top-left, top-right, bottom-right and
/// bottom-left.
///
/// The smallest `x + y` is top-left and the largest is bottom-right; of the
/// remaining two, the larger `x - y` is top-right.
pub fn order_corners(points: [Point; 4]) -> Result<Quad> {
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(ScanError::InvalidGeometry(format!(
            "corner ({}, {}) is not finite",
            p.x, p.y
        )));
    }
    for i in 0..4 {
        for j in (i + 1)..4 {
            if distance(points[i], points[j]) < MIN_CORNER_DISTANCE {
                return Err(ScanError::InvalidGeometry(format!(
                    "corners ({:.1}, {:.1}) and ({:.1}, {:.1}) coincide",
                    points[i].x, points[i].y, points[j].x, points[j].y
                )));
            }
        }
    }

    let mut by_sum = points;
    by_sum.sort_by(|a, b| (a.x + a.y).total_cmp(&(b.x + b.y)));
    let top_left = by_sum[0];
    let bottom_right = by_sum[3];

    let (a, b) = (by_sum[1], by_sum[2]);
    let (top_right, bottom_left) = if a.x - a.y >= b.x - b.y {
        (a, b)
    } else {
        (b, a)
    };

    Ok(Quad::new(top_left, top_right, bottom_right, bottom_left))
}

/// Output canvas size for rectifying `quad`: the longer of each pair of
/// opposing edges, rounded, never below one pixel.
pub fn target_dimensions(quad: &Quad) -> (u32, u32) {
    let top = distance(quad.top_left, quad.top_right);
    let bottom = distance(quad.bottom_left, quad.bottom_right);
    let left = distance(quad.top_left, quad.bottom_left);
    let right = distance(quad.top_right, quad.bottom_right);

    let to_px = |v: f64| -> u32 {
        if v.is_finite() {
            v.round().clamp(1.0, u32::MAX as f64) as u32
        } else {
            1
        }
    };
    (to_px(top.max(bottom)), to_px(left.max(right)))
}

/// Check that `quad` can be rectified: finite, no coincident or collinear
/// corners, convex, clockwise, and enclosing at least `min_area` px².
pub fn validate_quad(quad: &Quad, min_area: f64) -> Result<()> {
    let corners = quad.corners();

    if corners.iter().any(|p| !p.is_finite()) {
        return Err(ScanError::InvalidGeometry(
            "quadrilateral has non-finite coordinates".into(),
        ));
    }

    for i in 0..4 {
        for j in (i + 1)..4 {
            if distance(corners[i], corners[j]) < MIN_CORNER_DISTANCE {
                return Err(ScanError::InvalidGeometry(format!(
                    "corners {i} and {j} coincide"
                )));
            }
        }
    }

    // Every triple of the four corners (each one omits a single corner).
    for skip in 0..4 {
        let tri: Vec<Point> = (0..4).filter(|&k| k != skip).map(|k| corners[k]).collect();
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        let scale = distance(a, b).max(distance(b, c)).max(distance(a, c));
        if cross.abs() <= COLLINEAR_TOLERANCE * scale * scale {
            return Err(ScanError::InvalidGeometry(format!(
                "three corners are collinear (omitting corner {skip})"
            )));
        }
    }

    if !is_convex(&corners) {
        return Err(ScanError::InvalidGeometry(
            "quadrilateral is not convex or self-intersects".into(),
        ));
    }
    if signed_area(&corners) < 0.0 {
        return Err(ScanError::InvalidGeometry(
            "corners are not in clockwise top-left, top-right, bottom-right, bottom-left order"
                .into(),
        ));
    }

    let area = quad_area(quad);
    if area < min_area {
        return Err(ScanError::InvalidGeometry(format!(
            "quadrilateral area {area:.1} px² is below the minimum {min_area:.1} px²"
        )));
    }
    Ok(())
}
