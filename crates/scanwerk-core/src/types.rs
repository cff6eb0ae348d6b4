// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk document scanner.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// A 2D coordinate in image pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An ordered document boundary: top-left, top-right, bottom-right,
/// bottom-left, going clockwise in image space.
///
/// Construction does not validate; use the geometry utilities in
/// `scanwerk-vision` before handing a quad to the rectifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Axis-aligned quad covering a `width` x `height` frame edge to edge.
    pub fn full_frame(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self::new(
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        )
    }

    /// Corners in clockwise order starting at top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Scale every corner independently on each axis.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let s = |p: Point| Point::new(p.x * sx, p.y * sy);
        Self::new(
            s(self.top_left),
            s(self.top_right),
            s(self.bottom_right),
            s(self.bottom_left),
        )
    }
}

/// Caller-facing named corners as delivered by the host application.
///
/// Every field is optional so that incomplete payloads can be reported as
/// `InvalidGeometry` instead of failing at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSet {
    pub top_left: Option<Point>,
    pub top_right: Option<Point>,
    pub bottom_left: Option<Point>,
    pub bottom_right: Option<Point>,
}

impl CornerSet {
    /// Convert to a `Quad`, checking that all four corners are present and
    /// finite. The caller's naming is trusted; no re-ordering happens here.
    pub fn into_quad(self) -> Result<Quad> {
        let pick = |p: Option<Point>, name: &str| -> Result<Point> {
            let p = p.ok_or_else(|| {
                ScanError::InvalidGeometry(format!("missing corner {name}"))
            })?;
            if !p.is_finite() {
                return Err(ScanError::InvalidGeometry(format!(
                    "corner {name} has non-finite coordinates"
                )));
            }
            Ok(p)
        };
        Ok(Quad::new(
            pick(self.top_left, "topLeft")?,
            pick(self.top_right, "topRight")?,
            pick(self.bottom_right, "bottomRight")?,
            pick(self.bottom_left, "bottomLeft")?,
        ))
    }
}

impl From<Quad> for CornerSet {
    fn from(q: Quad) -> Self {
        Self {
            top_left: Some(q.top_left),
            top_right: Some(q.top_right),
            bottom_left: Some(q.bottom_left),
            bottom_right: Some(q.bottom_right),
        }
    }
}

/// A detected document boundary for a single frame.
///
/// The quad is expressed in the coordinate space of the frame it was
/// detected in (`image_width` x `image_height`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub quad: Quad,
    /// Area fraction of the frame covered by the quad, clamped to [0, 1].
    pub confidence: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl DetectionResult {
    /// Re-express this detection against a frame of a different size.
    pub fn scaled_to(&self, width: u32, height: u32) -> Self {
        let sx = width as f64 / self.image_width.max(1) as f64;
        let sy = height as f64 / self.image_height.max(1) as f64;
        Self {
            quad: self.quad.scaled(sx, sy),
            confidence: self.confidence,
            image_width: width,
            image_height: height,
        }
    }
}

/// A single rectification call: quad in the source image's coordinate
/// space plus output quality in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectifyRequest {
    pub quad: Quad,
    pub quality: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_set_requires_all_corners() {
        let set = CornerSet {
            top_left: Some(Point::new(0.0, 0.0)),
            top_right: Some(Point::new(10.0, 0.0)),
            bottom_left: None,
            bottom_right: Some(Point::new(10.0, 10.0)),
        };
        let err = set.into_quad().unwrap_err();
        assert!(err.to_string().contains("bottomLeft"));
    }

    #[test]
    fn corner_set_rejects_nan() {
        let mut set = CornerSet::from(Quad::full_frame(10, 10));
        set.top_right = Some(Point::new(f64::NAN, 0.0));
        assert!(matches!(set.into_quad(), Err(ScanError::InvalidGeometry(_))));
    }

    #[test]
    fn corner_set_json_uses_camel_case() {
        let json = r#"{"topLeft":{"x":1,"y":2},"topRight":{"x":9,"y":2},
                       "bottomLeft":{"x":1,"y":8},"bottomRight":{"x":9,"y":8}}"#;
        let set: CornerSet = serde_json::from_str(json).unwrap();
        let quad = set.into_quad().unwrap();
        assert_eq!(quad.bottom_right, Point::new(9.0, 8.0));
    }

    #[test]
    fn detection_scales_to_new_frame() {
        let det = DetectionResult {
            quad: Quad::full_frame(100, 50),
            confidence: 0.5,
            image_width: 100,
            image_height: 50,
        };
        let scaled = det.scaled_to(200, 200);
        assert_eq!(scaled.quad.bottom_right, Point::new(200.0, 200.0));
        assert_eq!(scaled.confidence, 0.5);
    }
}
