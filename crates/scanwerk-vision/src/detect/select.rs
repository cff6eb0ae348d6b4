// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection: picks the current frame's document boundary
// from the ranked candidates, or reports that there is none.

use scanwerk_core::config::SelectionConfig;
use scanwerk_core::{DetectionResult, Quad};
use tracing::debug;

use crate::geometry::{quad_area, target_dimensions};

/// Take the first (largest) candidate whose area fraction and aspect ratio
/// are plausible for a document.
///
/// Returns `None` when nothing qualifies; there is no full-frame fallback.
pub fn select_quad<I>(
    candidates: I,
    image_width: u32,
    image_height: u32,
    config: &SelectionConfig,
) -> Option<DetectionResult>
where
    I: IntoIterator<Item = Quad>,
{
    let frame_area = image_width as f64 * image_height as f64;
    if frame_area <= 0.0 {
        return None;
    }

    for quad in candidates {
        let fraction = quad_area(&quad) / frame_area;
        if fraction < config.min_area_fraction || fraction > config.max_area_fraction {
            debug!(fraction, "candidate area outside bounds");
            continue;
        }

        let (w, h) = target_dimensions(&quad);
        let aspect = w as f64 / h as f64;
        if aspect < config.min_aspect_ratio || aspect > config.max_aspect_ratio {
            debug!(aspect, "candidate aspect ratio implausible");
            continue;
        }

        return Some(DetectionResult {
            quad,
            confidence: fraction.clamp(0.0, 1.0),
            image_width,
            image_height,
        });
    }
    None
}
