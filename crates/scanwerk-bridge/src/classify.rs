// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection quality hints shown to the user while framing the page.

use scanwerk_core::DetectionResult;
use scanwerk_core::config::SessionConfig;
use serde::{Deserialize, Serialize};

/// How usable a detection looks for capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionKind {
    Good,
    /// The page is visibly tilted relative to the camera.
    BadAngle,
    /// The page fills too little of the frame.
    TooFar,
}

/// Classify `detection` against the session thresholds.
///
/// A detection is a bad angle when opposing corners disagree on the shared
/// axis by more than `bad_angle_tolerance` of the frame dimension. Angle
/// takes precedence over distance.
pub fn classify(detection: &DetectionResult, config: &SessionConfig) -> DetectionKind {
    let q = &detection.quad;
    let max_dx = config.bad_angle_tolerance * detection.image_width as f64;
    let max_dy = config.bad_angle_tolerance * detection.image_height as f64;

    if (q.top_right.y - q.top_left.y).abs() > max_dy
        || (q.top_right.x - q.bottom_right.x).abs() > max_dx
        || (q.top_left.x - q.bottom_left.x).abs() > max_dx
        || (q.bottom_left.y - q.bottom_right.y).abs() > max_dy
    {
        return DetectionKind::BadAngle;
    }
    if detection.confidence < config.too_far_area_fraction {
        return DetectionKind::TooFar;
    }
    DetectionKind::Good
}
