// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.
//
// Edge thresholds, blur strength and simplification tolerance are tunables,
// not constants: different cameras and lighting want different values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Complete scanner settings, persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub detection: DetectionConfig,
    pub selection: SelectionConfig,
    pub rectify: RectifyConfig,
    pub session: SessionConfig,
    pub color: ColorControls,
}

/// Edge and contour extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Radius (L-infinity) of the dilation that closes gaps in the edge map.
    /// Zero disables dilation.
    pub dilation_radius: u8,
    /// Douglas-Peucker tolerance as a fraction of contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// Contours enclosing less than this fraction of the frame are dropped
    /// before simplification.
    pub min_contour_area_fraction: f64,
    /// Upper bound on how many contours are simplified per frame.
    pub max_candidates: usize,
    /// Frames whose longer side exceeds this are downscaled for detection.
    /// Zero disables downscaling.
    pub max_processing_side: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            dilation_radius: 1,
            approx_epsilon_fraction: 0.02,
            min_contour_area_fraction: 0.01,
            max_candidates: 16,
            max_processing_side: 1200,
        }
    }
}

/// Candidate acceptance bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub min_area_fraction: f64,
    pub max_area_fraction: f64,
    /// Lower bound on output width / height.
    pub min_aspect_ratio: f64,
    /// Upper bound on output width / height.
    pub max_aspect_ratio: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.05,
            max_area_fraction: 0.98,
            min_aspect_ratio: 0.3,
            max_aspect_ratio: 3.3,
        }
    }
}

/// Fill colour for output pixels that back-project outside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    White,
    Black,
}

impl Background {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::White => [255, 255, 255],
            Self::Black => [0, 0, 0],
        }
    }
}

/// Smallest quadrilateral, in px², that will be rectified.
pub const MIN_RECTIFY_AREA: f64 = 100.0;

/// Longest output edge, in px, a rectification may produce.
pub const MAX_OUTPUT_SIDE: u32 = 8192;

/// Rectification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    /// Output quality used when a request does not carry one.
    pub default_quality: f64,
    pub background: Background,
    /// Quads enclosing less than this many px² are rejected.
    pub min_area: f64,
    /// Quads whose rectified output would exceed this edge length are
    /// rejected before anything is allocated.
    pub max_output_side: u32,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            default_quality: 0.8,
            background: Background::White,
            min_area: MIN_RECTIFY_AREA,
            max_output_side: MAX_OUTPUT_SIDE,
        }
    }
}

/// Live camera-session behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Consecutive detections required before capture is enabled.
    pub detection_count_before_capture: u32,
    /// Maximum corner misalignment, as a fraction of the frame dimension,
    /// before a detection is reported as a bad angle.
    pub bad_angle_tolerance: f64,
    /// Detections covering less than this fraction of the frame are
    /// reported as too far away.
    pub too_far_area_fraction: f64,
    /// Never signal ready-to-capture; the user triggers capture manually.
    pub manual_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detection_count_before_capture: 8,
            bad_angle_tolerance: 0.1,
            too_far_area_fraction: 0.2,
            manual_only: false,
        }
    }
}

/// Colour controls applied to frames before detection and capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorControls {
    /// Additive brightness in [-1, 1].
    pub brightness: f32,
    /// Contrast factor around mid-grey; 1.0 is neutral.
    pub contrast: f32,
    /// Saturation factor; 0.0 is grey, 1.0 is neutral.
    pub saturation: f32,
    /// Convert frames to grayscale.
    pub grayscale: bool,
}

impl Default for ColorControls {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            grayscale: false,
        }
    }
}

impl ColorControls {
    /// True when applying these controls would not change any pixel.
    pub fn is_neutral(&self) -> bool {
        self.brightness == 0.0 && self.contrast == 1.0 && self.saturation == 1.0 && !self.grayscale
    }
}

impl ScannerConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values that cannot produce a working pipeline.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        if !(d.blur_sigma > 0.0) {
            return Err(ScanError::Config(format!(
                "blur_sigma must be positive, got {}",
                d.blur_sigma
            )));
        }
        if !(d.canny_low >= 0.0 && d.canny_low <= d.canny_high) {
            return Err(ScanError::Config(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                d.canny_low, d.canny_high
            )));
        }
        if !(d.approx_epsilon_fraction > 0.0 && d.approx_epsilon_fraction < 1.0) {
            return Err(ScanError::Config(
                "approx_epsilon_fraction must lie in (0, 1)".into(),
            ));
        }
        if d.max_candidates == 0 {
            return Err(ScanError::Config("max_candidates must be at least 1".into()));
        }

        let s = &self.selection;
        if !(0.0 <= s.min_area_fraction
            && s.min_area_fraction < s.max_area_fraction
            && s.max_area_fraction <= 1.0)
        {
            return Err(ScanError::Config(format!(
                "area fractions must satisfy 0 <= min < max <= 1, got {} / {}",
                s.min_area_fraction, s.max_area_fraction
            )));
        }
        if !(s.min_aspect_ratio > 0.0 && s.min_aspect_ratio <= s.max_aspect_ratio) {
            return Err(ScanError::Config(format!(
                "aspect bounds must satisfy 0 < min <= max, got {} / {}",
                s.min_aspect_ratio, s.max_aspect_ratio
            )));
        }

        if !(0.0..=1.0).contains(&self.rectify.default_quality) {
            return Err(ScanError::Config(format!(
                "default_quality must lie in [0, 1], got {}",
                self.rectify.default_quality
            )));
        }
        if !(self.rectify.min_area >= 0.0) {
            return Err(ScanError::Config(format!(
                "min_area must be non-negative, got {}",
                self.rectify.min_area
            )));
        }
        if self.rectify.max_output_side == 0 {
            return Err(ScanError::Config("max_output_side must be at least 1".into()));
        }
        Ok(())
    }
}
