// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator: the two public entry points, detect and rectify.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{DetectionResult, Quad, RectifyRequest, ScannerConfig};
use tracing::{debug, info, instrument};

use crate::detect::{extract_candidates, select_quad};
use crate::geometry::validate_quad;
use crate::rectify::{encode_jpeg, rectify_image};

/// Stateless detect/rectify front end.
///
/// Holds only configuration, so one instance can be shared across threads
/// and calls never influence each other.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ScannerConfig,
}

impl Pipeline {
    /// Build a pipeline, rejecting configurations that cannot work.
    pub fn new(config: ScannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Find the document boundary in `image`.
    ///
    /// Returns `Ok(None)` when nothing document-shaped is visible. Large
    /// frames are downscaled for the search; the returned quad is always in
    /// `image`'s own coordinates.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Result<Option<DetectionResult>> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ScanError::Decode("image has zero width or height".into()));
        }

        let max_side = self.config.detection.max_processing_side;
        let working: Cow<'_, DynamicImage> = if max_side > 0 && width.max(height) > max_side {
            debug!(max_side, "Downscaling frame for detection");
            Cow::Owned(image.resize(max_side, max_side, FilterType::Triangle))
        } else {
            Cow::Borrowed(image)
        };

        let candidates = extract_candidates(&working, &self.config.detection);
        let Some(detection) =
            select_quad(candidates, working.width(), working.height(), &self.config.selection)
        else {
            debug!("No document boundary found");
            return Ok(None);
        };

        let detection = if (working.width(), working.height()) == (width, height) {
            detection
        } else {
            detection.scaled_to(width, height)
        };
        info!(confidence = detection.confidence, "Document boundary detected");
        Ok(Some(detection))
    }

    /// Validate `quad` and warp the region it bounds onto an upright image.
    ///
    /// Serves both live capture and later re-editing of saved corners.
    #[instrument(skip(self, image, quad), fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &DynamicImage, quad: &Quad) -> Result<RgbImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ScanError::Decode("image has zero width or height".into()));
        }
        validate_quad(quad, self.config.rectify.min_area)?;
        rectify_image(image, quad, &self.config.rectify)
    }

    /// Rectify, then encode as JPEG at the request's quality.
    pub fn rectify_encoded(&self, image: &DynamicImage, request: RectifyRequest) -> Result<Vec<u8>> {
        let rectified = self.rectify(image, &request.quad)?;
        encode_jpeg(&rectified, self.resolve_quality(Some(request.quality)))
    }

    /// Quality to use for an optional caller-supplied value: the configured
    /// default when absent or NaN, clamped into [0, 1] otherwise.
    pub fn resolve_quality(&self, quality: Option<f64>) -> f64 {
        match quality {
            Some(q) if !q.is_nan() => q.clamp(0.0, 1.0),
            _ => self.config.rectify.default_quality,
        }
    }
}
