// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner session: one camera session's worth of state, owned by the host
// and passed to every call.

use std::sync::Arc;

use image::DynamicImage;
use scanwerk_core::config::{ColorControls, SessionConfig};
use scanwerk_core::error::Result;
use scanwerk_core::{CornerSet, DetectionResult, Quad, ScannerConfig};
use scanwerk_vision::codec::{ImageSource, decode_source, encode_base64_jpeg};
use scanwerk_vision::{Pipeline, apply_controls};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::classify::{DetectionKind, classify};
use crate::requests::{BridgeResponse, DetectRequestDto, RectifyRequestDto};
use crate::runtime::VisionBackend;
use crate::stability::StabilityTracker;

/// What one preview frame produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutcome {
    pub detection: Option<DetectionResult>,
    pub kind: Option<DetectionKind>,
    pub stable_counter: u32,
    pub ready_to_capture: bool,
}

/// Result of a capture: the flattened page (or the untouched frame when no
/// page was found), the frame itself, and the corners used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    pub cropped_image: String,
    pub initial_image: String,
    pub rectangle_coordinates: Option<CornerSet>,
}

/// Explicit handle for a live scanner.
///
/// Created when the camera view opens and consumed by [`ScannerSession::close`]
/// when it goes away. Every call site receives the handle it operates on.
#[derive(Debug)]
pub struct ScannerSession {
    backend: VisionBackend,
    session: SessionConfig,
    color: ColorControls,
    quality: f64,
    stability: StabilityTracker,
    frames: u64,
}

impl ScannerSession {
    /// Open a session on the best available vision backend.
    pub fn open(config: ScannerConfig) -> Result<Self> {
        let backend = VisionBackend::select(config)?;
        Ok(Self::with_backend(backend))
    }

    /// Open a session on an already selected backend.
    pub fn with_backend(backend: VisionBackend) -> Self {
        let config = backend.pipeline().config();
        let session = config.session.clone();
        let color = config.color.clone();
        let quality = config.rectify.default_quality;
        info!(backend = backend.name(), "Scanner session opened");
        Self {
            stability: StabilityTracker::new(session.detection_count_before_capture),
            backend,
            session,
            color,
            quality,
            frames: 0,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        self.backend.pipeline()
    }

    pub fn backend(&self) -> &VisionBackend {
        &self.backend
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn stable_counter(&self) -> u32 {
        self.stability.count()
    }

    // -- Live preview ---------------------------------------------------------

    /// Run detection on one preview frame and advance the stability count.
    #[instrument(skip(self, frame), fields(frame_index = self.frames))]
    pub fn process_frame(&mut self, frame: &DynamicImage) -> Result<FrameOutcome> {
        self.frames += 1;
        let adjusted = apply_controls(frame, &self.color);
        let detection = self.pipeline().detect(&adjusted)?;
        let kind = detection.as_ref().map(|d| classify(d, &self.session));
        let stable_counter = self.stability.record(detection.is_some());
        let ready_to_capture = !self.session.manual_only && self.stability.is_ready();
        debug!(stable_counter, ready_to_capture, ?kind, "Frame processed");
        Ok(FrameOutcome {
            detection,
            kind,
            stable_counter,
            ready_to_capture,
        })
    }

    // -- Capture and re-edit --------------------------------------------------

    /// Capture `image`: detect, then flatten the page if one was found.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn capture(&mut self, image: &DynamicImage) -> Result<CaptureResult> {
        let adjusted = apply_controls(image, &self.color);
        let pipeline = self.backend.pipeline();
        let quality = pipeline.resolve_quality(Some(self.quality));
        let initial_image = encode_base64_jpeg(&adjusted.to_rgb8(), quality)?;

        let result = match pipeline.detect(&adjusted)? {
            Some(detection) => {
                let rectified = pipeline.rectify(&adjusted, &detection.quad)?;
                CaptureResult {
                    cropped_image: encode_base64_jpeg(&rectified, quality)?,
                    initial_image,
                    rectangle_coordinates: Some(CornerSet::from(detection.quad)),
                }
            }
            None => {
                info!("No page detected, returning the original frame");
                CaptureResult {
                    cropped_image: initial_image.clone(),
                    initial_image,
                    rectangle_coordinates: None,
                }
            }
        };
        self.stability.reset();
        Ok(result)
    }

    /// Re-crop a stored image with user-adjusted corners.
    pub fn reapply_perspective_crop(&self, request: &RectifyRequestDto) -> BridgeResponse<String> {
        BridgeResponse::from_result(self.rectify_request(request))
    }

    fn rectify_request(&self, request: &RectifyRequestDto) -> Result<String> {
        let image = decode_source(&ImageSource::parse(request.require_image()?))?;
        let quad = request.require_corners()?;
        let pipeline = self.pipeline();
        let quality = pipeline.resolve_quality(Some(request.quality.unwrap_or(self.quality)));
        let rectified = pipeline.rectify(&image, &quad)?;
        encode_base64_jpeg(&rectified, quality)
    }

    /// Detect on a still image supplied by the host.
    pub fn detect_request(&self, request: &DetectRequestDto) -> BridgeResponse<Option<DetectionResult>> {
        let result = decode_source(&ImageSource::parse(&request.image))
            .and_then(|image| self.pipeline().detect(&image));
        BridgeResponse::from_result(result)
    }

    /// Rectify on the blocking pool so the caller's task is not held up.
    ///
    /// Must be called from within a tokio runtime. Dropping the handle
    /// discards the result.
    pub fn spawn_rectify(&self, image: Arc<DynamicImage>, quad: Quad) -> JoinHandle<Result<String>> {
        spawn_rectify(self.pipeline().clone(), image, quad, self.quality)
    }

    // -- Settings ---------------------------------------------------------------

    pub fn set_detection_count_before_capture(&mut self, count: u32) {
        self.session.detection_count_before_capture = count;
        self.stability.set_required(count);
    }

    pub fn set_color_controls(&mut self, controls: ColorControls) {
        self.color = controls;
    }

    pub fn set_manual_only(&mut self, manual_only: bool) {
        self.session.manual_only = manual_only;
    }

    /// Output quality in [0, 1]; NaN restores the configured default.
    pub fn set_quality(&mut self, quality: f64) {
        self.quality = self.pipeline().resolve_quality(Some(quality));
    }

    /// End the session.
    pub fn close(self) {
        info!(frames = self.frames, "Scanner session closed");
    }
}

/// Rectify and encode on tokio's blocking pool.
pub fn spawn_rectify(
    pipeline: Pipeline,
    image: Arc<DynamicImage>,
    quad: Quad,
    quality: f64,
) -> JoinHandle<Result<String>> {
    tokio::task::spawn_blocking(move || {
        let rectified = pipeline.rectify(&image, &quad)?;
        encode_base64_jpeg(&rectified, pipeline.resolve_quality(Some(quality)))
    })
}
