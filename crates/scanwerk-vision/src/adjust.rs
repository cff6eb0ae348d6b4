// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame colour controls: brightness, contrast, saturation and grayscale,
// applied to preview frames before detection and to captured images.

use image::{DynamicImage, ImageBuffer, Rgba};
use scanwerk_core::config::ColorControls;
use tracing::{debug, instrument};

/// Colour adjustment chain over a single in-memory image.
///
/// Every method consumes `self` and returns the adjusted image wrapped
/// again, so calls chain:
///
/// ```ignore
/// let frame = ColorAdjuster::from_dynamic(frame)
///     .brightness(0.1)
///     .contrast(1.2)
///     .grayscale()
///     .into_dynamic();
/// ```
pub struct ColorAdjuster {
    image: DynamicImage,
}

impl ColorAdjuster {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Shift every channel by `amount` × 255. `amount` is clamped to [-1, 1].
    pub fn brightness(self, amount: f32) -> Self {
        let offset = amount.clamp(-1.0, 1.0) * 255.0;
        if offset == 0.0 {
            return self;
        }
        debug!(offset, "Adjusting brightness");
        self.map_channels(|v| v + offset)
    }

    /// Scale every channel's distance from mid-grey by `factor`.
    pub fn contrast(self, factor: f32) -> Self {
        if factor == 1.0 || !factor.is_finite() {
            return self;
        }
        debug!(factor, "Adjusting contrast");
        self.map_channels(|v| factor * (v - 128.0) + 128.0)
    }

    /// Blend each pixel between its luma (0.0) and its original colour (1.0).
    /// Values above 1.0 push colours further from grey.
    pub fn saturation(self, factor: f32) -> Self {
        if factor == 1.0 || !factor.is_finite() {
            return self;
        }
        debug!(factor, "Adjusting saturation");
        let rgba = self.image.to_rgba8();
        let adjusted = ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            let blend = |c: u8| -> u8 { (luma + factor * (c as f32 - luma)).round().clamp(0.0, 255.0) as u8 };
            Rgba([blend(r), blend(g), blend(b), a])
        });
        Self {
            image: DynamicImage::ImageRgba8(adjusted),
        }
    }

    /// Convert to single-channel luma.
    pub fn grayscale(self) -> Self {
        debug!("Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    fn map_channels(self, f: impl Fn(f32) -> f32) -> Self {
        let rgba = self.image.to_rgba8();
        let adjusted = ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let adjust = |c: u8| -> u8 { f(c as f32).round().clamp(0.0, 255.0) as u8 };
            Rgba([adjust(r), adjust(g), adjust(b), a])
        });
        Self {
            image: DynamicImage::ImageRgba8(adjusted),
        }
    }
}

/// Apply `controls` to `image` in the order brightness, contrast,
/// saturation, grayscale. Neutral controls return an untouched copy.
#[instrument(skip(image, controls), fields(width = image.width(), height = image.height()))]
pub fn apply_controls(image: &DynamicImage, controls: &ColorControls) -> DynamicImage {
    if controls.is_neutral() {
        return image.clone();
    }
    let adjusted = ColorAdjuster::from_dynamic(image.clone())
        .brightness(controls.brightness)
        .contrast(controls.contrast)
        .saturation(controls.saturation);
    if controls.grayscale {
        adjusted.grayscale().into_dynamic()
    } else {
        adjusted.into_dynamic()
    }
}
