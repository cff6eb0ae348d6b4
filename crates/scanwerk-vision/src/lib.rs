// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-vision — Document detection and perspective rectification.
//
// Finds the document-shaped quadrilateral in a camera frame (edge and contour
// extraction, then candidate selection) and warps the region inside a
// quadrilateral onto an upright rectangle. Also carries the frame colour
// controls and the image codec boundary used by the host bridge.

pub mod adjust;
pub mod codec;
pub mod detect;
pub mod geometry;
pub mod homography;
pub mod pipeline;
pub mod rectify;

// Re-export the primary entry points so callers can use `scanwerk_vision::Pipeline` etc.
pub use adjust::{ColorAdjuster, apply_controls};
pub use codec::{ImageSource, decode_source, encode_base64_jpeg};
pub use homography::Homography;
pub use pipeline::Pipeline;
pub use rectify::{encode_jpeg, rectify_image};
