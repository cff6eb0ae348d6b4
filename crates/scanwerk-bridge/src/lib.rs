// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — Host application bridge.
//
// The surface a mobile or desktop shell talks to: an explicit scanner
// session handle, JSON request/response envelopes with stable error codes,
// stable-detection tracking for auto-capture, and selection of the vision
// runtime the pipeline is bound to.

pub mod classify;
pub mod requests;
pub mod runtime;
pub mod session;
pub mod stability;

pub use classify::{DetectionKind, classify};
pub use requests::{BridgeResponse, DetectRequestDto, ErrorPayload, RectifyRequestDto};
pub use runtime::{SharedRuntime, VisionBackend, locate_shared_runtime};
pub use session::{CaptureResult, FrameOutcome, ScannerSession, spawn_rectify};
pub use stability::StabilityTracker;

/// Version of the scanner library, as reported to the host.
pub fn scanner_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Whether the scanner can run on this device. The static pipeline is
/// always linked in, so this is always true.
pub fn is_available() -> bool {
    true
}
