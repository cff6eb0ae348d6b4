// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consecutive-detection counter that gates automatic capture.

/// Counts how many frames in a row produced a detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilityTracker {
    count: u32,
    required: u32,
}

impl StabilityTracker {
    pub fn new(required: u32) -> Self {
        Self { count: 0, required }
    }

    /// Record one frame's outcome and return the updated count.
    ///
    /// A frame without a detection resets the count to zero.
    pub fn record(&mut self, detected: bool) -> u32 {
        self.count = if detected { self.count.saturating_add(1) } else { 0 };
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    /// True once enough consecutive detections have been seen.
    pub fn is_ready(&self) -> bool {
        self.count > 0 && self.count >= self.required
    }

    pub fn set_required(&mut self, required: u32) {
        self.required = required;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
