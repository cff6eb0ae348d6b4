// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document detection: edge/contour extraction and candidate selection.

pub mod contour;
pub mod select;

pub use contour::{Candidates, extract_candidates};
pub use select::select_quad;
