// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// "No document found" is not an error; detection returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Pipeline errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("processing failed: {0}")]
    Processing(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / transport --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable, caller-facing error codes surfaced through the host bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input bytes or path could not be turned into a pixel grid.
    DecodeError,
    /// Corner data missing, incomplete, or geometrically degenerate.
    InvalidCoordinates,
    /// An internal stage failed for a reason not attributable to the input.
    ProcessError,
    /// The scanner configuration is inconsistent.
    ConfigError,
}

impl ErrorCode {
    /// Wire representation (e.g. `"DECODE_ERROR"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecodeError => "DECODE_ERROR",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::ProcessError => "PROCESS_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScanError {
    /// Map this error onto its stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Decode(_) | Self::Io(_) => ErrorCode::DecodeError,
            Self::InvalidGeometry(_) | Self::Serialization(_) => ErrorCode::InvalidCoordinates,
            Self::Processing(_) => ErrorCode::ProcessError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
