// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire types exchanged with the host application.
//
// Requests arrive as JSON with camelCase keys. Every response is either
// `{"status":"ok","data":...}` or `{"status":"err","code":...}` with one of
// the stable error codes, so the host never has to parse error text.

use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::{CornerSet, ErrorCode};
use serde::{Deserialize, Serialize};

/// Re-crop a previously captured image with user-adjusted corners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectifyRequestDto {
    /// `file://` URI or base64 image data.
    pub image: Option<String>,
    pub coordinates: Option<CornerSet>,
    /// Output quality in [0, 1]; the session quality applies when absent.
    pub quality: Option<f64>,
}

impl RectifyRequestDto {
    /// The image reference, or a decode failure when none was supplied.
    pub fn require_image(&self) -> Result<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ScanError::Decode("no image supplied".into()))
    }

    /// The corners as a quad, or a geometry failure when any are missing.
    pub fn require_corners(&self) -> Result<scanwerk_core::Quad> {
        self.coordinates
            .clone()
            .ok_or_else(|| ScanError::InvalidGeometry("missing coordinates".into()))?
            .into_quad()
    }
}

/// Run detection on a single still image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequestDto {
    pub image: String,
}

/// Error half of a bridge response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    /// Plain-language summary for the user.
    pub message: String,
    pub suggestion: String,
    /// The technical error, for logs.
    pub detail: String,
}

impl From<&ScanError> for ErrorPayload {
    fn from(err: &ScanError) -> Self {
        let human = humanize_error(err);
        Self {
            code: err.code(),
            message: human.message,
            suggestion: human.suggestion,
            detail: err.to_string(),
        }
    }
}

/// Success-or-failure envelope for every bridge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BridgeResponse<T> {
    Ok { data: T },
    Err(ErrorPayload),
}

impl<T> BridgeResponse<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Ok { data },
            Err(err) => {
                tracing::warn!(code = %err.code(), error = %err, "Bridge call failed");
                Self::Err(ErrorPayload::from(&err))
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The error code, when this is a failure.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Ok { .. } => None,
            Self::Err(payload) => Some(payload.code),
        }
    }
}

impl<T: Serialize> BridgeResponse<T> {
    /// Serialize for the host. Serialization of these types cannot fail in
    /// practice; if it ever does, a process error envelope is returned.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"status":"err","code":"PROCESS_ERROR","message":"Response could not be encoded.","suggestion":"","detail":"{}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }
}

/// Parse a JSON request body; malformed JSON maps to `INVALID_COORDINATES`.
pub fn parse_request<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}
