// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanner UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// None of the pipeline errors are transient: the same input reproduces the
// same failure, so nothing here asks for an automatic retry.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must do something (re-take the photo, drag a corner back).
    ActionRequired,
    /// Cannot be fixed by retrying: corrupt file, unsupported format.
    Permanent,
    /// Something inside the app went wrong.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same request could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError` the scanner screen can show.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::Decode(_) => HumanError {
            message: "We couldn't open this picture.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try taking the photo again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::InvalidGeometry(detail) => {
            if detail.contains("missing") {
                HumanError {
                    message: "Some page corners are missing.".into(),
                    suggestion: "Place all four corner handles on the page, then try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The selected area isn't a page shape.".into(),
                    suggestion: "Drag the corner handles so they sit on the four corners of the document.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        ScanError::Processing(detail) => HumanError {
            message: "We couldn't straighten this page.".into(),
            suggestion: format!("Try adjusting the corners slightly. ({detail})"),
            retriable: false,
            severity: Severity::Internal,
        },

        ScanError::Config(detail) => HumanError {
            message: "The scanner settings don't fit together.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The picture couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Take the photo again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to read that picture.".into(),
                    suggestion: "Check the app's photo permissions in your device settings.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading the picture.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Permanent,
                }
            }
        }

        ScanError::Serialization(_) => HumanError {
            message: "The corner data couldn't be read.".into(),
            suggestion: "Try adjusting the corners again. If this keeps happening, please report it.".into(),
            retriable: false,
            severity: Severity::Internal,
        },
    }
}
