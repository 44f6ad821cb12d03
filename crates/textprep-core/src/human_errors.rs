// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for host notices.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a host presents it.

use crate::error::TextprepError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is.
    Transient,
    /// The user must change something (a setting, the chosen file).
    ActionRequired,
    /// Retrying with the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether a host retry could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `TextprepError` into a `HumanError` suitable for a notice.
pub fn humanize_error(err: &TextprepError) -> HumanError {
    match err {
        TextprepError::DecodeFailure(_) => HumanError {
            message: "This file couldn't be read as an image.".into(),
            suggestion: "Choose a PNG or JPEG photo or scan. Vector and PDF files aren't supported.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        TextprepError::EncodeFailure(_) => HumanError {
            message: "The cleaned-up image couldn't be saved.".into(),
            suggestion: "Try again. If this keeps happening, try a smaller image or turn off upscaling.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        TextprepError::InvalidConfig(detail) => HumanError {
            message: "One of the image settings is out of range.".into(),
            suggestion: format!("Adjust the preprocessing settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TextprepError::EmptyCanvas { width, height } => HumanError {
            message: "The image has no pixels to work with.".into(),
            suggestion: format!("The image came out as {width}x{height}. Choose a different image."),
            retriable: false,
            severity: Severity::Permanent,
        },

        TextprepError::Recognition(_) => HumanError {
            message: "Text recognition didn't work on this image.".into(),
            suggestion: "Try a sharper photo with even lighting, or enable sharpening and binarization.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        TextprepError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "There's no permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        TextprepError::Serialization(_) => HumanError {
            message: "The saved settings couldn't be read.".into(),
            suggestion: "The settings file may be damaged. Delete it to go back to the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_action_required() {
        let err = TextprepError::InvalidConfig("contrast must be in [0.5, 2.59), got 2.7".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("2.7"));
    }

    #[test]
    fn undecodable_input_is_permanent() {
        let human = humanize_error(&TextprepError::DecodeFailure("unknown format".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn recognition_failure_is_transient() {
        let human = humanize_error(&TextprepError::Recognition("engine crashed".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = TextprepError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
