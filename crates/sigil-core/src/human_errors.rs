// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for non-technical users.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so the UI layer never has to show a raw error string.

use crate::error::SigilError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary hiccup — trying again usually works.
    Transient,
    /// User must do something (fix the input, free disk space).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the export again is worthwhile.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `SigilError` into a `HumanError` suitable for direct display.
pub fn humanize_error(err: &SigilError) -> HumanError {
    match err {
        SigilError::Validation(detail) => HumanError {
            message: "There is nothing to export yet.".into(),
            suggestion: format!("Fill in the document content first, then export again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SigilError::Conversion(detail) => HumanError {
            message: "We couldn't read the document content.".into(),
            suggestion: format!("Try regenerating the document, then export again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        SigilError::FormatWriter(detail) => HumanError {
            message: "Creating the file failed.".into(),
            suggestion: format!("This document couldn't be turned into a file. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        SigilError::Download(detail) => HumanError {
            message: "The file couldn't be saved.".into(),
            suggestion: format!("Check that there is space available and try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        SigilError::BatchBusy => HumanError {
            message: "An export is already running.".into(),
            suggestion: "Wait for the current batch to finish, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SigilError::Io(io_err) => HumanError {
            message: "A file operation failed.".into(),
            suggestion: format!("Check disk space and permissions, then try again. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        SigilError::Serialization(detail) => HumanError {
            message: "Your saved settings couldn't be read.".into(),
            suggestion: format!("The watermark settings were reset to defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_action_required() {
        let err = SigilError::Validation("empty html".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("empty html"));
    }

    #[test]
    fn download_errors_are_retriable() {
        let err = SigilError::Download("disk full".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn format_writer_errors_are_permanent() {
        let err = SigilError::FormatWriter("bad page tree".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
    }
}
