//! Validation verdicts and the user-facing rejection messages.

use fragment_types::ImageFormat;
use thiserror::Error;
use tracing::error;

use crate::error::ValidateError;

/// Shown when the validation pipeline itself fails.
pub const UNEXPECTED_VALIDATION_ERROR: &str = "An unexpected error occurred during validation";

/// Why submitted content was refused.
///
/// The `Display` text of each variant is the message shown next to the form
/// field, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Content cannot be empty")]
    EmptyContent,
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Invalid HTML format")]
    InvalidHtml,
    #[error("Invalid Markdown format")]
    InvalidMarkdown,
    #[error("Invalid CSV format")]
    InvalidCsv,
    #[error("Image file is required")]
    ImageFileRequired,
    #[error("Invalid {0} format")]
    InvalidImage(ImageFormat),
    #[error("Some Invalid Format")]
    UnsupportedFormat,
}

/// The outcome of validating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    /// `Accepted` when `ok`, otherwise the given rejection.
    #[must_use]
    pub const fn from_check(ok: bool, rejection: Rejection) -> Self {
        if ok {
            Self::Accepted
        } else {
            Self::Rejected(rejection)
        }
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(*rejection),
        }
    }

    /// The verdict string: empty when accepted, the rejection message otherwise.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted => String::new(),
            Self::Rejected(rejection) => rejection.to_string(),
        }
    }
}

impl From<Rejection> for Verdict {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// Collapse a validation outcome into the string a form displays.
///
/// Pipeline failures are logged and replaced by [`UNEXPECTED_VALIDATION_ERROR`].
#[must_use]
pub fn user_message(outcome: &Result<Verdict, ValidateError>) -> String {
    match outcome {
        Ok(verdict) => verdict.message(),
        Err(err) => {
            error!(error = %err, "validation pipeline failed");
            UNEXPECTED_VALIDATION_ERROR.to_owned()
        }
    }
}
