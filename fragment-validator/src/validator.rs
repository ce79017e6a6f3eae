//! The content validator: dispatches a submission to the checker for its
//! declared media type.

use fragment_types::MediaType;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::ValidateError;
use crate::format::csv::{check_csv_file, check_csv_text};
use crate::format::html::is_valid_html;
use crate::format::json::is_valid_json;
use crate::format::markdown::is_valid_markdown;
use crate::format::signature::check_signature;
use crate::source::{FileSource, MemoryFile};
use crate::verdict::{Rejection, Verdict};

/// Validates fragment submissions against their declared media type.
///
/// Stateless apart from its policy: the same inputs always produce the same
/// verdict.
#[derive(Debug, Clone, Default)]
pub struct ContentValidator {
    config: ValidationConfig,
}

impl ContentValidator {
    #[must_use]
    pub const fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate typed content (no file attached).
    #[must_use]
    pub fn validate_text(&self, declared_type: &str, content: &str) -> Verdict {
        if is_blank(content) {
            return log_verdict(declared_type, Rejection::EmptyContent.into());
        }
        let Ok(media_type) = declared_type.parse::<MediaType>() else {
            return log_verdict(declared_type, Rejection::UnsupportedFormat.into());
        };

        let verdict = match media_type {
            MediaType::TextPlain => Verdict::Accepted,
            MediaType::ApplicationJson => {
                Verdict::from_check(is_valid_json(content), Rejection::InvalidJson)
            }
            MediaType::TextHtml => {
                Verdict::from_check(is_valid_html(content), Rejection::InvalidHtml)
            }
            MediaType::TextMarkdown => {
                Verdict::from_check(is_valid_markdown(content), Rejection::InvalidMarkdown)
            }
            MediaType::TextCsv if self.config.validate_csv_text => {
                Verdict::from_check(check_csv_text(content).is_valid, Rejection::InvalidCsv)
            }
            MediaType::TextCsv => Verdict::Accepted,
            MediaType::ImagePng
            | MediaType::ImageJpeg
            | MediaType::ImageWebp
            | MediaType::ImageGif
            | MediaType::ImageAvif => Rejection::ImageFileRequired.into(),
        };
        log_verdict(declared_type, verdict)
    }

    /// Validate an uploaded file. Typed content alongside a file is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::FileRead`] if the file's full text is needed
    /// (CSV, or JSON with `validate_json_files`) and cannot be read.
    pub async fn validate_file<F: FileSource + ?Sized>(
        &self,
        declared_type: &str,
        file: &F,
    ) -> Result<Verdict, ValidateError> {
        let Ok(media_type) = declared_type.parse::<MediaType>() else {
            return Ok(log_verdict(
                declared_type,
                Rejection::UnsupportedFormat.into(),
            ));
        };

        if let Some(format) = media_type.image_format() {
            let verdict = Verdict::from_check(
                check_signature(file, format).await,
                Rejection::InvalidImage(format),
            );
            return Ok(log_verdict(declared_type, verdict));
        }

        let verdict = match media_type {
            MediaType::ApplicationJson if self.config.validate_json_files => {
                let text = read_text(file).await?;
                Verdict::from_check(is_valid_json(&text), Rejection::InvalidJson)
            }
            MediaType::TextCsv => {
                let check = check_csv_file(file)
                    .await
                    .map_err(|source| file_read_error(file, source))?;
                Verdict::from_check(check.is_valid, Rejection::InvalidCsv)
            }
            // uploaded text, HTML, Markdown and (by default) JSON are taken as-is
            _ => Verdict::Accepted,
        };
        Ok(log_verdict(declared_type, verdict))
    }

    /// Validate a submission: typed `content`, or an attached `file`.
    ///
    /// Empty content with no file is always rejected first, whatever the
    /// declared type.
    ///
    /// # Errors
    ///
    /// See [`validate_file`](Self::validate_file).
    pub async fn validate<F: FileSource + ?Sized>(
        &self,
        declared_type: &str,
        content: &str,
        file: Option<&F>,
    ) -> Result<Verdict, ValidateError> {
        match file {
            Some(file) => self.validate_file(declared_type, file).await,
            None => Ok(self.validate_text(declared_type, content)),
        }
    }
}

/// Validate with the default policy.
///
/// # Errors
///
/// See [`ContentValidator::validate_file`].
pub async fn validate_fragment_content<F: FileSource + ?Sized>(
    declared_type: &str,
    content: &str,
    file: Option<&F>,
) -> Result<Verdict, ValidateError> {
    ContentValidator::default()
        .validate(declared_type, content, file)
        .await
}

/// Validate typed content with the default policy.
#[must_use]
pub fn validate_text_content(declared_type: &str, content: &str) -> Verdict {
    ContentValidator::default().validate_text(declared_type, content)
}

/// `None` file for callers of [`validate_fragment_content`] without an upload.
pub const NO_FILE: Option<&MemoryFile> = None;

async fn read_text<F: FileSource + ?Sized>(file: &F) -> Result<String, ValidateError> {
    file.read_text()
        .await
        .map_err(|source| file_read_error(file, source))
}

fn file_read_error<F: FileSource + ?Sized>(file: &F, source: std::io::Error) -> ValidateError {
    ValidateError::FileRead {
        file: file.name().to_owned(),
        source,
    }
}

/// Blank after trimming whitespace and byte-order marks.
fn is_blank(content: &str) -> bool {
    content
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .is_empty()
}

fn log_verdict(declared_type: &str, verdict: Verdict) -> Verdict {
    if let Verdict::Rejected(rejection) = verdict {
        debug!(media_type = declared_type, %rejection, "content rejected");
    }
    verdict
}
