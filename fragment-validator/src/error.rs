//! Error types for fragment content validation.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A failure of the validation pipeline itself, as opposed to a rejection.
///
/// Content that fails format rules is never an error: it yields a
/// [`Verdict::Rejected`](crate::Verdict::Rejected). Only reading a file's full
/// text can fail here; signature checks swallow their read failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    /// The attached file could not be read.
    #[error("file read error for '{file}': {source}")]
    FileRead {
        /// Name of the file that could not be read.
        file: String,
        #[source]
        source: io::Error,
    },
}

/// Why a file found during a scan was never validated.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ScanErrorKind {
    IoError,
    /// Larger than `max_file_size`.
    FileTooLarge,
    /// Typed-content file that is not UTF-8.
    InvalidEncoding,
    /// Resolves outside its scan root, usually through a symlink.
    OutsideRoot,
    /// `max_files` or `max_total_bytes` was hit; the rest of the scan was skipped.
    LimitExceeded,
    WalkError,
    InvalidExcludePattern,
}

/// A file that could not be validated at all.
///
/// Unlike a [`FileRejection`], nothing is known about its content.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Error)]
#[error("{}: [scan error] {message}", file.display())]
#[non_exhaustive]
pub struct ScanError {
    pub file: PathBuf,
    pub kind: ScanErrorKind,
    pub message: String,
}

/// A file whose content was rejected for the media type inferred from its extension.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileRejection {
    /// File path that was rejected.
    pub file: PathBuf,
    /// Media type the file was validated as.
    pub media_type: String,
    /// The user-facing rejection message.
    pub message: String,
}

impl FileRejection {
    /// Format the rejection for human-readable output: `{file}: {message} ({media_type})`.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!(
            "{}: {} ({})",
            self.file.display(),
            self.message,
            self.media_type
        )
    }
}
