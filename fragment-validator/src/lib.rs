//! # fragment-validator
//!
//! Client-side content validation for fragment uploads.
//!
//! Given a declared media type and either typed text or an uploaded file,
//! the validator decides whether the content is a well-formed example of
//! that type. The checks are fast heuristics meant to gate an upload, not
//! conformance parsers:
//!
//! - JSON: strict parse
//! - HTML: tag balance
//! - Markdown: feature detection with an HTML tie-break
//! - CSV: header row and consistent rows
//! - PNG, JPEG, WEBP, GIF, AVIF: leading signature bytes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fragment_validator::{MemoryFile, NO_FILE, validate_fragment_content};
//!
//! # async fn run() -> Result<(), fragment_validator::ValidateError> {
//! let verdict = validate_fragment_content("text/markdown", "# Title", NO_FILE).await?;
//! assert_eq!(verdict.message(), "");
//!
//! let upload = MemoryFile::new("logo.png", "image/png", vec![0x89, b'P', b'N', b'G']);
//! let verdict = validate_fragment_content("image/png", "", Some(&upload)).await?;
//! assert_eq!(verdict.message(), "Invalid PNG format");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod format;
pub mod output;
mod report;
mod source;
mod strategy;
mod validator;
mod verdict;

pub use config::{DEFAULT_MAX_FILE_SIZE, FsSourceConfig, ScanLimits, ValidationConfig};
pub use error::{FileRejection, ScanError, ScanErrorKind, ValidateError};
pub use report::ValidationReport;
pub use source::{DEFAULT_MAX_TEXT_BYTES, DiskFile, FileSource, MemoryFile, OCTET_STREAM};
pub use strategy::Submission;
pub use validator::{ContentValidator, NO_FILE, validate_fragment_content, validate_text_content};
pub use verdict::{Rejection, UNEXPECTED_VALIDATION_ERROR, Verdict, user_message};

use std::path::Path;

use fragment_types::MediaType;
use tracing::{debug, info};

use strategy::fs::{find_files, media_type_for, read_text_bounded, upload_size};

/// Validate fragment files on disk.
///
/// Each file is validated as the media type its extension implies, the way
/// the dashboard would submit it: text types as typed content, CSV and
/// images as uploads (see [`Submission`]).
///
/// # Errors
///
/// Fails when `fs_config.paths` is empty or names a path that is missing.
/// Unreadable or oversized files are not errors; they land in
/// `report.scan_errors`.
pub async fn validate_fs(
    fs_config: &FsSourceConfig,
    validator: &ContentValidator,
) -> anyhow::Result<ValidationReport> {
    anyhow::ensure!(!fs_config.paths.is_empty(), "no paths given to scan");
    if let Some(missing) = fs_config.paths.iter().find(|p| !p.exists()) {
        anyhow::bail!("scan path not found: {}", missing.display());
    }

    let limits = fs_config.limits;
    let (files, mut scan_errors) = find_files(fs_config);
    debug!(files = files.len(), "discovered fragment files");

    let mut rejections = Vec::new();
    let mut accepted_files = 0usize;
    let mut validated = 0usize;
    let mut bytes_read = 0u64;

    for path in &files {
        // discovery failures use up the file budget too
        if validated + scan_errors.len() >= limits.max_files {
            scan_errors.push(limit_reached(path, &format!("max_files ({})", limits.max_files)));
            break;
        }
        let Some(media_type) = media_type_for(path) else {
            continue;
        };

        let (size, verdict) =
            match validate_one(path, media_type, limits.max_file_size, validator).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    scan_errors.push(e);
                    continue;
                }
            };

        bytes_read = bytes_read.saturating_add(size);
        if bytes_read > limits.max_total_bytes {
            scan_errors.push(limit_reached(path, &format!("max_total_bytes ({})", limits.max_total_bytes)));
            break;
        }

        validated += 1;
        if let Verdict::Rejected(rejection) = verdict {
            rejections.push(FileRejection {
                file: path.clone(),
                media_type: media_type.as_str().to_owned(),
                message: rejection.to_string(),
            });
        } else {
            accepted_files += 1;
        }
    }

    info!(
        scanned = validated,
        accepted = accepted_files,
        rejected = rejections.len(),
        failed = scan_errors.len(),
        "scan finished"
    );
    Ok(ValidationReport {
        scanned_files: validated,
        failed_files: scan_errors.len(),
        accepted_files,
        ok: rejections.is_empty() && scan_errors.is_empty(),
        rejections,
        scan_errors,
    })
}

fn limit_reached(path: &Path, limit: &str) -> ScanError {
    ScanError {
        file: path.to_owned(),
        kind: ScanErrorKind::LimitExceeded,
        message: format!("{limit} reached here; the rest of the scan was skipped"),
    }
}

/// Validate one file the way the dashboard would submit it, returning its size and verdict.
async fn validate_one(
    path: &Path,
    media_type: MediaType,
    max_file_size: u64,
    validator: &ContentValidator,
) -> Result<(u64, Verdict), ScanError> {
    match Submission::for_media_type(media_type) {
        Submission::Typed => {
            let content = read_text_bounded(path, max_file_size).await?;
            let verdict = validator.validate_text(media_type.as_str(), &content);
            Ok((content.len() as u64, verdict))
        }
        Submission::Uploaded => {
            let size = upload_size(path, max_file_size).await?;
            let file = DiskFile::new(path).with_max_text_bytes(max_file_size);
            let verdict = validator
                .validate_file(media_type.as_str(), &file)
                .await
                .map_err(|e| ScanError {
                    file: path.to_owned(),
                    kind: ScanErrorKind::IoError,
                    message: e.to_string(),
                })?;
            Ok((size, verdict))
        }
    }
}
