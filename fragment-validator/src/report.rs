//! Outcome of a filesystem scan.

use serde::Serialize;

use crate::error::{FileRejection, ScanError};

/// Everything [`validate_fs`](crate::validate_fs) learned about a set of files.
///
/// `ok` is only true when nothing was rejected and nothing failed to scan.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Files that got a verdict.
    pub scanned_files: usize,
    /// Files that never got one; equals `scan_errors.len()`.
    pub failed_files: usize,
    pub accepted_files: usize,
    pub ok: bool,
    pub rejections: Vec<FileRejection>,
    pub scan_errors: Vec<ScanError>,
}

impl ValidationReport {
    /// Files with a verdict plus files that failed.
    #[must_use]
    pub fn files_attempted(&self) -> usize {
        self.scanned_files + self.failed_files
    }

    #[must_use]
    pub fn rejections_count(&self) -> usize {
        self.rejections.len()
    }
}
