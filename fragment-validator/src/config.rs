//! Validation policy and scan options.
//!
//! [`ValidationConfig`] is about content and applies to every submission.
//! [`FsSourceConfig`] only describes how [`validate_fs`](crate::validate_fs)
//! finds files on disk.

use std::path::PathBuf;

/// Which of the dashboard's unchecked paths to check anyway.
///
/// Both switches default to `false`, which reproduces the dashboard's
/// behaviour: JSON is only parsed when typed, CSV only when uploaded.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Also parse the text of an attached `application/json` file.
    pub validate_json_files: bool,
    /// Also run the CSV structural check on typed `text/csv` content.
    pub validate_csv_text: bool,
}

/// 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// 512 MiB
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 512 * 1024 * 1024;
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_FILES: usize = 100_000;

/// Resource bounds for one scan. Hitting `max_files` or `max_total_bytes`
/// stops the scan and is reported as a scan error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanLimits {
    /// Largest single file that is read.
    pub max_file_size: u64,
    /// Bytes read across all files.
    pub max_total_bytes: u64,
    /// Directory levels below each root.
    pub max_depth: usize,
    /// Files validated or failed before the scan stops.
    pub max_files: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Where [`validate_fs`](crate::validate_fs) looks for fragment files.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Files or directories to scan. Must not be empty.
    pub paths: Vec<PathBuf>,
    /// Glob patterns matched against the full path and the file name.
    pub exclude: Vec<String>,
    /// Follow symbolic links while walking. Off by default; files that
    /// resolve outside their scan root are reported either way.
    pub follow_links: bool,
    pub limits: ScanLimits,
}
