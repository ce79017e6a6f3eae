//! Fragment files on disk.
//!
//! Discovery walks each root with `walkdir`, skipping build and dependency
//! directories, excluded globs, special files and anything whose resolved
//! path leaves the root. Reads are bounded by the configured file size.

use std::path::{Path, PathBuf};

use fragment_types::MediaType;
use glob::Pattern;
use tokio::io::AsyncReadExt;
use walkdir::{DirEntry, WalkDir};

use crate::config::FsSourceConfig;
use crate::error::{ScanError, ScanErrorKind};

/// Directory names never descended into.
pub const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git", ".next", "vendor"];

/// The media type a file is validated as, from its extension.
#[must_use]
pub fn media_type_for(path: &Path) -> Option<MediaType> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(MediaType::from_extension)
}

/// Fragment files under `config.paths`, sorted, plus everything that went wrong
/// while looking for them.
pub fn find_files(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut errors = Vec::new();
    let excludes = compile_excludes(&config.exclude, &mut errors);
    let is_candidate =
        |path: &Path| media_type_for(path).is_some() && !is_excluded(path, &excludes);

    let mut files = Vec::new();
    for root in &config.paths {
        let root_real = match root.canonicalize() {
            Ok(real) => real,
            Err(e) => {
                errors.push(scan_error(
                    root,
                    ScanErrorKind::IoError,
                    format!("Failed to canonicalize root path: {e}"),
                ));
                continue;
            }
        };

        if root.is_file() {
            if is_candidate(root) {
                files.push(root.clone());
            }
            continue;
        }

        let walker = WalkDir::new(root)
            .follow_links(config.follow_links)
            .max_depth(config.limits.max_depth)
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let at = e.path().map_or_else(|| root.clone(), Path::to_path_buf);
                    errors.push(scan_error(
                        &at,
                        ScanErrorKind::WalkError,
                        format!("Directory traversal error: {e}"),
                    ));
                    continue;
                }
            };
            if !is_regular_file(&entry) || !is_candidate(entry.path()) {
                continue;
            }
            match stays_within(entry.path(), &root_real) {
                Ok(()) => files.push(entry.into_path()),
                Err(e) => errors.push(e),
            }
        }
    }

    files.sort();
    files.dedup();
    (files, errors)
}

fn compile_excludes(patterns: &[String], errors: &mut Vec<ScanError>) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                errors.push(scan_error(
                    Path::new(raw),
                    ScanErrorKind::InvalidExcludePattern,
                    format!("Invalid exclude glob pattern '{raw}': {e}"),
                ));
                None
            }
        })
        .collect()
}

/// Excluded when a pattern matches the whole path or just the file name.
fn is_excluded(path: &Path, excludes: &[Pattern]) -> bool {
    let full = path.to_string_lossy();
    let name = path.file_name().map(|n| n.to_string_lossy());
    excludes.iter().any(|pattern| {
        pattern.matches(&full) || name.as_deref().is_some_and(|n| pattern.matches(n))
    })
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

/// Regular files only: devices, pipes and sockets are never read.
fn is_regular_file(entry: &DirEntry) -> bool {
    if !entry.path().is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if let Ok(meta) = entry.metadata() {
            let ft = meta.file_type();
            return !(ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket());
        }
    }
    true
}

/// Symlink escapes are caught even when `follow_links` is on.
fn stays_within(path: &Path, root_real: &Path) -> Result<(), ScanError> {
    let real = path.canonicalize().map_err(|e| {
        scan_error(
            path,
            ScanErrorKind::IoError,
            format!("Failed to canonicalize path: {e}"),
        )
    })?;
    if real.starts_with(root_real) {
        Ok(())
    } else {
        Err(scan_error(
            path,
            ScanErrorKind::OutsideRoot,
            format!(
                "Path resolves outside scan root: {} -> {}",
                path.display(),
                real.display()
            ),
        ))
    }
}

/// Size of an uploaded file, refusing files over `max_file_size`.
///
/// # Errors
///
/// Returns a `ScanError` if the metadata cannot be read or the file is too large.
pub async fn upload_size(path: &Path, max_file_size: u64) -> Result<u64, ScanError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        scan_error(
            path,
            ScanErrorKind::IoError,
            format!("Failed to read file metadata: {e}"),
        )
    })?;
    if metadata.len() > max_file_size {
        return Err(too_large(path, max_file_size));
    }
    Ok(metadata.len())
}

/// Read a typed-content file as UTF-8, loading at most `max_file_size + 1` bytes.
///
/// # Errors
///
/// Returns a `ScanError` if the file cannot be read, is larger than
/// `max_file_size`, or is not valid UTF-8.
pub async fn read_text_bounded(path: &Path, max_file_size: u64) -> Result<String, ScanError> {
    let io_error = |what: &str, e: std::io::Error| {
        scan_error(path, ScanErrorKind::IoError, format!("Failed to {what} file: {e}"))
    };

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| io_error("open", e))?;
    let mut bytes = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| io_error("read", e))?;

    if bytes.len() as u64 > max_file_size {
        return Err(too_large(path, max_file_size));
    }
    String::from_utf8(bytes).map_err(|_| {
        scan_error(
            path,
            ScanErrorKind::InvalidEncoding,
            "File is not valid UTF-8".to_owned(),
        )
    })
}

fn too_large(path: &Path, max_file_size: u64) -> ScanError {
    scan_error(
        path,
        ScanErrorKind::FileTooLarge,
        format!("File exceeds maximum size of {max_file_size} bytes"),
    )
}

fn scan_error(path: &Path, kind: ScanErrorKind, message: String) -> ScanError {
    ScanError {
        file: path.to_owned(),
        kind,
        message,
    }
}
