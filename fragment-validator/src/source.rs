//! File handles that the validator can read from.
//!
//! A [`FileSource`] carries the metadata a browser attaches to a picked file
//! (name and declared MIME type) plus two reads: the leading bytes for
//! signature sniffing and the whole body as text for CSV parsing.

use std::future::{self, Future};
use std::io;
use std::path::{Path, PathBuf};

use fragment_types::MediaType;
use tokio::io::AsyncReadExt;

/// MIME type reported for files whose extension maps to no known media type.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Default upper bound for [`FileSource::read_text`] on disk files (10 MB).
pub const DEFAULT_MAX_TEXT_BYTES: u64 = 10_485_760;

/// A readable file handle with browser-style metadata.
pub trait FileSource: Sync {
    /// The file name, used only for the extension fallback.
    fn name(&self) -> &str;

    /// The declared MIME type (may be empty or wrong).
    fn mime_type(&self) -> &str;

    /// Read at most `len` leading bytes. Fewer are returned for short files.
    fn read_prefix(&self, len: usize) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    /// Read the entire file as text. Invalid UTF-8 sequences are replaced
    /// with U+FFFD, as a browser `FileReader` does.
    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send;

    /// Lower-cased extension of [`name`](Self::name), without the dot.
    fn extension(&self) -> Option<String> {
        Path::new(self.name())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// A file whose bytes are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn read_prefix(&self, len: usize) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        let end = len.min(self.bytes.len());
        future::ready(Ok(self.bytes[..end].to_vec()))
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
        future::ready(Ok(String::from_utf8_lossy(&self.bytes).into_owned()))
    }
}

/// A file on disk, read lazily through `tokio::fs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    mime_type: String,
    max_text_bytes: u64,
}

impl DiskFile {
    /// Wrap `path`, declaring the MIME type its extension implies.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .map_or(OCTET_STREAM, MediaType::as_str)
            .to_owned();
        Self {
            path,
            name,
            mime_type,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }

    /// Override the declared MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Bound the number of bytes [`FileSource::read_text`] may load.
    #[must_use]
    pub const fn with_max_text_bytes(mut self, max_text_bytes: u64) -> Self {
        self.max_text_bytes = max_text_bytes;
        self
    }
}

impl FileSource for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn read_prefix(&self, len: usize) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        let path = self.path.clone();
        async move {
            let file = tokio::fs::File::open(&path).await?;
            let mut buffer = Vec::with_capacity(len);
            file.take(u64::try_from(len).unwrap_or(u64::MAX))
                .read_to_end(&mut buffer)
                .await?;
            Ok(buffer)
        }
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
        let path = self.path.clone();
        let max = self.max_text_bytes;
        async move {
            let file = tokio::fs::File::open(&path).await?;
            // One extra byte tells an oversized file from one that is exactly at the limit.
            let mut buffer = Vec::new();
            file.take(max.saturating_add(1))
                .read_to_end(&mut buffer)
                .await?;
            if buffer.len() as u64 > max {
                return Err(io::Error::other(format!(
                    "{} exceeds maximum size of {max} bytes",
                    path.display()
                )));
            }
            Ok(String::from_utf8_lossy(&buffer).into_owned())
        }
    }
}
