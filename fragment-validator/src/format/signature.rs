//! Binary signature ("magic number") checkers for image uploads.
//!
//! Each format reads only the handful of leading bytes its signature needs.
//! A read failure is treated exactly like a signature mismatch.

use fragment_types::ImageFormat;
use tracing::debug;

use crate::source::FileSource;

/// `\x89PNG\r\n\x1a\n`
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Start of image marker followed by the first marker byte.
pub const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// How to recognise one image format from its leading bytes.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub format: ImageFormat,
    /// Number of leading bytes the matcher inspects.
    pub prefix_len: usize,
    matcher: fn(&[u8]) -> bool,
}

impl Signature {
    #[must_use]
    pub const fn of(format: ImageFormat) -> Self {
        let (prefix_len, matcher): (usize, fn(&[u8]) -> bool) = match format {
            ImageFormat::Png => (8, is_png),
            ImageFormat::Jpeg => (3, is_jpeg),
            ImageFormat::Webp => (12, is_webp),
            ImageFormat::Gif => (6, is_gif),
            ImageFormat::Avif => (24, is_avif),
        };
        Self {
            format,
            prefix_len,
            matcher,
        }
    }

    /// Whether `head` (the file's leading bytes) carries this signature.
    #[must_use]
    pub fn matches(&self, head: &[u8]) -> bool {
        (self.matcher)(head)
    }
}

fn is_png(head: &[u8]) -> bool {
    head.starts_with(&PNG_SIGNATURE)
}

fn is_jpeg(head: &[u8]) -> bool {
    head.starts_with(&JPEG_SIGNATURE)
}

/// RIFF container with a WEBP form type; the chunk size at 4..8 is not checked.
fn is_webp(head: &[u8]) -> bool {
    head.get(0..4) == Some(b"RIFF".as_slice()) && head.get(8..12) == Some(b"WEBP".as_slice())
}

/// `GIF87a` or `GIF89a`.
fn is_gif(head: &[u8]) -> bool {
    head.get(0..4) == Some(b"GIF8".as_slice())
        && matches!(head.get(4), Some(b'7' | b'9'))
        && head.get(5) == Some(&b'a')
}

/// ISO-BMFF `ftyp` box whose major or compatible brands include `avif` or `avis`.
fn is_avif(head: &[u8]) -> bool {
    if head.get(4..8) != Some(b"ftyp".as_slice()) {
        return false;
    }
    let last_start = head.len().saturating_sub(4).min(20);
    (8..=last_start).any(|start| {
        head.get(start..start + 4)
            .is_some_and(|brand| brand == b"avif" || brand == b"avis")
    })
}

/// Whether the file claims to be `format`: by declared MIME type first, then by extension.
#[must_use]
pub fn is_declared_as<F: FileSource + ?Sized>(file: &F, format: ImageFormat) -> bool {
    if file.mime_type() == format.media_type().as_str() {
        return true;
    }
    file.extension()
        .is_some_and(|ext| format.extensions().contains(&ext.as_str()))
}

/// Check that `file` is declared as `format` and starts with its signature.
pub async fn check_signature<F: FileSource + ?Sized>(file: &F, format: ImageFormat) -> bool {
    if !is_declared_as(file, format) {
        debug!(
            file = file.name(),
            mime_type = file.mime_type(),
            expected = %format,
            "declared type and extension do not match"
        );
        return false;
    }

    let signature = Signature::of(format);
    match file.read_prefix(signature.prefix_len).await {
        Ok(head) => signature.matches(&head),
        Err(err) => {
            debug!(file = file.name(), error = %err, "failed to read file signature");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFile;
    use std::future::{self, Future};
    use std::io;

    struct UnreadableFile;

    impl FileSource for UnreadableFile {
        fn name(&self) -> &str {
            "locked.png"
        }

        fn mime_type(&self) -> &str {
            "image/png"
        }

        fn read_prefix(&self, _len: usize) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
            future::ready(Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "access denied",
            )))
        }

        fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
            future::ready(Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "access denied",
            )))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        bytes
    }

    fn avif_head(brands: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 0x1C];
        bytes.extend_from_slice(b"ftyp");
        bytes.extend_from_slice(brands);
        bytes
    }

    // ---- matchers ----

    #[test]
    fn test_png_signature() {
        assert!(Signature::of(ImageFormat::Png).matches(&PNG_SIGNATURE));
        let mut altered = PNG_SIGNATURE;
        altered[7] = 0x0B;
        assert!(!Signature::of(ImageFormat::Png).matches(&altered));
    }

    #[test]
    fn test_jpeg_signature() {
        let jpeg = Signature::of(ImageFormat::Jpeg);
        assert!(jpeg.matches(&[0xFF, 0xD8, 0xFF]));
        assert!(!jpeg.matches(&[0xFF, 0xD8]));
        assert!(!jpeg.matches(&[0xFF, 0xD9, 0xFF]));
    }

    #[test]
    fn test_webp_ignores_chunk_size() {
        let webp = Signature::of(ImageFormat::Webp);
        assert!(webp.matches(b"RIFF\x00\x00\x00\x00WEBP"));
        assert!(webp.matches(b"RIFF\xFF\xFF\xFF\xFFWEBP"));
        assert!(!webp.matches(b"RIFF\x00\x00\x00\x00WAVE"));
        assert!(!webp.matches(b"RIFF"));
    }

    #[test]
    fn test_gif_versions() {
        let gif = Signature::of(ImageFormat::Gif);
        assert!(gif.matches(b"GIF87a"));
        assert!(gif.matches(b"GIF89a"));
        assert!(!gif.matches(b"GIF88a"));
        assert!(!gif.matches(b"GIF89b"));
        assert!(!gif.matches(b"GIF8"));
    }

    #[test]
    fn test_avif_brands() {
        let avif = Signature::of(ImageFormat::Avif);
        assert!(avif.matches(&avif_head(b"avif\x00\x00\x00\x00mif1miaf")));
        assert!(avif.matches(&avif_head(b"avis\x00\x00\x00\x00")));
        // compatible brand in the last slot of the 24-byte head
        assert!(avif.matches(&avif_head(b"mif1\x00\x00\x00\x00miafavif")));
        assert!(!avif.matches(&avif_head(b"heic\x00\x00\x00\x00mif1heix")));
        assert!(!avif.matches(b"\x00\x00\x00\x1Cmoovavif"));
        assert!(!avif.matches(b"\x00\x00\x00\x1Cftyp"));
    }

    // ---- declared type ----

    #[test]
    fn test_declared_by_mime_or_extension() {
        let by_mime = MemoryFile::new("upload", "image/jpeg", Vec::new());
        assert!(is_declared_as(&by_mime, ImageFormat::Jpeg));

        let by_extension = MemoryFile::new("photo.JPE", "", Vec::new());
        assert!(is_declared_as(&by_extension, ImageFormat::Jpeg));

        let neither = MemoryFile::new("photo.png", "image/png", Vec::new());
        assert!(!is_declared_as(&neither, ImageFormat::Jpeg));
    }

    // ---- full check ----

    #[tokio::test]
    async fn test_check_signature_accepts_png() {
        let file = MemoryFile::new("logo.png", "image/png", png_bytes());
        assert!(check_signature(&file, ImageFormat::Png).await);
    }

    #[tokio::test]
    async fn test_check_signature_rejects_undeclared() {
        // Right bytes, wrong declaration: rejected before reading.
        let file = MemoryFile::new("logo.gif", "image/gif", png_bytes());
        assert!(!check_signature(&file, ImageFormat::Png).await);
    }

    #[tokio::test]
    async fn test_check_signature_read_failure_is_rejection() {
        assert!(!check_signature(&UnreadableFile, ImageFormat::Png).await);
    }
}
