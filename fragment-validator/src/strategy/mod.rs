//! Validation source strategies.
//!
//! Only the filesystem strategy exists. Content held in memory goes through
//! [`ContentValidator`](crate::ContentValidator) directly.

pub mod fs;

use fragment_types::MediaType;

/// How a file of a given media type reaches the validator, mirroring how the
/// dashboard submits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Typed into the editor: the file body is validated as text content.
    Typed,
    /// Uploaded as a file: declared type and bytes are validated.
    Uploaded,
}

impl Submission {
    #[must_use]
    pub const fn for_media_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::TextPlain
            | MediaType::TextMarkdown
            | MediaType::TextHtml
            | MediaType::ApplicationJson => Self::Typed,
            MediaType::TextCsv
            | MediaType::ImagePng
            | MediaType::ImageJpeg
            | MediaType::ImageWebp
            | MediaType::ImageGif
            | MediaType::ImageAvif => Self::Uploaded,
        }
    }
}
