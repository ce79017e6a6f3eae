//! Media type primitives for fragments.
//!
//! This crate is the single source of truth for the set of media types a
//! fragment may declare, shared by the `fragment-validator` engine and the
//! `fragments` client model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from media type parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaTypeError {
    /// The string is not one of the supported fragment media types.
    #[error("Unsupported media type '{0}'")]
    Unsupported(String),

    /// The string is not a `type/subtype` pair at all.
    #[error("Malformed media type '{0}': expected 'type/subtype'")]
    Malformed(String),
}

/// A media type a fragment may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "text/markdown")]
    TextMarkdown,
    #[serde(rename = "text/html")]
    TextHtml,
    #[serde(rename = "text/csv")]
    TextCsv,
    #[serde(rename = "application/json")]
    ApplicationJson,
    #[serde(rename = "image/png")]
    ImagePng,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "image/webp")]
    ImageWebp,
    #[serde(rename = "image/gif")]
    ImageGif,
    #[serde(rename = "image/avif")]
    ImageAvif,
}

/// Text media types. Fragments of these types can be edited in place.
pub const TEXT_TYPES: &[MediaType] = &[
    MediaType::TextPlain,
    MediaType::TextMarkdown,
    MediaType::TextHtml,
    MediaType::TextCsv,
    MediaType::ApplicationJson,
];

/// Image media types. Fragments of these types are always uploaded as files.
pub const IMAGE_TYPES: &[MediaType] = &[
    MediaType::ImagePng,
    MediaType::ImageJpeg,
    MediaType::ImageWebp,
    MediaType::ImageGif,
    MediaType::ImageAvif,
];

impl MediaType {
    /// Every supported media type, text types first.
    pub const ALL: [Self; 10] = [
        Self::TextPlain,
        Self::TextMarkdown,
        Self::TextHtml,
        Self::TextCsv,
        Self::ApplicationJson,
        Self::ImagePng,
        Self::ImageJpeg,
        Self::ImageWebp,
        Self::ImageGif,
        Self::ImageAvif,
    ];

    /// The canonical `type/subtype` string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextMarkdown => "text/markdown",
            Self::TextHtml => "text/html",
            Self::TextCsv => "text/csv",
            Self::ApplicationJson => "application/json",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ImageGif => "image/gif",
            Self::ImageAvif => "image/avif",
        }
    }

    /// The part after the `/`, e.g. `markdown` for `text/markdown`.
    ///
    /// The fragments API uses it as the extension of conversion endpoints.
    #[must_use]
    pub fn subtype(self) -> &'static str {
        let s = self.as_str();
        s.split_once('/').map_or(s, |(_, sub)| sub)
    }

    /// Whether this is one of [`TEXT_TYPES`].
    #[must_use]
    pub fn is_text(self) -> bool {
        TEXT_TYPES.contains(&self)
    }

    /// Whether this is one of [`IMAGE_TYPES`].
    #[must_use]
    pub fn is_image(self) -> bool {
        IMAGE_TYPES.contains(&self)
    }

    /// The binary image format behind an image media type.
    #[must_use]
    pub const fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::ImagePng => Some(ImageFormat::Png),
            Self::ImageJpeg => Some(ImageFormat::Jpeg),
            Self::ImageWebp => Some(ImageFormat::Webp),
            Self::ImageGif => Some(ImageFormat::Gif),
            Self::ImageAvif => Some(ImageFormat::Avif),
            Self::TextPlain
            | Self::TextMarkdown
            | Self::TextHtml
            | Self::TextCsv
            | Self::ApplicationJson => None,
        }
    }

    /// Media types a fragment of this type can be converted to (itself included).
    #[must_use]
    pub const fn conversions(self) -> &'static [Self] {
        match self {
            Self::TextPlain => &[Self::TextPlain],
            Self::TextMarkdown => &[Self::TextMarkdown, Self::TextHtml, Self::TextPlain],
            Self::TextHtml => &[Self::TextHtml, Self::TextPlain],
            Self::TextCsv => &[Self::TextCsv, Self::TextPlain, Self::ApplicationJson],
            Self::ApplicationJson => &[Self::ApplicationJson, Self::TextPlain],
            Self::ImagePng
            | Self::ImageJpeg
            | Self::ImageWebp
            | Self::ImageGif
            | Self::ImageAvif => IMAGE_TYPES,
        }
    }

    /// Whether a fragment of this type can be viewed as `target`.
    #[must_use]
    pub fn can_convert_to(self, target: Self) -> bool {
        self.conversions().contains(&target)
    }

    /// Guess a media type from a file extension (without the leading dot).
    ///
    /// Matching is case-insensitive.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(Self::TextPlain),
            "md" | "markdown" => Some(Self::TextMarkdown),
            "html" | "htm" => Some(Self::TextHtml),
            "csv" => Some(Self::TextCsv),
            "json" => Some(Self::ApplicationJson),
            _ => ImageFormat::from_extension(&ext).map(ImageFormat::media_type),
        }
    }

    /// Parse a `Content-Type` header value, ignoring parameters such as `charset`.
    ///
    /// # Errors
    ///
    /// Returns [`MediaTypeError`] if the essence is malformed or unsupported.
    pub fn from_content_type(value: &str) -> Result<Self, MediaTypeError> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        essence.to_ascii_lowercase().parse()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    /// Exact match against the canonical strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(media_type) = Self::ALL.into_iter().find(|t| t.as_str() == s) {
            return Ok(media_type);
        }
        match s.split_once('/') {
            Some((kind, sub)) if !kind.is_empty() && !sub.is_empty() => {
                Err(MediaTypeError::Unsupported(s.to_owned()))
            }
            _ => Err(MediaTypeError::Malformed(s.to_owned())),
        }
    }
}

/// Binary image formats recognised by their leading signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Avif,
}

impl ImageFormat {
    /// Upper-case label used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
            Self::Gif => "GIF",
            Self::Avif => "AVIF",
        }
    }

    #[must_use]
    pub const fn media_type(self) -> MediaType {
        match self {
            Self::Png => MediaType::ImagePng,
            Self::Jpeg => MediaType::ImageJpeg,
            Self::Webp => MediaType::ImageWebp,
            Self::Gif => MediaType::ImageGif,
            Self::Avif => MediaType::ImageAvif,
        }
    }

    /// Accepted filename extensions, lower-case and without the dot.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg", "jpe"],
            Self::Webp => &["webp"],
            Self::Gif => &["gif"],
            Self::Avif => &["avif"],
        }
    }

    /// Look up the format owning a (case-insensitive) extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        [Self::Png, Self::Jpeg, Self::Webp, Self::Gif, Self::Avif]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // ---- parsing ----

    #[test]
    fn test_parse_all_canonical_strings() {
        for media_type in MediaType::ALL {
            assert_eq!(media_type.as_str().parse::<MediaType>(), Ok(media_type));
        }
    }

    #[test]
    fn test_parse_unsupported() {
        assert_eq!(
            "application/pdf".parse::<MediaType>(),
            Err(MediaTypeError::Unsupported("application/pdf".to_owned()))
        );
        assert_eq!(
            "Text/Plain".parse::<MediaType>(),
            Err(MediaTypeError::Unsupported("Text/Plain".to_owned()))
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            "markdown".parse::<MediaType>(),
            Err(MediaTypeError::Malformed(_))
        ));
        assert!(matches!(
            "text/".parse::<MediaType>(),
            Err(MediaTypeError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_content_type_strips_parameters() {
        assert_eq!(
            MediaType::from_content_type("text/plain; charset=utf-8"),
            Ok(MediaType::TextPlain)
        );
        assert_eq!(
            MediaType::from_content_type("IMAGE/PNG"),
            Ok(MediaType::ImagePng)
        );
    }

    // ---- groups and conversions ----

    #[test]
    fn test_groups_partition_all_types() {
        for media_type in MediaType::ALL {
            assert_ne!(media_type.is_text(), media_type.is_image(), "{media_type}");
        }
    }

    #[test]
    fn test_subtype() {
        assert_eq!(MediaType::TextMarkdown.subtype(), "markdown");
        assert_eq!(MediaType::ApplicationJson.subtype(), "json");
        assert_eq!(MediaType::ImageJpeg.subtype(), "jpeg");
    }

    #[test]
    fn test_conversions_include_self() {
        for media_type in MediaType::ALL {
            assert!(media_type.can_convert_to(media_type), "{media_type}");
        }
    }

    #[test]
    fn test_conversions_text_to_image_rejected() {
        assert!(MediaType::TextMarkdown.can_convert_to(MediaType::TextHtml));
        assert!(!MediaType::TextHtml.can_convert_to(MediaType::TextMarkdown));
        assert!(!MediaType::TextPlain.can_convert_to(MediaType::ImagePng));
        assert!(MediaType::ImageAvif.can_convert_to(MediaType::ImagePng));
    }

    // ---- extensions ----

    #[test]
    fn test_from_extension() {
        assert_eq!(MediaType::from_extension("MD"), Some(MediaType::TextMarkdown));
        assert_eq!(MediaType::from_extension("jpe"), Some(MediaType::ImageJpeg));
        assert_eq!(MediaType::from_extension("exe"), None);
    }

    #[test]
    fn test_image_format_roundtrip_through_media_type() {
        for media_type in IMAGE_TYPES {
            let format = media_type.image_format().unwrap();
            assert_eq!(format.media_type(), *media_type);
        }
        assert_eq!(MediaType::TextCsv.image_format(), None);
    }

    #[test]
    fn test_serde_uses_canonical_strings() {
        let json = serde_json::to_string(&MediaType::ImageWebp).unwrap();
        assert_eq!(json, "\"image/webp\"");
        let parsed: MediaType = serde_json::from_str("\"text/csv\"").unwrap();
        assert_eq!(parsed, MediaType::TextCsv);
    }
}
