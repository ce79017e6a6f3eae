//! Markdown checker.
//!
//! Markdown has no invalid documents, so this is a classifier rather than a
//! parser: it counts which markdown features appear in the text and refuses
//! text that looks like an HTML document instead. The tie-break between
//! markdown features and embedded HTML is a fixed policy and is tested as
//! such.

use std::sync::LazyLock;

use regex::Regex;

use super::compile;
use super::html::{count_element_tags, is_valid_html};

/// Inputs shorter than this (in characters, after trimming) may be accepted
/// on their leading token alone.
const SHORT_INPUT_CHARS: usize = 20;

/// Text wrapped in a single `<...>` longer than this is treated as markup.
const WRAPPED_TAG_MIN_CHARS: usize = 10;

/// Leading tokens that make a short input markdown.
const SHORT_INPUT_PREFIXES: &[&str] = &["#", ">", "- ", "* ", "1. ", "```"];

/// A markdown construct the checker can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Heading,
    Link,
    Image,
    Bold,
    Italic,
    Blockquote,
    Code,
    ListItem,
    HorizontalRule,
    TableSeparator,
}

impl Feature {
    pub const ALL: [Self; 10] = [
        Self::Heading,
        Self::Link,
        Self::Image,
        Self::Bold,
        Self::Italic,
        Self::Blockquote,
        Self::Code,
        Self::ListItem,
        Self::HorizontalRule,
        Self::TableSeparator,
    ];

    /// Block-level features that HTML fragments do not produce by accident.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Heading | Self::ListItem | Self::Blockquote | Self::TableSeparator
        )
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::Heading => r"(?m)^#{1,6} ",
            Self::Link => r"\[[^\]\n]+\]\([^)\n]+\)",
            Self::Image => r"!\[[^\]\n]*\]\([^)\n]+\)",
            Self::Bold => r"\*\*[^*\n]+\*\*|__[^_\n]+__",
            Self::Italic => {
                r"(?m)(?:^|[^*\w])\*[^*\s][^*\n]*\*(?:[^*\w]|$)|(?:^|[^_\w])_[^_\s][^_\n]*_(?:[^_\w]|$)"
            }
            Self::Blockquote => r"(?m)^ {0,3}>\s?\S",
            Self::Code => r"(?s)```.*?```|`[^`\n]+`",
            Self::ListItem => r"(?m)^\s*(?:[-*+]|\d+\.)\s+\S",
            Self::HorizontalRule => r"(?m)^ {0,3}(?:-{3,}|\*{3,}|_{3,})\s*$",
            Self::TableSeparator => {
                r"(?m)^\s*\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)+\|?\s*$"
            }
        }
    }
}

static FEATURE_PATTERNS: LazyLock<Vec<(Feature, Regex)>> = LazyLock::new(|| {
    Feature::ALL
        .into_iter()
        .map(|feature| (feature, compile(feature.pattern())))
        .collect()
});

/// `<html>`, `<body>`, `<head>` or a doctype anywhere in the text.
static HTML_DOCUMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<(?:html|body|head)(?:\s[^>]*)?>|<!doctype[^>]*>"));

/// The features present in `text`, in [`Feature::ALL`] order.
#[must_use]
pub fn detect_features(text: &str) -> Vec<Feature> {
    FEATURE_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(feature, _)| *feature)
        .collect()
}

/// Whether `text` is recognisably a full HTML document rather than markdown.
#[must_use]
pub fn looks_like_html_document(text: &str) -> bool {
    if HTML_DOCUMENT_PATTERN.is_match(text) {
        return true;
    }
    let trimmed = text.trim();
    trimmed.starts_with('<')
        && trimmed.ends_with('>')
        && trimmed.chars().count() > WRAPPED_TAG_MIN_CHARS
}

fn starts_with_markdown_token(trimmed: &str) -> bool {
    if SHORT_INPUT_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return true;
    }
    trimmed
        .strip_prefix("![")
        .or_else(|| trimmed.strip_prefix('['))
        .is_some_and(|rest| rest.contains("]("))
}

/// Whether `text` should be accepted as markdown.
#[must_use]
pub fn is_valid_markdown(text: &str) -> bool {
    if looks_like_html_document(text) {
        return false;
    }

    let trimmed = text.trim();
    if trimmed.chars().count() < SHORT_INPUT_CHARS && starts_with_markdown_token(trimmed) {
        return true;
    }

    let features = detect_features(text);
    if features.is_empty() {
        return false;
    }

    // Markdown with embedded HTML: only structural features or a majority of
    // markdown features over HTML tags keep it markdown.
    if is_valid_html(text) {
        return features.iter().any(|f| f.is_structural())
            || features.len() > count_element_tags(text);
    }

    true
}
