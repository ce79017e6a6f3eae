//! HTML checker.
//!
//! A shallow well-formedness check: tags are tokenized with a regex and their
//! nesting is replayed on a stack. Attribute syntax, implicit tag closing and
//! the other HTML5 parsing rules are out of reach by construction.

use std::sync::LazyLock;

use regex::Regex;

use super::compile;

/// Elements that never take a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tokenizer: group 1 is the closing slash, group 2 the tag name.
///
/// Comments and doctypes come through as names starting with `!`.
static TAG_TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<(/?)(!--|!doctype|[a-z][a-z0-9-]*)[^>]*>"));

/// Element tags only, used to weigh embedded HTML against markdown features.
static ELEMENT_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"</?[a-zA-Z][a-zA-Z0-9-]*(?:\s[^>]*)?/?>"));

/// Whether `text` contains at least one tag and all of its tags are balanced.
#[must_use]
pub fn is_valid_html(text: &str) -> bool {
    let mut found_tag = false;
    let mut open_tags: Vec<String> = Vec::new();

    for caps in TAG_TOKEN_PATTERN.captures_iter(text) {
        found_tag = true;

        let token = caps.get(0).map_or("", |m| m.as_str());
        let is_closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map_or_else(String::new, |m| m.as_str().to_ascii_lowercase());

        // comments and doctype
        if name.starts_with('!') {
            continue;
        }
        if VOID_ELEMENTS.contains(&name.as_str()) || token.ends_with("/>") {
            continue;
        }

        if is_closing {
            match open_tags.pop() {
                Some(open) if open == name => {}
                _ => return false,
            }
        } else {
            open_tags.push(name);
        }
    }

    found_tag && open_tags.is_empty()
}

/// Number of element tags (opening, closing or self-closing) in `text`.
#[must_use]
pub fn count_element_tags(text: &str) -> usize {
    ELEMENT_TAG_PATTERN.find_iter(text).count()
}
