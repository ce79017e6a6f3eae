//! JSON checker.

use serde::de::IgnoredAny;

/// Whether `text` parses as a single strict JSON value.
///
/// Leading and trailing whitespace is allowed; trailing garbage is not.
#[must_use]
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_values() {
        assert!(is_valid_json(r#"{"a":1}"#));
        assert!(is_valid_json("[1, 2, 3]"));
        assert!(is_valid_json("  \"text\"\n"));
        assert!(is_valid_json("null"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(!is_valid_json("{bad"));
        assert!(!is_valid_json("{'a': 1}"));
        assert!(!is_valid_json("{\"a\": 1,}"));
        assert!(!is_valid_json("{} {}"));
        assert!(!is_valid_json(""));
    }
}
