//! Format-specific checkers, one per media-type family.
//!
//! Each sub-module is a stateless recognizer:
//! - `json` — strict JSON parse
//! - `html` — tag-balance check over a shallow tokenizer
//! - `markdown` — feature-count heuristic with an HTML tie-break
//! - `csv` — declared-type gate plus structural parse of an uploaded file
//! - `signature` — magic-number sniffing for PNG, JPEG, WEBP, GIF and AVIF

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;
pub mod signature;

use regex::Regex;

/// Compile a pattern that is part of the crate source.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid checker regex {pattern:?}: {err}"),
    }
}
