// crates/network/src/disposition.rs
//! Filename extraction from `Content-Disposition` headers

use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use std::sync::LazyLock;

// `filename="quoted name"` or `filename=bare_name;`
static FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"?|([^;]*));?"#)
        .expect("filename pattern is a valid regex")
});

/// Extracts the `filename` parameter of a `Content-Disposition` value
///
/// Returns `None` when no parameter is present or its value is blank.
/// The RFC 5987 `filename*=` form is not matched.
pub fn parse_file_name(disposition: &str) -> Option<String> {
    let captures = FILENAME.captures(disposition)?;
    let name = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Looks up `Content-Disposition` in a header map and extracts the filename
pub fn file_name_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    parse_file_name(value)
}
