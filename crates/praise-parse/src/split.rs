// Leading verse-number detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of ASCII digits, an optional period, then optional whitespace.
static VERSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.?\s*").expect("valid regex"));

/// One line split into its leading verse number (if any) and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub ordinal: Option<u32>,
    pub text: String,
}

/// Split a leading verse number such as `"2. "` or `"3 "` off a line.
///
/// Lines without leading digits come back with no ordinal and only their
/// leading whitespace removed. A digit run too large for `u32` is not
/// treated as a verse number.
pub fn split_number(line: &str) -> ParsedLine {
    let line = line.trim_start();
    if let Some(caps) = VERSE_NUMBER.captures(line) {
        if let Ok(n) = caps[1].parse::<u32>() {
            return ParsedLine {
                ordinal: Some(n),
                text: line[caps[0].len()..].to_string(),
            };
        }
    }
    ParsedLine {
        ordinal: None,
        text: line.to_string(),
    }
}
