//! Text cleanup for rendered PDF page text.
//!
//! The renderer occasionally hands back Latin-1 bytes that were decoded as
//! UTF-8. Only the artifacts observed on delivery notes are repaired; this is
//! not a general encoding detector.

use lazy_static::lazy_static;
use regex::Regex;

/// Known corruption sequences and their intended characters, applied in order.
pub const ENCODING_REPAIRS: &[(&str, &str)] = &[
    ("Ã¼", "ü"),
    ("Ã¶", "ö"),
    ("Ã¤", "ä"),
    ("Ãœ", "Ü"),
    ("Ã–", "Ö"),
    ("Ã„", "Ä"),
    ("ÃŸ", "ß"),
    ("\u{0}fc", "ü"),
    ("\u{0}e4", "ä"),
    ("\u{0}f6", "ö"),
    ("\u{0}dc", "Ü"),
    ("\u{0}c4", "Ä"),
    ("\u{0}d6", "Ö"),
    ("\u{0}df", "ß"),
];

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9,-]").unwrap();
}

/// Repair known encoding artifacts.
///
/// The masculine ordinal indicator is rendered in place of the degree sign on
/// some notes and is mapped to `°`. Replacement characters are dropped.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = raw.replace('\u{00ba}', "°").replace('\u{fffd}', "");
    for (broken, fixed) in ENCODING_REPAIRS {
        if text.contains(broken) {
            text = text.replace(broken, fixed);
        }
    }
    text
}

/// Collapse every run of two or more whitespace characters into one space
/// and trim the result.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").trim().to_string()
}

/// Encoding repair followed by whitespace collapse.
pub fn clean_spaces(raw: &str) -> String {
    collapse_whitespace(&normalize(raw))
}

/// Non-empty cleaned lines of a page, in document order.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(clean_spaces)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Lenient integer coercion for table cells.
///
/// Spaces and thousands dots are dropped, a decimal comma is honoured and the
/// fractional part truncated. Anything unparseable is 0.
pub fn clean_int(raw: &str) -> i64 {
    let cleaned = normalize(raw);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0;
    }

    let compact = cleaned.replace([' ', '.'], "");
    let numeric = NON_NUMERIC.replace_all(&compact, "").replace(',', ".");
    numeric
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
        .unwrap_or(0)
}

/// Normalize a decimal-comma number to a dot-decimal string without
/// interpreting it.
pub fn decimal_string(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Parse a decimal-comma number as `f64`, 0.0 on failure.
pub fn decimal_f64(raw: &str) -> f64 {
    decimal_string(raw).parse().unwrap_or(0.0)
}
