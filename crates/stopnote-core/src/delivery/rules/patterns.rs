//! Fixed regex patterns for delivery-note extraction.
//!
//! Everything that varies between note layouts lives in the rule file; these
//! are the shapes that are the same on every note.

use lazy_static::lazy_static;
use regex::Regex;

/// Lines scanned after a driver keyword line.
pub const DRIVER_WINDOW: usize = 5;

/// Lines scanned after an address keyword line.
pub const ADDRESS_WINDOW: usize = 7;

/// Minimum length, in characters, of an accepted address line.
pub const ADDRESS_MIN_LEN: usize = 10;

/// Address candidates containing these are contact lines.
pub const ADDRESS_EXCLUDES: &[&str] = &["Telefon", "Helpdesk"];

/// Truncation artifact left by the renderer in clipped table cells.
pub const ELLIPSIS: char = '…';

/// Trailer label values that mean "no trailer".
pub const TRAILER_PLACEHOLDERS: &[&str] = &["", "-", "--"];

/// Characters scanned after the last signature keyword.
pub const SIGNATURE_WINDOW: usize = 5000;

/// Lines scanned after a duration label.
pub const DURATION_WINDOW: usize = 3;

/// Marker that opens the acceptance block.
pub const ACCEPTANCE_MARKER: &str = "Annahmebereitschaft";

/// Canonical output format of every normalized date-time.
pub const NORMALIZED_DATE_TIME: &str = "%Y/%m/%d, %H:%M";

/// Sentinel for a duration that does not apply.
pub const NO_DURATION: &str = "--";

lazy_static! {
    // ISO date fragment; plate shapes also match these
    pub static ref DATE_FRAGMENT: Regex = Regex::new(r"\d{4}-\d{2}").unwrap();

    // Driver candidates ending in a numeric code
    pub static ref TRAILING_CODE: Regex = Regex::new(r"\d{4,5}\s*$").unwrap();

    // Operating range of a cooling chamber, e.g. "-22 - -18 °C"
    pub static ref OPERATING_RANGE: Regex = Regex::new(
        r"([0-9.,-]+\s*-\s*[0-9.,-]+\s*°?\s*C)"
    ).unwrap();

    // Empties article row: number, description, balance, remaining columns
    pub static ref EMPTIES_ROW: Regex = Regex::new(
        r"^\s*(\d{4})\s+(.*?)\s+(--|-?\d+)\s+(.*)"
    ).unwrap();

    pub static ref SIGNED_INTEGER: Regex = Regex::new(r"-?\d+").unwrap();

    // Closing block
    pub static ref ACCEPTANCE_BLOCK: Regex = Regex::new(
        r"(?is)Annahmebereitschaft([\s\S]*?)(?:Geliefert\s+an|Kommentar|Haftungsausschluss)"
    ).unwrap();

    pub static ref DISCLAIMER_COMMENT: Regex = Regex::new(
        r"(?is)Haftungsausschluss\s+(.*?)(?:\n\s*\n|[a-z]{3,}\s*\d{2}\.\d{2}\.\d{2})"
    ).unwrap();

    // Signature lines
    pub static ref SHORT_DATE: Regex = Regex::new(r"\d{2}\.\d{2}\.\d{2}").unwrap();

    pub static ref SHORT_DATE_TAIL: Regex = Regex::new(r"\d{2}\.\d{2}\.\d{2}.*").unwrap();

    pub static ref LETTERS_ONLY: Regex = Regex::new(r"^[A-Za-zÄÖÜäöüß\s]+$").unwrap();

    // Street types; only "straße" also counts inside compounds ("Hauptstraße")
    pub static ref STREET_TYPE: Regex = Regex::new(
        r"(?i)(?:str\.|stra(?:ss|ß)e\b|\b(?:weg|platz|gasse)\b)"
    ).unwrap();

    // Duration table labels
    pub static ref DELIVERY_DURATION_LABEL: Regex = Regex::new(r"(?i)\bLieferzeit\b").unwrap();

    pub static ref STANDING_DURATION_LABEL: Regex = Regex::new(r"(?i)\bStandzeit\b").unwrap();

    pub static ref CLOCK_TIME: Regex = Regex::new(r"\b(\d{2}:\d{2})\b").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_type() {
        assert!(STREET_TYPE.is_match("Hauptstraße 5"));
        assert!(STREET_TYPE.is_match("Almstrasse 12"));
        assert!(STREET_TYPE.is_match("Hauptstr. 5"));
        assert!(STREET_TYPE.is_match("Am Weg 3"));
        assert!(STREET_TYPE.is_match("Kleine Gasse 7"));
        assert!(!STREET_TYPE.is_match("Am Mühlweg 3"));
        assert!(!STREET_TYPE.is_match("Anna Hellweg"));
        assert!(!STREET_TYPE.is_match("Peter Schulz"));
        assert!(!STREET_TYPE.is_match("B-AB 1234"));
    }

    #[test]
    fn test_operating_range() {
        let caps = OPERATING_RANGE.captures("TK -19,5 °C Soll -22 - -18 °C").unwrap();
        assert_eq!(&caps[1], "-22 - -18 °C");
    }

    #[test]
    fn test_empties_row() {
        let caps = EMPTIES_ROW.captures("4711 Euro-Palette -- 12 10 2").unwrap();
        assert_eq!(&caps[1], "4711");
        assert_eq!(&caps[2], "Euro-Palette");
        assert_eq!(&caps[3], "--");
        assert_eq!(&caps[4], "12 10 2");
    }
}
