//! Delivery address extraction.

use regex::Regex;

use super::patterns::{ADDRESS_EXCLUDES, ADDRESS_MIN_LEN, ADDRESS_WINDOW, ELLIPSIS};
use super::ruleset::AddressRules;
use super::FallbackChain;
use crate::pdf::clean_spaces;

/// Extract the delivery address of page 1.
///
/// The line block after the first address keyword is preferred. A clipped
/// value (ending in an ellipsis) is only kept when the main delivery note
/// pattern finds nothing better.
pub fn extract_address(
    text: &str,
    lines: &[String],
    rules: &AddressRules,
    zip_code: &Regex,
) -> Option<String> {
    let block = keyword_block(lines, rules, zip_code);

    FallbackChain::new("Adresse")
        .then("keyword block", || {
            block.clone().filter(|address| !address.contains(ELLIPSIS))
        })
        .then("main delivery note", || {
            rules
                .main_note
                .captures(text)
                .map(|caps| clean_spaces(&caps[1]))
        })
        .then("clipped keyword block", || block.clone())
        .run()
}

fn keyword_block(lines: &[String], rules: &AddressRules, zip_code: &Regex) -> Option<String> {
    let anchor = lines
        .iter()
        .position(|line| rules.keywords.iter().any(|kw| kw.is_match(line)))?;

    lines
        .iter()
        .skip(anchor + 1)
        .take(ADDRESS_WINDOW)
        .find(|line| {
            zip_code.is_match(line)
                && line.chars().count() > ADDRESS_MIN_LEN
                && !ADDRESS_EXCLUDES.iter().any(|marker| line.contains(marker))
        })
        .map(|line| clean_spaces(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use crate::pdf::clean_lines;

    fn address(text: &str) -> Option<String> {
        let rules = shipped();
        extract_address(
            text,
            &clean_lines(text),
            &rules.address,
            &rules.general.zip_code,
        )
    }

    #[test]
    fn test_first_line_with_zip_code() {
        let text = "Lieferanschrift\nMarkt 3\nAlmweg 12, 80331 München\n";
        assert_eq!(address(text), Some("Almweg 12, 80331 München".to_string()));
    }

    #[test]
    fn test_contact_lines_are_skipped() {
        let text = "Adresse\nTelefon 089 12345\nAlmweg 12, 80331 München";
        assert_eq!(address(text), Some("Almweg 12, 80331 München".to_string()));
    }

    #[test]
    fn test_clipped_address_prefers_main_note() {
        let text = "Adresse\nAlmweg 12, 80331 Mün…\nHaupt Lieferschein\nFiliale 12 Almweg 12 80331\n";
        assert_eq!(address(text), Some("Filiale 12 Almweg 12 80331".to_string()));
    }

    #[test]
    fn test_clipped_address_kept_without_main_note() {
        let text = "Adresse\nAlmweg 12, 80331 Mün…\n";
        assert_eq!(address(text), Some("Almweg 12, 80331 Mün…".to_string()));
    }

    #[test]
    fn test_main_note_without_keyword() {
        let text = "Depot Nord\nHaupt Lieferschein\nAlmweg 12 80331\n";
        assert_eq!(address(text), Some("Almweg 12 80331".to_string()));
    }

    #[test]
    fn test_short_lines_are_rejected() {
        assert_eq!(address("Adresse\nWeg 80331\n"), None);
    }
}
