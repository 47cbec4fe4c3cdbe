//! Driver name extraction.

use super::patterns::{DRIVER_WINDOW, TRAILING_CODE};
use super::ruleset::DriverRules;
use crate::pdf::clean_spaces;

/// Find the driver name in the lines after the first driver keyword.
///
/// `lines` are the cleaned non-empty lines of page 1. Only the first keyword
/// line is consulted; a name equal to the vehicle plate is skipped.
pub fn extract_driver(lines: &[String], rules: &DriverRules, vehicle: &str) -> Option<String> {
    let anchor = lines
        .iter()
        .position(|line| rules.keywords.iter().any(|kw| kw.is_match(line)))?;

    lines
        .iter()
        .skip(anchor + 1)
        .take(DRIVER_WINDOW)
        .filter(|line| !is_ignored(line, &rules.ignore))
        .filter(|line| !TRAILING_CODE.is_match(line))
        .filter_map(|line| rules.name.captures(line))
        .map(|caps| clean_spaces(&caps[1]))
        .find(|name| name != vehicle)
}

fn is_ignored(line: &str, ignore: &[String]) -> bool {
    let upper = line.to_uppercase();
    ignore.iter().any(|token| upper.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use crate::pdf::clean_lines;

    fn driver(text: &str) -> Option<String> {
        let rules = shipped();
        extract_driver(&clean_lines(text), &rules.driver, "")
    }

    #[test]
    fn test_name_after_keyword() {
        let text = "Depot Nord\nFahrer\nPeter Schulz\nTour 12";
        assert_eq!(driver(text), Some("Peter Schulz".to_string()));
    }

    #[test]
    fn test_skips_blacklisted_and_coded_lines() {
        let text = "Fahrer:\nFiliale Nord\nMax Muster 12345\nPeter Schulz";
        assert_eq!(driver(text), Some("Peter Schulz".to_string()));
    }

    #[test]
    fn test_window_is_limited() {
        let text = "Fahrer\n1\n2\n3\n4\n5\nPeter Schulz";
        assert_eq!(driver(text), None);
    }

    #[test]
    fn test_only_first_keyword_line() {
        let text = "Fahrer\n1\n2\n3\n4\n5\n6\nFahrer\nPeter Schulz";
        assert_eq!(driver(text), None);
    }

    #[test]
    fn test_name_equal_to_vehicle_is_skipped() {
        let rules = shipped();
        let lines = clean_lines("Fahrer\nKUEHL LKW\nPeter Schulz");
        assert_eq!(
            extract_driver(&lines, &rules.driver, "KUEHL LKW"),
            Some("Peter Schulz".to_string())
        );
    }

    #[test]
    fn test_keyword_is_whole_word() {
        assert_eq!(driver("Beifahrerin\nPeter Schulz"), None);
    }
}
