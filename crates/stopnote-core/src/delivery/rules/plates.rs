//! Vehicle and trailer plate extraction.

use regex::Regex;
use tracing::trace;

use super::patterns::{DATE_FRAGMENT, TRAILER_PLACEHOLDERS};
use super::ruleset::VehicleRules;
use super::{ExtractionMatch, FallbackChain, FieldExtractor};
use crate::pdf::clean_spaces;

/// Plate candidates from the configured plate patterns.
pub struct PlateExtractor<'r> {
    rules: &'r VehicleRules,
}

impl<'r> PlateExtractor<'r> {
    /// Create a plate extractor over the vehicle rules.
    pub fn new(rules: &'r VehicleRules) -> Self {
        Self { rules }
    }
}

impl FieldExtractor for PlateExtractor<'_> {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Candidates in pattern order, then match order within a pattern.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in &self.rules.plates {
            for caps in pattern.captures_iter(text) {
                let Some(group) = caps.iter().skip(1).flatten().find(|m| !m.as_str().is_empty())
                else {
                    continue;
                };

                // Date strings share the plate shape
                if DATE_FRAGMENT.is_match(group.as_str()) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(clean_spaces(group.as_str()), group.as_str())
                        .with_position(group.start(), group.end()),
                );
            }
        }

        results
    }
}

/// Vehicle and trailer plates of one note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plates {
    pub vehicle: String,
    pub trailer: String,
}

/// Extract the vehicle and trailer plates from page-1 text.
///
/// The first plate candidate is the vehicle and the second the trailer, even
/// when both are equal. Missing plates fall back to the labelled value after
/// the first configured keyword found on the page.
pub fn extract_plates(text: &str, rules: &VehicleRules) -> Plates {
    let candidates: Vec<String> = PlateExtractor::new(rules)
        .extract_all(text)
        .into_iter()
        .map(|m| {
            if let Some((start, end)) = m.position {
                trace!("Plate candidate '{}' at {}..{}", m.source, start, end);
            }
            m.value
        })
        .collect();

    let vehicle = FallbackChain::new("Fahrzeug")
        .then("plate pattern", || candidates.first().cloned())
        .then("keyword label", || {
            labelled_value(text, &rules.vehicle_labels).filter(|v| !v.is_empty())
        })
        .run()
        .unwrap_or_default();

    let trailer = FallbackChain::new("Anhaenger")
        .then("plate pattern", || candidates.get(1).cloned())
        .then("keyword label", || {
            labelled_value(text, &rules.trailer_labels)
                .filter(|v| !TRAILER_PLACEHOLDERS.contains(&v.as_str()))
        })
        .run()
        .unwrap_or_default();

    Plates { vehicle, trailer }
}

/// Value after the first label that occurs in `text`, single line, cleaned.
fn labelled_value(text: &str, labels: &[Regex]) -> Option<String> {
    labels
        .iter()
        .find_map(|label| label.captures(text))
        .map(|caps| clean_spaces(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;

    #[test]
    fn test_two_plates() {
        let rules = shipped();
        let text = "Depot Nord\nFahrzeug B-AB 1234\nAnhänger M-XY 99\n";
        let plates = extract_plates(text, &rules.vehicle);

        assert_eq!(plates.vehicle, "B-AB 1234");
        assert_eq!(plates.trailer, "M-XY 99");
    }

    #[test]
    fn test_candidate_keeps_source_and_position() {
        let rules = shipped();
        let text = "Fahrzeug B-AB  1234\n";
        let candidate = PlateExtractor::new(&rules.vehicle).extract(text).unwrap();

        assert_eq!(candidate.value, "B-AB 1234");
        assert_eq!(candidate.source, "B-AB  1234");
        let (start, end) = candidate.position.unwrap();
        assert_eq!(&text[start..end], "B-AB  1234");
    }

    #[test]
    fn test_bracketed_plate_also_yields_inner_plate() {
        let rules = shipped();
        let plates = extract_plates("Zugmaschine ABC123 (B-AB 1234)\n", &rules.vehicle);

        assert_eq!(plates.vehicle, "ABC123 (B-AB 1234)");
        assert_eq!(plates.trailer, "B-AB 1234");
    }

    #[test]
    fn test_date_fragments_are_never_plates() {
        let rules = VehicleRules {
            plates: vec![Regex::new(r"\b([A-Z0-9-]{6,12})\b").unwrap()],
            vehicle_labels: Vec::new(),
            trailer_labels: Vec::new(),
        };
        let text = "Datum 2024-01-10 Kennzeichen B-AB1234";
        let candidates: Vec<String> = PlateExtractor::new(&rules)
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(candidates, vec!["B-AB1234"]);
    }

    #[test]
    fn test_keyword_fallback() {
        let rules = shipped();
        let plates = extract_plates("Fahrzeug: LKW 12\nAnhänger: --\n", &rules.vehicle);

        assert_eq!(plates.vehicle, "LKW 12");
        assert_eq!(plates.trailer, "");
    }

    #[test]
    fn test_trailer_keyword_on_next_line() {
        let rules = shipped();
        let plates = extract_plates("Anhänger\n  Kuehlkoffer 7\n", &rules.vehicle);

        assert_eq!(plates.vehicle, "");
        assert_eq!(plates.trailer, "Kuehlkoffer 7");
    }

    #[test]
    fn test_no_plates() {
        let rules = shipped();
        assert_eq!(extract_plates("Depot Nord\n", &rules.vehicle), Plates::default());
    }
}
