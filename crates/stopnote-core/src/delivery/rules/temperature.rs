//! Cooling chamber temperature readings.

use super::patterns::OPERATING_RANGE;
use super::ruleset::TemperatureRules;
use super::FieldExtractor;
use crate::models::record::TemperatureReading;
use crate::pdf::{clean_spaces, normalize};

/// Temperature reading extractor.
pub struct TemperatureExtractor<'r> {
    rules: &'r TemperatureRules,
}

impl<'r> TemperatureExtractor<'r> {
    pub fn new(rules: &'r TemperatureRules) -> Self {
        Self { rules }
    }
}

impl FieldExtractor for TemperatureExtractor<'_> {
    type Output = TemperatureReading;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut readings = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            let line = normalize(raw);
            let Some(caps) = self.rules.reading.captures(&line) else {
                continue;
            };

            let chamber = caps[1].to_uppercase();
            let value = caps[2].replace(',', ".");
            let rest = caps.get(0).map(|m| &line[m.end()..]).unwrap_or_default();

            // Same line first, then the lines around it
            let range = operating_range(rest)
                .or_else(|| index.checked_sub(1).and_then(|i| operating_range(lines[i])))
                .or_else(|| lines.get(index + 1).and_then(|next| operating_range(next)))
                .unwrap_or_default();

            readings.push(TemperatureReading {
                chamber,
                value: format!("{value}°C"),
                range,
            });
        }

        readings
    }
}

fn operating_range(text: &str) -> Option<String> {
    OPERATING_RANGE
        .captures(text)
        .map(|caps| clean_spaces(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use pretty_assertions::assert_eq;

    fn readings(text: &str) -> Vec<TemperatureReading> {
        let rules = shipped();
        TemperatureExtractor::new(&rules.temperature).extract_all(text)
    }

    #[test]
    fn test_range_on_same_line() {
        let found = readings("TK -19,5 °C Soll -22 - -18 °C\n");
        assert_eq!(
            found,
            vec![TemperatureReading {
                chamber: "TK".to_string(),
                value: "-19.5°C".to_string(),
                range: "-22 - -18 °C".to_string(),
            }]
        );
    }

    #[test]
    fn test_range_on_neighbouring_lines() {
        let found = readings("FR 3,2 °C\n2 - 7 °C\nTK -19,5 °C Soll -22 - -18 °C\n");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].chamber, "FR");
        assert_eq!(found[0].value, "3.2°C");
        assert_eq!(found[0].range, "2 - 7 °C");
        assert_eq!(found[1].chamber, "TK");
    }

    #[test]
    fn test_previous_line_range_wins_over_next_line() {
        let found = readings("Soll 2 - 7 °C\nFR 3,2 °C\nSoll 0 - 4 °C\n");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, "2 - 7 °C");
    }

    #[test]
    fn test_next_line_range_when_previous_has_none() {
        let found = readings("Kühlung\nFR 3,2 °C\nSoll 0 - 4 °C\n");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, "0 - 4 °C");
    }

    #[test]
    fn test_lower_case_chamber_and_ordinal_degree() {
        let found = readings("Kammer tk -18 ºC\n");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].chamber, "TK");
        assert_eq!(found[0].value, "-18°C");
        assert_eq!(found[0].range, "");
    }

    #[test]
    fn test_no_readings() {
        assert!(readings("Depot Nord\nFahrer\n").is_empty());
    }
}
