//! Closing block: acceptance, comment, signer and final timestamp.

use super::patterns::{
    ACCEPTANCE_BLOCK, ACCEPTANCE_MARKER, DISCLAIMER_COMMENT, LETTERS_ONLY, SHORT_DATE,
    SHORT_DATE_TAIL, SIGNATURE_WINDOW,
};
use super::ruleset::{ConclusionRules, RuleSet};
use super::timestamps::normalize_date_time;
use crate::models::record::Closing;
use crate::pdf::clean_spaces;

/// Extract the closing block of page 1.
pub fn extract_closing(text: &str, rules: &RuleSet) -> Closing {
    let acceptance = ACCEPTANCE_BLOCK
        .captures(text)
        .map(|caps| {
            caps[1]
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.contains(ACCEPTANCE_MARKER))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let comment = DISCLAIMER_COMMENT
        .captures(text)
        .map(|caps| clean_spaces(&caps[1]))
        .unwrap_or_default();

    // The final timestamp is printed last on the page
    let timestamp = rules
        .general
        .date_time
        .find_iter(text)
        .last()
        .map(|m| normalize_date_time(m.as_str(), &rules.general.date_formats))
        .unwrap_or_default();

    Closing {
        acceptance,
        comment,
        signer: extract_signer(text, &rules.conclusion).unwrap_or_default(),
        timestamp,
    }
}

/// Signer name after the last signature-role keyword.
///
/// Blank and boilerplate lines are skipped. A line with a short date yields
/// the text before the date; otherwise a letters-only line is the name.
pub fn extract_signer(text: &str, rules: &ConclusionRules) -> Option<String> {
    let last = rules
        .signature_roles
        .iter()
        .flat_map(|role| role.find_iter(text))
        .max_by_key(|m| m.end())?;

    let window: String = text[last.end()..].chars().take(SIGNATURE_WINDOW).collect();

    for line in window.split('\n') {
        let line = clean_spaces(line);
        if line.is_empty() || is_boilerplate(&line, &rules.ignore) {
            continue;
        }

        if SHORT_DATE.is_match(&line) {
            let name = SHORT_DATE_TAIL.replace(&line, "");
            let name = name.trim();
            if name.chars().count() > 2 {
                return Some(name.to_string());
            }
        } else if LETTERS_ONLY.is_match(&line) && line.chars().count() > 2 {
            return Some(line);
        }
    }

    None
}

fn is_boilerplate(line: &str, ignore: &[String]) -> bool {
    let lower = line.to_lowercase();
    ignore.iter().any(|fragment| lower.contains(fragment.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "\
Depot Nord
Annahmebereitschaft
Ware vollständig
und unbeschädigt
Kommentar
Haftungsausschluss
Tor 3 benutzt

Der Filialleiter bestätigt mit seiner Unterschrift den Erhalt.
Filialleiter
Datum / Unterschrift

Peter Schulz 10.01.24, 09:40
";

    #[test]
    fn test_closing_block() {
        let rules = shipped();
        let closing = extract_closing(PAGE, &rules);

        assert_eq!(
            closing,
            Closing {
                acceptance: "Ware vollständig und unbeschädigt".to_string(),
                comment: "Tor 3 benutzt".to_string(),
                signer: "Peter Schulz".to_string(),
                timestamp: "2024/01/10, 09:40".to_string(),
            }
        );
    }

    #[test]
    fn test_letters_only_signer() {
        let rules = shipped();
        let text = "Kierownik\nUnterschrift\n\nPeter Schulz\n";
        assert_eq!(
            extract_signer(text, &rules.conclusion),
            Some("Peter Schulz".to_string())
        );
    }

    #[test]
    fn test_signer_uses_last_role_keyword() {
        let rules = shipped();
        let text = "Filialleiter\nMax Muster\nKierownik\nPeter Schulz\n";
        assert_eq!(
            extract_signer(text, &rules.conclusion),
            Some("Peter Schulz".to_string())
        );
    }

    #[test]
    fn test_no_signature_role() {
        let rules = shipped();
        assert_eq!(extract_signer("Peter Schulz", &rules.conclusion), None);
        assert_eq!(extract_closing("Depot Nord", &rules), Closing::default());
    }
}
