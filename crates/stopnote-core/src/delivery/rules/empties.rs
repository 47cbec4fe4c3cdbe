//! Returnable containers (Leergut): page-2 table, its summary and the
//! page-1 confirmation.

use tracing::debug;

use super::patterns::{EMPTIES_ROW, SIGNED_INTEGER};
use super::ruleset::{ConclusionRules, EmptiesRules};
use crate::models::record::{EmptiesConfirmation, EmptiesDetail, EmptiesSummary};
use crate::pdf::clean_lines;
use crate::pdf::normalize::{clean_int, clean_spaces};

/// Column layout of the empties table.
///
/// Numbers after the balance are planned and delivered, followed by the
/// collection and difference columns at layout-specific positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptiesLayout {
    /// Four numbers: planned, delivered, collected, difference.
    Standard,
    /// Five numbers with a planned-collection column before collected.
    Collection,
}

impl EmptiesLayout {
    /// Layout announced by the page; the collection marker selects
    /// [`EmptiesLayout::Collection`].
    pub fn detect(text: &str, rules: &EmptiesRules) -> Self {
        if rules.collection_marker.is_match(text) {
            Self::Collection
        } else {
            Self::Standard
        }
    }

    /// Layout matching a row's number count, if any.
    pub fn for_arity(count: usize) -> Option<Self> {
        match count {
            4 => Some(Self::Standard),
            5 => Some(Self::Collection),
            _ => None,
        }
    }

    pub fn collected_index(self) -> usize {
        match self {
            Self::Standard => 2,
            Self::Collection => 3,
        }
    }

    pub fn difference_index(self) -> usize {
        match self {
            Self::Standard => 3,
            Self::Collection => 4,
        }
    }
}

/// Everything read from the empties page.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptiesBlock {
    pub layout: EmptiesLayout,
    pub details: Vec<EmptiesDetail>,
    pub summary: Option<EmptiesSummary>,
}

/// Parse the empties table and summary of page 2.
pub fn extract_empties(text: &str, rules: &EmptiesRules) -> EmptiesBlock {
    let layout = EmptiesLayout::detect(text, rules);

    let details: Vec<EmptiesDetail> = clean_lines(text)
        .iter()
        .filter_map(|line| parse_row(line, layout))
        .collect();

    let summary = rules.summary.captures(text).and_then(|caps| {
        let numbers = integers(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
        if numbers.len() < 4 {
            return None;
        }
        let columns = if numbers.len() == 5 {
            EmptiesLayout::Collection
        } else {
            EmptiesLayout::Standard
        };
        Some(EmptiesSummary {
            planned: clean_int(numbers[0]),
            delivered: clean_int(numbers[1]),
            collected: clean_int(numbers[columns.collected_index()]),
            difference: clean_int(numbers[columns.difference_index()]),
        })
    });

    debug!(
        "Empties page: {:?} layout, {} rows, summary {}",
        layout,
        details.len(),
        if summary.is_some() { "found" } else { "missing" }
    );

    EmptiesBlock {
        layout,
        details,
        summary,
    }
}

/// One article row; rows whose number count names a layout use that layout.
fn parse_row(line: &str, page_layout: EmptiesLayout) -> Option<EmptiesDetail> {
    let caps = EMPTIES_ROW.captures(line)?;
    let numbers = integers(caps.get(4).map(|m| m.as_str()).unwrap_or_default());
    let columns = EmptiesLayout::for_arity(numbers.len()).unwrap_or(page_layout);
    let number_at = |index: usize| numbers.get(index).map_or(0, |n| clean_int(n));

    Some(EmptiesDetail {
        article: caps[1].to_string(),
        description: clean_spaces(&caps[2].replace("--", "")),
        balance: caps[3].trim().to_string(),
        planned: number_at(0),
        delivered: number_at(1),
        collected: number_at(columns.collected_index()),
        difference: number_at(columns.difference_index()),
    })
}

fn integers(text: &str) -> Vec<&str> {
    SIGNED_INTEGER
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Empties totals as confirmed on page 1.
///
/// Quantities mirror the summary (zero without one); the attestation is the
/// "Der <role> ... Unterschrift" phrase of page 1.
pub fn extract_confirmation(
    page_one: &str,
    summary: Option<&EmptiesSummary>,
    rules: &ConclusionRules,
) -> EmptiesConfirmation {
    let attestation = rules
        .attestation
        .find(page_one)
        .map(|m| clean_spaces(m.as_str()))
        .unwrap_or_default();

    match summary {
        Some(summary) => EmptiesConfirmation {
            delivered: summary.delivered,
            returned: summary.collected,
            difference: summary.difference,
            attestation,
        },
        None => EmptiesConfirmation {
            attestation,
            ..EmptiesConfirmation::default()
        },
    }
}
