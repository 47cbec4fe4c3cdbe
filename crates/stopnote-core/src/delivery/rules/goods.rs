//! Ordered goods table and its grand total.

use super::ruleset::GoodsRules;
use super::FieldExtractor;
use crate::models::record::{GoodsLine, GoodsTotal};
use crate::pdf::clean_lines;
use crate::pdf::normalize::{decimal_f64, decimal_string};

/// Goods table row extractor; one row per delivery-note number.
pub struct GoodsLineExtractor<'r> {
    rules: &'r GoodsRules,
}

impl<'r> GoodsLineExtractor<'r> {
    pub fn new(rules: &'r GoodsRules) -> Self {
        Self { rules }
    }
}

impl FieldExtractor for GoodsLineExtractor<'_> {
    type Output = GoodsLine;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        clean_lines(text)
            .iter()
            .filter_map(|line| self.rules.line.captures(line))
            .map(|caps| GoodsLine {
                delivery_note: caps[1].to_string(),
                item_count: caps[2].parse().unwrap_or(0),
                ordered: caps[3].parse().unwrap_or(0),
                delivered: caps[4].parse().unwrap_or(0),
                received: decimal_string(&caps[5]),
                difference: decimal_f64(&caps[6]),
                total_weight: decimal_string(&caps[7]),
                total_price: decimal_string(&caps[8]),
            })
            .collect()
    }
}

/// Grand-total row of the goods table.
///
/// The weight drops thousands dots before the decimal comma is converted;
/// the price drops the currency sign.
pub fn extract_goods_total(text: &str, rules: &GoodsRules) -> Option<GoodsTotal> {
    let caps = rules.total.captures(text)?;

    Some(GoodsTotal {
        item_count: caps[1].parse().unwrap_or(0),
        ordered: caps[2].parse().unwrap_or(0),
        delivered: caps[3].parse().unwrap_or(0),
        received: decimal_string(&caps[4]),
        difference: decimal_f64(&caps[5]),
        total_weight: decimal_string(&caps[6].replace('.', "")),
        total_price: decimal_string(&caps[7]).replace('€', "").trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "\
Lieferschein Artikel Bestellt Geliefert Erhalten Differenz Gewicht Preis
4711001   12 120 118 118,0 -2 Kühlware 1,234 456,78
4711002 3 40 40 40,0 0 0,560 99,10
Gesamt 15 160 158 158,0 -2 1.794,5 555,88
";

    #[test]
    fn test_goods_lines() {
        let rules = shipped();
        let lines = GoodsLineExtractor::new(&rules.goods).extract_all(TABLE);

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            GoodsLine {
                delivery_note: "4711001".to_string(),
                item_count: 12,
                ordered: 120,
                delivered: 118,
                received: "118.0".to_string(),
                difference: -2.0,
                total_weight: "1.234".to_string(),
                total_price: "456.78".to_string(),
            }
        );
        assert_eq!(lines[1].delivery_note, "4711002");
        assert_eq!(lines[1].total_weight, "0.560");
    }

    #[test]
    fn test_goods_total() {
        let rules = shipped();
        let total = extract_goods_total(TABLE, &rules.goods).unwrap();

        assert_eq!(
            total,
            GoodsTotal {
                item_count: 15,
                ordered: 160,
                delivered: 158,
                received: "158.0".to_string(),
                difference: -2.0,
                total_weight: "1794.5".to_string(),
                total_price: "555.88".to_string(),
            }
        );
    }

    #[test]
    fn test_no_goods_table() {
        let rules = shipped();
        assert!(GoodsLineExtractor::new(&rules.goods).extract("Depot Nord").is_none());
        assert!(extract_goods_total("Depot Nord", &rules.goods).is_none());
    }
}
