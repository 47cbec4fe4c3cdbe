//! Record assembly from page text.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::reconcile::reconcile;
use super::rules::{
    extract_address, extract_closing, extract_confirmation, extract_driver, extract_empties,
    extract_goods_total, extract_plates, extract_stop, time_after_label, FieldExtractor,
    GoodsLineExtractor, RuleSet, TemperatureExtractor,
};
use super::NO_TEXT_ERROR;
use crate::models::record::DeliveryRecord;
use crate::pdf::{clean_lines, PdfExtractor, PdfProcessor};

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Reconciled record, with `error` set on document-level failure.
    pub record: DeliveryRecord,
    /// Normalized text of all pages, blank-line separated.
    pub full_text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Delivery-note parser driven by a compiled rule set.
pub struct DeliveryParser<'r> {
    rules: &'r RuleSet,
}

impl<'r> DeliveryParser<'r> {
    /// Create a parser over `rules`.
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Process the document at `path`, recording it as `file_name`.
    ///
    /// Never fails: unreadable documents and documents without text end up
    /// in the record's `error` field.
    pub fn parse_file(&self, path: &Path, file_name: &str) -> ExtractionResult {
        let start = Instant::now();
        let record = DeliveryRecord::for_file(file_name);

        info!("Processing {}", path.display());

        let (record, full_text) = match read_pages(path) {
            Ok(pages) => {
                let full_text = pages
                    .iter()
                    .filter(|page| !page.is_empty())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n\n");

                if full_text.trim().is_empty() {
                    warn!("{}: {}", file_name, NO_TEXT_ERROR);
                    let record = DeliveryRecord {
                        error: Some(NO_TEXT_ERROR.to_string()),
                        ..record
                    };
                    (record, full_text)
                } else {
                    (self.parse_pages(record, &pages), full_text)
                }
            }
            Err(e) => {
                warn!("{}: {}", file_name, e);
                let record = DeliveryRecord {
                    error: Some(e.to_string()),
                    ..record
                };
                (record, String::new())
            }
        };

        ExtractionResult {
            record,
            full_text,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Extract every field from normalized page text into `record` and
    /// reconcile the result.
    pub fn parse_pages(&self, record: DeliveryRecord, pages: &[String]) -> DeliveryRecord {
        reconcile(&self.assemble(record, pages))
    }

    fn assemble(&self, mut record: DeliveryRecord, pages: &[String]) -> DeliveryRecord {
        let rules = self.rules;
        let page_one = pages.first().map(String::as_str).unwrap_or_default();
        let lines = clean_lines(page_one);

        if let Some(depot) = lines.first() {
            record.depot = depot.clone();
        }

        let plates = extract_plates(page_one, &rules.vehicle);
        record.vehicle = plates.vehicle;
        record.trailer = plates.trailer;

        record.driver =
            extract_driver(&lines, &rules.driver, &record.vehicle).unwrap_or_default();
        record.address = extract_address(page_one, &lines, &rules.address, &rules.general.zip_code)
            .unwrap_or_default();

        record.planned_delivery =
            time_after_label(page_one, &rules.timestamps.planned_delivery, &rules.general);
        record.stop = Some(extract_stop(page_one, rules));

        record.temperatures = TemperatureExtractor::new(&rules.temperature).extract_all(page_one);
        record.goods = GoodsLineExtractor::new(&rules.goods).extract_all(page_one);
        record.goods_total = extract_goods_total(page_one, &rules.goods);
        record.closing = Some(extract_closing(page_one, rules));

        let summary = match pages.get(1) {
            Some(page_two) => {
                let empties = extract_empties(page_two, &rules.empties);
                record.empties = empties.details;
                record.empties_summary = empties.summary;
                record.empties_summary.as_ref()
            }
            None => None,
        };
        record.empties_confirmation = Some(extract_confirmation(
            page_one,
            summary,
            &rules.conclusion,
        ));

        debug!(
            "{}: {} temperatures, {} goods lines, {} empties rows",
            record.file_name,
            record.temperatures.len(),
            record.goods.len(),
            record.empties.len()
        );

        record
    }
}

fn read_pages(path: &Path) -> crate::Result<Vec<String>> {
    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let pages = extractor.extract_pages()?;
    debug!("Extracted {} pages", pages.len());
    Ok(pages.into_iter().map(|page| page.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::rules::ruleset::shipped;
    use crate::models::record::{Closing, EmptiesConfirmation, EmptiesSummary};
    use pretty_assertions::assert_eq;

    const PAGE_ONE: &str = "\
Depot Nord
Fahrzeug B-AB 1234
Fahrer
Peter Schulz
Lieferanschrift
Almweg 12, 80331 München
Geplante Lieferung 10.01.24, 06:00
Tats. Ankunft 10.01.24, 07:50
Beginn Lieferung 10.01.24, 08:00
Ende Lieferung 2024/01/10, 09:30
Abfahrt 2024/01/10, 09:45
Pünktlich (00:00)
TK -19,5 °C Soll -22 - -18 °C
4711001 12 120 118 118,0 -2 Kühlware 1,234 456,78
Gesamt 12 120 118 118,0 -2 1.234 456,78
Der Filialleiter bestätigt mit seiner Unterschrift den Erhalt.
Filialleiter

Peter Schulz 10.01.24, 09:40
";

    const PAGE_TWO: &str = "\
Leergut
4711 Euro-Palette -- 12 10 2 8
Zusammenfassung 12 10 2 8
";

    fn parse(pages: &[&str]) -> DeliveryRecord {
        let rules = shipped();
        let pages: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
        DeliveryParser::new(&rules)
            .parse_pages(DeliveryRecord::for_file("LS_M01_F4711_20240110_T12.pdf"), &pages)
    }

    #[test]
    fn test_parse_two_pages() {
        let record = parse(&[PAGE_ONE, PAGE_TWO]);

        assert_eq!(record.tenant, "M01");
        assert_eq!(record.depot, "Depot Nord");
        assert_eq!(record.vehicle, "B-AB 1234");
        assert_eq!(record.trailer, "");
        assert_eq!(record.driver, "Peter Schulz");
        assert_eq!(record.address, "Almweg 12, 80331 München");
        assert_eq!(record.planned_delivery, "2024/01/10, 06:00");

        let stop = record.stop.clone().unwrap();
        assert_eq!(stop.delivery_duration, "01:30");
        assert_eq!(stop.standing_duration, "00:15");
        assert_eq!(stop.punctuality, "Pünktlich (00:00)");

        assert_eq!(record.temperatures.len(), 1);
        assert_eq!(record.goods.len(), 1);
        assert_eq!(record.goods_total.as_ref().unwrap().total_weight, "1234");

        assert_eq!(record.empties.len(), 1);
        assert_eq!(
            record.empties_summary,
            Some(EmptiesSummary {
                planned: 12,
                delivered: 10,
                collected: 2,
                difference: 8,
            })
        );
        assert_eq!(
            record.empties_confirmation,
            Some(EmptiesConfirmation {
                delivered: 10,
                returned: 2,
                difference: 8,
                attestation: "Der Filialleiter bestätigt mit seiner Unterschrift".to_string(),
            })
        );
        assert_eq!(
            record.closing,
            Some(Closing {
                acceptance: String::new(),
                comment: String::new(),
                signer: "Peter Schulz".to_string(),
                timestamp: "2024/01/10, 09:40".to_string(),
            })
        );
        assert!(record.error.is_none());
    }

    #[test]
    fn test_single_page_has_zero_confirmation() {
        let record = parse(&[PAGE_ONE]);

        assert!(record.empties.is_empty());
        assert!(record.empties_summary.is_none());
        let confirmation = record.empties_confirmation.unwrap();
        assert_eq!(confirmation.delivered, 0);
        assert_eq!(confirmation.returned, 0);
        assert!(!confirmation.attestation.is_empty());
    }

    #[test]
    fn test_parse_file_reports_unreadable_document() {
        let rules = shipped();
        let result = DeliveryParser::new(&rules)
            .parse_file(Path::new("/nonexistent/note.pdf"), "LS_M01_F1.pdf");

        assert!(result.record.error.is_some());
        assert_eq!(result.record.tenant, "M01");
        assert!(result.full_text.is_empty());
    }
}
