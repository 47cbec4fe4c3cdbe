//! Flattened single-row form of a delivery record.
//!
//! Cells are read from the record's JSON form by key path, so every column
//! holds exactly the value the structured sink writes for that field.

use std::io::Write;

use serde_json::Value;

use crate::error::Result;
use crate::models::record::DeliveryRecord;

/// UTF-8 byte-order mark expected by spreadsheet tools.
pub const BOM: &str = "\u{feff}";

pub const DELIMITER: u8 = b';';

/// Where a column takes its value from.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// Key path into the serialized record.
    Path(&'static [&'static str]),
    /// `Kammer: Wert` of every reading, joined by `; `.
    Temperatures,
}

/// One column of the tabular sink.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub source: Source,
}

const fn path(header: &'static str, path: &'static [&'static str]) -> Column {
    Column {
        header,
        source: Source::Path(path),
    }
}

/// Fixed column order of the tabular sink.
pub const COLUMNS: &[Column] = &[
    path("FileName", &["FileName"]),
    path("ProcessedAt", &["ProcessedAt"]),
    path("Mandant", &["Mandant"]),
    path("Depot", &["Depot"]),
    path("Filiale", &["Filiale"]),
    path("Tour", &["Tour"]),
    path("Fahrzeug", &["Fahrzeug"]),
    path("Anhaenger", &["Anhaenger"]),
    path("Fahrer", &["Fahrer"]),
    path("Adresse", &["Adresse"]),
    path("GeplanteLieferung", &["GeplanteLieferung"]),
    path("GeplantAnkunft", &["StoppInfos", "GeplantAnkunft"]),
    path("TatsAnkunft", &["StoppInfos", "TatsAnkunft"]),
    path("BeginnLieferung", &["StoppInfos", "BeginnLieferung"]),
    path("EndeLieferung", &["StoppInfos", "EndeLieferung"]),
    path("Abfahrt", &["StoppInfos", "Abfahrt"]),
    path("Lieferzeit", &["StoppInfos", "Lieferzeit"]),
    path("Standzeit", &["StoppInfos", "Standzeit"]),
    path("LeistungPuenktlichkeit", &["StoppInfos", "LeistungPuenktlichkeit"]),
    Column {
        header: "Temperaturen",
        source: Source::Temperatures,
    },
    path("WarenGesamt_AnzArtikel", &["WarenGesamt", "AnzArtikel"]),
    path("WarenGesamt_MengeBestellt", &["WarenGesamt", "MengeBestellt"]),
    path("WarenGesamt_MengeGeliefert", &["WarenGesamt", "MengeGeliefert"]),
    path("WarenGesamt_MengeErhalten", &["WarenGesamt", "MengeErhalten"]),
    path("WarenGesamt_Differenz", &["WarenGesamt", "Differenz"]),
    path("WarenGesamt_GesamtGewicht", &["WarenGesamt", "GesamtGewicht"]),
    path("WarenGesamt_GesPreis", &["WarenGesamt", "GesPreis"]),
    path("Leergut_Anlieferung", &["LeergutSummeSeite1", "Anlieferung"]),
    path("Leergut_Zurueck", &["LeergutSummeSeite1", "Zurueck"]),
    path("Leergut_Differenz", &["LeergutSummeSeite1", "Differenz"]),
    path("AnnahmeStatus", &["Abschluss", "AnnahmeStatus"]),
    path("Kommentar", &["Abschluss", "Kommentar"]),
    path("FahrerSignatur", &["Abschluss", "FahrerSignatur"]),
    path("Zeitstempel", &["Abschluss", "Zeitstempel"]),
];

/// Header row.
pub fn header() -> Vec<&'static str> {
    COLUMNS.iter().map(|column| column.header).collect()
}

/// Data row for `record`; absent values are empty cells.
pub fn row(record: &DeliveryRecord) -> Result<Vec<String>> {
    let json = serde_json::to_value(record)?;
    Ok(COLUMNS.iter().map(|column| cell(&json, column.source)).collect())
}

/// Write BOM, header and the record's row.
pub fn write_row<W: Write>(mut writer: W, record: &DeliveryRecord) -> Result<()> {
    writer.write_all(BOM.as_bytes())?;

    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);
    csv.write_record(header())?;
    csv.write_record(row(record)?)?;
    csv.flush()?;
    Ok(())
}

/// Value at `path` in the serialized record.
pub fn lookup<'a>(json: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(json, |current, key| current.get(key))
}

fn cell(json: &Value, source: Source) -> String {
    match source {
        Source::Path(path) => lookup(json, path).map(render).unwrap_or_default(),
        Source::Temperatures => json
            .get("Temperaturen")
            .and_then(Value::as_array)
            .map(|readings| {
                readings
                    .iter()
                    .map(|reading| {
                        format!(
                            "{}: {}",
                            reading.get("Kammer").map(render).unwrap_or_default(),
                            reading.get("Wert").map(render).unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default(),
    }
}

/// Scalar cell text; strings are written without quotes.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{
        Closing, EmptiesConfirmation, GoodsTotal, StopTimestamps, TemperatureReading,
    };
    use pretty_assertions::assert_eq;

    fn sample() -> DeliveryRecord {
        let mut record = DeliveryRecord::for_file("LS_M01_F4711_20240110_T12.pdf");
        record.depot = "Depot Nord".to_string();
        record.vehicle = "B-AB 1234".to_string();
        record.stop = Some(StopTimestamps {
            delivery_end: "2024/01/10, 09:30".to_string(),
            standing_duration: "--".to_string(),
            ..StopTimestamps::default()
        });
        record.temperatures = vec![
            TemperatureReading {
                chamber: "TK".to_string(),
                value: "-19.5°C".to_string(),
                range: String::new(),
            },
            TemperatureReading {
                chamber: "FR".to_string(),
                value: "3.2°C".to_string(),
                range: "2 - 7 °C".to_string(),
            },
        ];
        record.goods_total = Some(GoodsTotal {
            item_count: 15,
            difference: -1.5,
            total_price: "555.88".to_string(),
            ..GoodsTotal::default()
        });
        record.empties_confirmation = Some(EmptiesConfirmation {
            delivered: 10,
            returned: 2,
            difference: 8,
            attestation: String::new(),
        });
        record.closing = Some(Closing {
            signer: "Peter Schulz".to_string(),
            ..Closing::default()
        });
        record
    }

    fn column(record: &DeliveryRecord, header: &str) -> String {
        let index = COLUMNS.iter().position(|c| c.header == header).unwrap();
        row(record).unwrap()[index].clone()
    }

    #[test]
    fn test_header_matches_columns() {
        let header = header();
        assert_eq!(header.len(), 34);
        assert_eq!(header[0], "FileName");
        assert_eq!(header[19], "Temperaturen");
        assert_eq!(header[33], "Zeitstempel");
    }

    #[test]
    fn test_cells() {
        let record = sample();

        assert_eq!(column(&record, "Mandant"), "M01");
        assert_eq!(column(&record, "EndeLieferung"), "2024/01/10, 09:30");
        assert_eq!(column(&record, "Standzeit"), "--");
        assert_eq!(column(&record, "Temperaturen"), "TK: -19.5°C; FR: 3.2°C");
        assert_eq!(column(&record, "WarenGesamt_AnzArtikel"), "15");
        assert_eq!(column(&record, "WarenGesamt_Differenz"), "-1.5");
        assert_eq!(column(&record, "Leergut_Zurueck"), "2");
        assert_eq!(column(&record, "FahrerSignatur"), "Peter Schulz");
    }

    #[test]
    fn test_absent_blocks_are_empty_cells() {
        let record = DeliveryRecord::for_file("scan.pdf");
        let cells = row(&record).unwrap();

        for (column, value) in COLUMNS.iter().zip(&cells) {
            match column.header {
                "FileName" => assert_eq!(value, "scan.pdf"),
                "ProcessedAt" => assert!(!value.is_empty()),
                _ => assert_eq!(value, "", "{}", column.header),
            }
        }
    }

    #[test]
    fn test_written_row_matches_structured_record() {
        let record = sample();
        let mut buffer = Vec::new();
        write_row(&mut buffer, &record).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let body = text.strip_prefix(BOM).expect("missing byte-order mark");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .from_reader(body.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);

        let json = serde_json::to_value(&record).unwrap();
        for (index, column) in COLUMNS.iter().enumerate() {
            assert_eq!(&headers[index], column.header);
            if let Source::Path(path) = column.source {
                let expected = lookup(&json, path).map(render).unwrap_or_default();
                assert_eq!(&rows[0][index], expected, "{}", column.header);
            }
        }
        assert_eq!(&rows[0][19], "TK: -19.5°C; FR: 3.2°C");
    }
}
