//! Delivery record data model.
//!
//! Serialized keys are the German column names the downstream consumers
//! read; the Rust field names describe the same values in English.

use std::path::Path;

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Structured record for one delivery-note document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Logical file name of the document.
    #[serde(rename = "FileName")]
    pub file_name: String,

    /// Processing timestamp (RFC 3339, local offset).
    #[serde(rename = "ProcessedAt")]
    pub processed_at: String,

    /// Tenant code, second underscore segment of the file stem.
    #[serde(rename = "Mandant")]
    pub tenant: String,

    /// First non-empty line of page 1.
    #[serde(rename = "Depot")]
    pub depot: String,

    /// Branch code, third underscore segment of the file stem.
    #[serde(rename = "Filiale")]
    pub branch: String,

    /// Tour code, fifth underscore segment of the file stem.
    #[serde(rename = "Tour")]
    pub tour: String,

    /// Vehicle plate.
    #[serde(rename = "Fahrzeug")]
    pub vehicle: String,

    /// Trailer plate.
    #[serde(rename = "Anhaenger")]
    pub trailer: String,

    /// Driver name.
    #[serde(rename = "Fahrer")]
    pub driver: String,

    /// Delivery address line.
    #[serde(rename = "Adresse")]
    pub address: String,

    /// Planned delivery date-time.
    #[serde(rename = "GeplanteLieferung")]
    pub planned_delivery: String,

    #[serde(rename = "StoppInfos", with = "empty_object", default)]
    pub stop: Option<StopTimestamps>,

    #[serde(rename = "Temperaturen")]
    pub temperatures: Vec<TemperatureReading>,

    #[serde(rename = "Waren")]
    pub goods: Vec<GoodsLine>,

    #[serde(rename = "WarenGesamt", with = "empty_object", default)]
    pub goods_total: Option<GoodsTotal>,

    #[serde(rename = "LeergutSummeSeite1", with = "empty_object", default)]
    pub empties_confirmation: Option<EmptiesConfirmation>,

    #[serde(rename = "LeergutDetails")]
    pub empties: Vec<EmptiesDetail>,

    #[serde(rename = "LeergutZusammenfassung", with = "empty_object", default)]
    pub empties_summary: Option<EmptiesSummary>,

    #[serde(rename = "Abschluss", with = "empty_object", default)]
    pub closing: Option<Closing>,

    /// Document-level failure description.
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl DeliveryRecord {
    /// Create a record pre-filled from the document's logical file name.
    pub fn for_file(file_name: &str) -> Self {
        let stem = file_stem(file_name);
        let parts: Vec<&str> = stem.split('_').collect();
        let segment = |i: usize| parts.get(i).map(|s| s.to_string()).unwrap_or_default();

        Self {
            file_name: file_name.to_string(),
            processed_at: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            tenant: segment(1),
            branch: segment(2),
            tour: segment(4),
            ..Self::default()
        }
    }

    /// Stem used to name every output artifact of this record.
    pub fn stem(&self) -> String {
        file_stem(&self.file_name)
    }

    /// Whether extraction failed at document level.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// Stop timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopTimestamps {
    #[serde(rename = "GeplantAnkunft")]
    pub planned_arrival: String,

    #[serde(rename = "TatsAnkunft")]
    pub actual_arrival: String,

    #[serde(rename = "BeginnLieferung")]
    pub delivery_start: String,

    #[serde(rename = "EndeLieferung")]
    pub delivery_end: String,

    #[serde(rename = "Abfahrt")]
    pub departure: String,

    /// Unloading duration, `HH:MM`.
    #[serde(rename = "Lieferzeit")]
    pub delivery_duration: String,

    /// Standing duration, `HH:MM` or `--`.
    #[serde(rename = "Standzeit")]
    pub standing_duration: String,

    /// Punctuality status, optionally `status (deviation)`.
    #[serde(rename = "LeistungPuenktlichkeit")]
    pub punctuality: String,
}

/// A cooling chamber temperature reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Chamber code, upper case.
    #[serde(rename = "Kammer")]
    pub chamber: String,

    /// Measured value with `°C` suffix.
    #[serde(rename = "Wert")]
    pub value: String,

    /// Operating range, empty if none was printed.
    #[serde(rename = "Range")]
    pub range: String,
}

/// One delivery-note row of the goods table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodsLine {
    #[serde(rename = "Lieferschein")]
    pub delivery_note: String,

    #[serde(rename = "AnzArtikel")]
    pub item_count: i64,

    #[serde(rename = "MengeBestellt")]
    pub ordered: i64,

    #[serde(rename = "MengeGeliefert")]
    pub delivered: i64,

    #[serde(rename = "MengeErhalten")]
    pub received: String,

    #[serde(rename = "Differenz")]
    pub difference: f64,

    #[serde(rename = "GesamtGewicht")]
    pub total_weight: String,

    #[serde(rename = "GesPreis")]
    pub total_price: String,
}

/// Grand-total row of the goods table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodsTotal {
    #[serde(rename = "AnzArtikel")]
    pub item_count: i64,

    #[serde(rename = "MengeBestellt")]
    pub ordered: i64,

    #[serde(rename = "MengeGeliefert")]
    pub delivered: i64,

    #[serde(rename = "MengeErhalten")]
    pub received: String,

    #[serde(rename = "Differenz")]
    pub difference: f64,

    #[serde(rename = "GesamtGewicht")]
    pub total_weight: String,

    #[serde(rename = "GesPreis")]
    pub total_price: String,
}

/// One returnable-container article row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptiesDetail {
    #[serde(rename = "ArtikelNr")]
    pub article: String,

    #[serde(rename = "Bezeichnung")]
    pub description: String,

    /// Account balance as printed; `--` when the note has none.
    #[serde(rename = "Saldo")]
    pub balance: String,

    #[serde(rename = "Geplant")]
    pub planned: i64,

    #[serde(rename = "Anlieferung")]
    pub delivered: i64,

    #[serde(rename = "Abholung")]
    pub collected: i64,

    #[serde(rename = "Differenz")]
    pub difference: i64,
}

/// Aggregate of the empties table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptiesSummary {
    #[serde(rename = "Geplant")]
    pub planned: i64,

    #[serde(rename = "Anlieferung")]
    pub delivered: i64,

    #[serde(rename = "Abholung")]
    pub collected: i64,

    #[serde(rename = "Differenz")]
    pub difference: i64,
}

/// Empties totals as confirmed on the first page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptiesConfirmation {
    #[serde(rename = "Anlieferung")]
    pub delivered: i64,

    #[serde(rename = "Zurueck")]
    pub returned: i64,

    #[serde(rename = "Differenz")]
    pub difference: i64,

    /// Attestation phrase preceding the signature field.
    #[serde(rename = "Bestaetigung")]
    pub attestation: String,
}

/// Closing block of the note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Closing {
    #[serde(rename = "AnnahmeStatus")]
    pub acceptance: String,

    #[serde(rename = "Kommentar")]
    pub comment: String,

    #[serde(rename = "FahrerSignatur")]
    pub signer: String,

    #[serde(rename = "Zeitstempel")]
    pub timestamp: String,
}

/// Nested blocks serialize as `{}` until populated, never as `null`.
mod empty_object {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            other => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
        }
    }
}
