//! Rule file structures.
//!
//! The rule file is the single source of labels, patterns and keyword lists
//! used by the extractors. Every section and key is required; there is no
//! built-in fallback rule set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// Complete rule file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleConfig {
    pub general: GeneralConfig,
    pub vehicle: VehicleConfig,
    pub driver: DriverConfig,
    pub address: AddressConfig,
    pub timestamps: TimestampConfig,
    pub temperature: TemperatureConfig,
    pub goods: GoodsConfig,
    pub empties: EmptiesConfig,
    pub conclusion: ConclusionConfig,
}

/// Settings shared by several extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneralConfig {
    /// Regex matching one date-time literal as printed on the note.
    pub date_time_pattern: String,

    /// chrono format strings tried in order when normalizing a date-time.
    pub date_format_list: Vec<String>,

    /// Regex matching a postal code.
    pub zip_code_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleConfig {
    /// Plate regexes; the first non-empty capture group is the plate.
    pub plate_patterns: Vec<String>,

    /// Labels preceding the vehicle plate.
    pub keywords: Vec<String>,

    /// Labels preceding the trailer plate.
    pub trailer_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DriverConfig {
    pub keywords: Vec<String>,

    /// Tokens that disqualify a candidate line (matched upper-cased).
    pub ignore_list: Vec<String>,

    /// Regex whose first group is a plausible person name.
    pub name_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressConfig {
    pub keywords: Vec<String>,

    /// Fallback regex applied to the whole page; group 1 is the address.
    pub main_note_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimestampConfig {
    pub labels: TimestampLabels,

    /// Regexes yielding a status (group 1) and an optional deviation (group 2).
    pub punctuality_patterns: Vec<String>,
}

/// Label synonyms per stop timestamp, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampLabels {
    #[serde(rename = "GeplanteLieferung")]
    pub planned_delivery: Vec<String>,

    #[serde(rename = "GeplantAnkunft")]
    pub planned_arrival: Vec<String>,

    #[serde(rename = "TatsAnkunft")]
    pub actual_arrival: Vec<String>,

    #[serde(rename = "BeginnLieferung")]
    pub delivery_start: Vec<String>,

    #[serde(rename = "EndeLieferung")]
    pub delivery_end: Vec<String>,

    #[serde(rename = "Abfahrt")]
    pub departure: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureConfig {
    /// Regex capturing chamber (group 1) and value (group 2).
    pub regex_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoodsConfig {
    /// Per-line regex with eight groups.
    pub table_pattern: String,

    /// Page-level regex with seven groups for the total row.
    pub total_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmptiesConfig {
    /// Marker present when the empties table has a planned-collection column.
    pub collection_pattern: String,

    /// Page-level regex; group 1 holds the summary numbers.
    pub summary_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConclusionConfig {
    /// Role keywords introducing the signature field.
    pub signature_keywords: Vec<String>,

    /// Boilerplate fragments that never form a signer name (matched lower-cased).
    pub ignore_signature_content: Vec<String>,
}

impl RuleConfig {
    /// Load the rule file from JSON.
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a rule document.
    pub fn from_json(content: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// The rule file shipped with the repository.
#[cfg(test)]
pub(crate) const SHIPPED_RULES: &str = include_str!("../../../../config/rules.json");
