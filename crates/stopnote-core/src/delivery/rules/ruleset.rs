//! Compiled, immutable form of the rule file.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::RulesError;
use crate::models::config::RuleConfig;

/// Every pattern of the rule file, compiled once at startup.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub general: GeneralRules,
    pub vehicle: VehicleRules,
    pub driver: DriverRules,
    pub address: AddressRules,
    pub timestamps: TimestampRules,
    pub temperature: TemperatureRules,
    pub goods: GoodsRules,
    pub empties: EmptiesRules,
    pub conclusion: ConclusionRules,
}

#[derive(Debug, Clone)]
pub struct GeneralRules {
    /// One date-time literal.
    pub date_time: Regex,
    /// chrono input formats, tried in order.
    pub date_formats: Vec<String>,
    pub zip_code: Regex,
}

#[derive(Debug, Clone)]
pub struct VehicleRules {
    pub plates: Vec<Regex>,
    /// `<keyword>: <value>` captures for the vehicle.
    pub vehicle_labels: Vec<Regex>,
    /// `<keyword>: <value>` captures for the trailer.
    pub trailer_labels: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct DriverRules {
    pub keywords: Vec<Regex>,
    /// Upper-cased blacklist tokens.
    pub ignore: Vec<String>,
    pub name: Regex,
}

#[derive(Debug, Clone)]
pub struct AddressRules {
    pub keywords: Vec<Regex>,
    pub main_note: Regex,
}

/// Label patterns per timestamp; each captures the date-time in group 1.
#[derive(Debug, Clone)]
pub struct TimestampRules {
    pub planned_delivery: Vec<Regex>,
    pub planned_arrival: Vec<Regex>,
    pub actual_arrival: Vec<Regex>,
    pub delivery_start: Vec<Regex>,
    pub delivery_end: Vec<Regex>,
    pub departure: Vec<Regex>,
    pub punctuality: Vec<Regex>,
    /// Date-time literal followed by a duration; the duration is the last group.
    pub duration_after_date: Regex,
}

#[derive(Debug, Clone)]
pub struct TemperatureRules {
    pub reading: Regex,
}

#[derive(Debug, Clone)]
pub struct GoodsRules {
    pub line: Regex,
    pub total: Regex,
}

#[derive(Debug, Clone)]
pub struct EmptiesRules {
    pub collection_marker: Regex,
    pub summary: Regex,
}

#[derive(Debug, Clone)]
pub struct ConclusionRules {
    pub signature_roles: Vec<Regex>,
    /// "Der <role> ... Unterschrift" attestation phrase.
    pub attestation: Regex,
    /// Lower-cased boilerplate fragments.
    pub ignore: Vec<String>,
}

impl RuleSet {
    /// Load and compile the rule file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let config = RuleConfig::from_file(path)?;
        let rules = Self::compile(&config)?;
        debug!("Compiled rule set from {}", path.display());
        Ok(rules)
    }

    /// Parse and compile a rule document.
    pub fn from_json(content: &str) -> Result<Self, RulesError> {
        Self::compile(&RuleConfig::from_json(content)?)
    }

    /// Compile every pattern of `config`.
    pub fn compile(config: &RuleConfig) -> Result<Self, RulesError> {
        let date_time_pattern = &config.general.date_time_pattern;

        let general = GeneralRules {
            date_time: compile("General.DateTimePattern", date_time_pattern)?,
            date_formats: config.general.date_format_list.clone(),
            zip_code: compile("General.ZipCodePattern", &config.general.zip_code_pattern)?,
        };

        let vehicle = VehicleRules {
            plates: compile_all("Vehicle.PlatePatterns", &config.vehicle.plate_patterns, |p| {
                p.to_string()
            })?,
            vehicle_labels: compile_all("Vehicle.Keywords", &config.vehicle.keywords, label_value)?,
            trailer_labels: compile_all(
                "Vehicle.TrailerKeywords",
                &config.vehicle.trailer_keywords,
                label_value,
            )?,
        };

        let driver = DriverRules {
            keywords: compile_all("Driver.Keywords", &config.driver.keywords, keyword)?,
            ignore: config.driver.ignore_list.iter().map(|s| s.to_uppercase()).collect(),
            name: compile("Driver.NamePattern", &config.driver.name_pattern)?,
        };

        let address = AddressRules {
            keywords: compile_all("Address.Keywords", &config.address.keywords, keyword)?,
            main_note: compile_ci("Address.MainNotePattern", &config.address.main_note_pattern)?,
        };

        let labels = &config.timestamps.labels;
        let labeled = |field: &str, list: &[String]| {
            compile_all(field, list, |label| {
                format!(r"(?is){label}.*?({date_time_pattern})")
            })
        };
        let timestamps = TimestampRules {
            planned_delivery: labeled("Timestamps.Labels.GeplanteLieferung", &labels.planned_delivery)?,
            planned_arrival: labeled("Timestamps.Labels.GeplantAnkunft", &labels.planned_arrival)?,
            actual_arrival: labeled("Timestamps.Labels.TatsAnkunft", &labels.actual_arrival)?,
            delivery_start: labeled("Timestamps.Labels.BeginnLieferung", &labels.delivery_start)?,
            delivery_end: labeled("Timestamps.Labels.EndeLieferung", &labels.delivery_end)?,
            departure: labeled("Timestamps.Labels.Abfahrt", &labels.departure)?,
            punctuality: config
                .timestamps
                .punctuality_patterns
                .iter()
                .map(|p| compile_ci("Timestamps.PunctualityPatterns", p))
                .collect::<Result<_, _>>()?,
            duration_after_date: compile(
                "General.DateTimePattern",
                &format!(r"{date_time_pattern}\s+(\d{{2}}:\d{{2}})"),
            )?,
        };

        let temperature = TemperatureRules {
            reading: compile_ci("Temperature.RegexPattern", &config.temperature.regex_pattern)?,
        };

        let goods = GoodsRules {
            line: compile("Goods.TablePattern", &config.goods.table_pattern)?,
            total: compile("Goods.TotalPattern", &config.goods.total_pattern)?,
        };

        let empties = EmptiesRules {
            collection_marker: compile_ci(
                "Empties.CollectionPattern",
                &config.empties.collection_pattern,
            )?,
            summary: compile("Empties.SummaryPattern", &config.empties.summary_pattern)?,
        };

        let roles = &config.conclusion.signature_keywords;
        let conclusion = ConclusionRules {
            signature_roles: compile_all("Conclusion.SignatureKeywords", roles, |kw| {
                format!("(?is){kw}")
            })?,
            attestation: compile(
                "Conclusion.SignatureKeywords",
                &format!(r"(?is)Der\s+({}).*?Unterschrift", roles.join("|")),
            )?,
            ignore: config
                .conclusion
                .ignore_signature_content
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        };

        Ok(Self {
            general,
            vehicle,
            driver,
            address,
            timestamps,
            temperature,
            goods,
            empties,
            conclusion,
        })
    }
}

/// `<keyword>`, optional colon, then the value on the same or next line.
fn label_value(keyword: &str) -> String {
    format!(r"{keyword}\s*:?[\s\n]+(.+)")
}

/// Case-insensitive whole-word keyword.
fn keyword(keyword: &str) -> String {
    format!(r"(?i)\b{keyword}\b")
}

fn compile(field: &str, pattern: &str) -> Result<Regex, RulesError> {
    Regex::new(pattern).map_err(|source| RulesError::Pattern {
        field: field.to_string(),
        source,
    })
}

fn compile_ci(field: &str, pattern: &str) -> Result<Regex, RulesError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RulesError::Pattern {
            field: field.to_string(),
            source,
        })
}

fn compile_all(
    field: &str,
    items: &[String],
    template: impl Fn(&str) -> String,
) -> Result<Vec<Regex>, RulesError> {
    items.iter().map(|item| compile(field, &template(item))).collect()
}

/// Rule set compiled from the shipped rule file.
#[cfg(test)]
pub(crate) fn shipped() -> RuleSet {
    RuleSet::from_json(crate::models::config::SHIPPED_RULES).unwrap()
}
