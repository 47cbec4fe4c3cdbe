//! Cross-field sanity checks on an assembled record.

use tracing::debug;

use super::rules::patterns::STREET_TYPE;
use crate::models::record::DeliveryRecord;

/// Return a copy of `record` with misattributed trailer and driver values
/// cleared.
///
/// A trailer equal to the address, or one that reads like a street address,
/// is dropped. A driver equal to the address, or containing a street type,
/// is dropped.
pub fn reconcile(record: &DeliveryRecord) -> DeliveryRecord {
    let mut corrected = record.clone();

    if !corrected.trailer.is_empty() && corrected.trailer == corrected.address {
        debug!("Trailer duplicates the address, clearing it");
        corrected.trailer.clear();
    } else if corrected.trailer.contains(',') || STREET_TYPE.is_match(&corrected.trailer) {
        debug!("Trailer '{}' looks like an address, clearing it", corrected.trailer);
        corrected.trailer.clear();
    }

    if !corrected.driver.is_empty() && corrected.driver == corrected.address {
        debug!("Driver duplicates the address, clearing it");
        corrected.driver.clear();
    } else if STREET_TYPE.is_match(&corrected.driver) {
        debug!("Driver '{}' looks like an address, clearing it", corrected.driver);
        corrected.driver.clear();
    }

    corrected
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(trailer: &str, driver: &str, address: &str) -> DeliveryRecord {
        DeliveryRecord {
            trailer: trailer.to_string(),
            driver: driver.to_string(),
            address: address.to_string(),
            ..DeliveryRecord::default()
        }
    }

    #[test]
    fn test_trailer_equal_to_address() {
        let input = record("Almweg 12 80331", "", "Almweg 12 80331");
        let output = reconcile(&input);

        assert_eq!(output.trailer, "");
        assert_eq!(output.address, "Almweg 12 80331");
        // the input is left untouched
        assert_eq!(input.trailer, "Almweg 12 80331");
    }

    #[test]
    fn test_trailer_reading_like_an_address() {
        assert_eq!(reconcile(&record("Markt 3, München", "", "")).trailer, "");
        assert_eq!(reconcile(&record("Am Weg 4", "", "")).trailer, "");
        assert_eq!(reconcile(&record("M-XY 99", "", "")).trailer, "M-XY 99");
    }

    #[test]
    fn test_driver_with_street_type() {
        let output = reconcile(&record("", "Hauptstraße 5", "Almweg 12 80331"));
        assert_eq!(output.driver, "");
    }

    #[test]
    fn test_driver_surname_ending_in_street_word() {
        let input = record("", "Anna Hellweg", "Almweg 12, 80331 München");
        assert_eq!(reconcile(&input).driver, "Anna Hellweg");
    }

    #[test]
    fn test_driver_equal_to_address() {
        let output = reconcile(&record("", "Peter Schulz", "Peter Schulz"));
        assert_eq!(output.driver, "");
    }

    #[test]
    fn test_plausible_values_survive() {
        let input = record("M-XY 99", "Peter Schulz", "Almweg 12, 80331 München");
        assert_eq!(reconcile(&input), input);
    }
}
