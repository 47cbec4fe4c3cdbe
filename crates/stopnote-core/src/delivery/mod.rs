//! Delivery-note extraction: rules, record assembly and reconciliation.

mod parser;
pub mod reconcile;
pub mod rules;

pub use parser::{DeliveryParser, ExtractionResult};
pub use reconcile::reconcile;
pub use rules::RuleSet;

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::record::DeliveryRecord;
use crate::output::OutputSinks;

/// Error recorded when no page yields any text.
pub const NO_TEXT_ERROR: &str = "No extractable text";

/// Process one document and write all sinks.
///
/// `display_name` is recorded as the file name and defaults to the name of
/// `path`. Document-level failures end up in the returned record; only sink
/// failures are returned as errors.
pub fn process_document(
    path: &Path,
    display_name: Option<&str>,
    rules: &RuleSet,
    sinks: &OutputSinks,
) -> Result<DeliveryRecord> {
    let file_name = match display_name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    };

    let result = DeliveryParser::new(rules).parse_file(path, &file_name);
    sinks.write_all(&result.record, &result.full_text)?;

    info!(
        "Processed {} in {}ms{}",
        file_name,
        result.processing_time_ms,
        if result.record.is_error() { " (with error)" } else { "" }
    );

    Ok(result.record)
}
