//! Core library for delivery-note extraction.
//!
//! This crate provides:
//! - PDF processing (per-page text with encoding repair)
//! - Rule-driven field extraction (plates, driver, address, stop times,
//!   temperatures, goods, empties, closing block)
//! - Cross-field reconciliation of the assembled record
//! - Text, JSON and CSV sinks for every processed document

pub mod delivery;
pub mod error;
pub mod models;
pub mod output;
pub mod pdf;

pub use delivery::{process_document, DeliveryParser, ExtractionResult, RuleSet, NO_TEXT_ERROR};
pub use error::{Result, StopnoteError};
pub use models::config::RuleConfig;
pub use models::record::DeliveryRecord;
pub use output::{OutputSinks, WrittenFiles};
pub use pdf::{PdfExtractor, PdfProcessor};
