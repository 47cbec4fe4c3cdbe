//! Error types for the stopnote-core library.

use thiserror::Error;

/// Main error type for the stopnote library.
#[derive(Error, Debug)]
pub enum StopnoteError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Rule set loading error.
    #[error("rule set error: {0}")]
    Rules(#[from] RulesError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tabular sink error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while loading the extraction rule set.
///
/// All of these are fatal at startup; no document is processed without a
/// complete, compilable rule set.
#[derive(Error, Debug)]
pub enum RulesError {
    /// The rule file could not be read.
    #[error("cannot read rule file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The rule file is not a valid rule document.
    #[error("invalid rule file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured pattern does not compile.
    #[error("invalid pattern in {field}: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the stopnote library.
pub type Result<T> = std::result::Result<T, StopnoteError>;
