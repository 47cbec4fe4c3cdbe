//! PDF processing module.

mod extractor;
pub mod normalize;

pub use extractor::{PdfExtractor, PageText, TextSource};
pub use normalize::{clean_lines, clean_spaces, collapse_whitespace, normalize};

#[cfg(test)]
pub(crate) use extractor::testing;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the normalized text of every page, in page order.
    fn extract_pages(&self) -> Result<Vec<PageText>>;
}
