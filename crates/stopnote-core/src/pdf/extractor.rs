//! Per-page PDF text extraction using pdf-extract with a lopdf word fallback.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::normalize::{clean_spaces, normalize};
use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// How the text of a page was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// Layout-preserving extraction.
    Layout,
    /// Word-level fallback, one word per line.
    Words,
    /// Neither strategy produced text.
    Empty,
}

/// Normalized text of a single page.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed).
    pub number: u32,
    /// Encoding-repaired text.
    pub text: String,
    /// Strategy that produced `text`.
    pub source: TextSource,
}

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Layout text for every page. The renderer is known to panic on some
    /// font programs, so a panic is reported as an extraction error.
    fn layout_pages(&self) -> Result<Vec<String>> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction(
                "layout renderer panicked".to_string(),
            )),
        }
    }

    /// Word-level text of one page, each word cleaned and put on its own line.
    fn word_text(&self, doc: &Document, page: u32) -> String {
        match doc.extract_text(&[page]) {
            Ok(text) => text
                .split_whitespace()
                .map(clean_spaces)
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                trace!("Word extraction failed on page {}: {}", page, e);
                String::new()
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<PageText>> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        let layout = self.layout_pages().unwrap_or_else(|e| {
            warn!("Layout extraction failed, using word fallback: {}", e);
            Vec::new()
        });

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut pages = Vec::with_capacity(page_numbers.len());

        for (index, number) in page_numbers.into_iter().enumerate() {
            let layout_text = layout.get(index).map(|t| normalize(t)).unwrap_or_default();
            if !layout_text.trim().is_empty() {
                pages.push(PageText {
                    number,
                    text: layout_text,
                    source: TextSource::Layout,
                });
                continue;
            }

            let words = self.word_text(doc, number);
            let source = if words.is_empty() {
                TextSource::Empty
            } else {
                debug!("Page {} had no layout text, using {} chars of words", number, words.len());
                TextSource::Words
            };
            pages.push(PageText {
                number,
                text: words,
                source,
            });
        }

        Ok(pages)
    }
}
