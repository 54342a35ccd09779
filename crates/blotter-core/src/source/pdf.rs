//! PDF page source using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageSource, Result};
use crate::error::SourceError;

/// PDF page source.
///
/// lopdf validates and, when needed, decrypts the document; pdf-extract
/// renders each page to text.
#[derive(Default)]
pub struct PdfSource {
    page_count: u32,
    pages: Vec<String>,
}

impl PdfSource {
    /// Create a new PDF source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageSource for PdfSource {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(&raw_data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

        if pages.len() as u32 != page_count {
            warn!(
                "PDF declares {} pages but text extraction produced {}",
                page_count,
                pages.len()
            );
        }

        debug!("Loaded PDF with {} pages", pages.len());
        self.page_count = pages.len() as u32;
        self.pages = pages;
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn extract_page_lines(&self, page: u32) -> Result<Vec<String>> {
        let index = page.checked_sub(1).ok_or(SourceError::InvalidPage(page))? as usize;
        let text = self.pages.get(index).ok_or(SourceError::InvalidPage(page))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_source_new() {
        let source = PdfSource::new();
        assert_eq!(source.page_count(), 0);
        assert!(matches!(source.extract_page_lines(1), Err(SourceError::InvalidPage(1))));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let mut source = PdfSource::new();
        assert!(matches!(source.load(b"not a pdf"), Err(SourceError::Parse(_))));
    }
}
