//! Plain-text page source.
//!
//! Reads the output of a layout-preserving extractor such as
//! `pdftotext -layout`, where pages are separated by form feeds.

use tracing::debug;

use super::{PageSource, Result};
use crate::error::SourceError;

const PAGE_BREAK: char = '\x0c';

/// Page source over form-feed separated text.
#[derive(Debug, Default)]
pub struct TextSource {
    pages: Vec<String>,
}

impl TextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source directly from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            pages: split_pages(text),
        }
    }
}

fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();

    // pdftotext terminates every page with a form feed, including the last
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

impl PageSource for TextSource {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(data)
            .map_err(|e| SourceError::Parse(format!("text is not UTF-8: {}", e)))?;
        self.pages = split_pages(text);
        debug!("Loaded text with {} pages", self.pages.len());
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
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
    fn test_split_on_form_feed() {
        let source = TextSource::from_text("header\nrow 1\x0crow 2\nfooter\x0c");
        assert_eq!(source.page_count(), 2);
        assert_eq!(source.extract_page_lines(1).unwrap(), vec!["header", "row 1"]);
        assert_eq!(source.extract_page_lines(2).unwrap(), vec!["row 2", "footer"]);
    }

    #[test]
    fn test_no_form_feed_is_one_page() {
        let source = TextSource::from_text("a\nb\nc");
        assert_eq!(source.page_count(), 1);
        assert_eq!(source.extract_pages().unwrap()[0].lines.len(), 3);
    }

    #[test]
    fn test_invalid_page() {
        let source = TextSource::from_text("a");
        assert!(matches!(source.extract_page_lines(0), Err(SourceError::InvalidPage(0))));
        assert!(matches!(source.extract_page_lines(2), Err(SourceError::InvalidPage(2))));
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let mut source = TextSource::new();
        assert!(matches!(source.load(&[0xff, 0xfe]), Err(SourceError::Parse(_))));
    }
}
