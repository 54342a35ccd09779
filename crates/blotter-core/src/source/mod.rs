//! Page text sources.
//!
//! A source turns a report document into per-page lines of text with the
//! table's column alignment preserved.

#[cfg(feature = "native")]
mod pdf;
mod text;

#[cfg(feature = "native")]
pub use pdf::PdfSource;
pub use text::TextSource;

use crate::error::SourceError;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Lines of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Page number (1-indexed).
    pub number: u32,
    /// Lines in reading order, without line terminators.
    pub lines: Vec<String>,
}

impl Page {
    pub fn new(number: u32, lines: Vec<String>) -> Self {
        Self { number, lines }
    }

    /// Split page text into lines.
    pub fn from_text(number: u32, text: &str) -> Self {
        Self::new(number, text.lines().map(str::to_string).collect())
    }
}

/// Trait for page text sources.
pub trait PageSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Lines of a specific page (1-indexed).
    fn extract_page_lines(&self, page: u32) -> Result<Vec<String>>;

    /// All pages in order.
    fn extract_pages(&self) -> Result<Vec<Page>> {
        (1..=self.page_count())
            .map(|number| Ok(Page::new(number, self.extract_page_lines(number)?)))
            .collect()
    }
}

/// Pick a source from a file extension: `pdf` gets the PDF source,
/// anything else is read as form-feed separated text.
pub fn source_for_extension(extension: &str) -> Box<dyn PageSource> {
    match extension.to_lowercase().as_str() {
        #[cfg(feature = "native")]
        "pdf" => Box::new(PdfSource::new()),
        _ => Box::new(TextSource::new()),
    }
}
