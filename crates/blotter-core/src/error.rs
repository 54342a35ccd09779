//! Error types for the blotter-core library.

use thiserror::Error;

/// Main error type for the blotter library.
#[derive(Error, Debug)]
pub enum BlotterError {
    /// Page text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Report parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Record storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into page lines.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Why a line could not be placed into the record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// A continuation line arrived before any record was opened.
    OrphanContinuation,
    /// A captured field was empty after trimming.
    EmptyField(&'static str),
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrphanContinuation => write!(f, "continuation line with no open record"),
            Self::EmptyField(field) => write!(f, "field '{}' is empty", field),
        }
    }
}

/// Errors related to report parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line fits neither the row pattern nor an open record.
    ///
    /// `page` and `line` are zero-based and refer to the untrimmed page, so
    /// they point at the offending line in the extractor's output.
    #[error("structural mismatch at page {page}, line {line} ({reason}): {text:?}")]
    StructuralMismatch {
        page: usize,
        line: usize,
        text: String,
        reason: MismatchReason,
    },
}

/// Errors related to record storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database file could not be prepared.
    #[error("failed to prepare database at {path}: {reason}")]
    Prepare { path: String, reason: String },
}

/// Result type for the blotter library.
pub type Result<T> = std::result::Result<T, BlotterError>;
