//! Incident report parsing.
//!
//! Pages flow through the trimmer, each surviving line is classified, and
//! the assembler folds rows and their wrapped continuations into records.

mod assembler;
mod classifier;
mod normalizer;
mod parser;
pub mod patterns;
mod trimmer;

pub use assembler::RecordAssembler;
pub use classifier::{Classification, LineClassifier};
pub use normalizer::{join_date_time, normalize, DATE_TIME_SEPARATOR};
pub use parser::{ExtractionResult, IncidentParser};
pub use trimmer::{trim_plan, PagePosition, PageTrimmer, TrimPlan};

use crate::error::ParseError;
use crate::source::Page;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Trait for report parsers.
pub trait ReportParser {
    /// Parse records from extracted pages.
    fn parse(&self, pages: &[Page]) -> Result<ExtractionResult>;
}
