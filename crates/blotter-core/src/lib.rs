//! Core library for daily incident summary ingestion.
//!
//! This crate provides:
//! - Page text sources (PDF via lopdf/pdf-extract, form-feed separated text)
//! - Incident table parsing (page trimming, row classification, record assembly)
//! - SQLite storage of incident records

pub mod error;
pub mod models;
pub mod report;
pub mod source;
pub mod store;

pub use error::{BlotterError, MismatchReason, ParseError, Result, SourceError, StoreError};
pub use models::config::{BlotterConfig, LayoutConfig};
pub use models::record::{Record, INCIDENT_COLUMNS};
pub use report::{ExtractionResult, IncidentParser, ReportParser};
pub use source::{Page, PageSource, TextSource};
#[cfg(feature = "native")]
pub use source::PdfSource;
pub use store::{IncidentStore, NatureCount};
