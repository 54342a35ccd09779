//! Line classification: record-opening row or wrapped continuation.

use tracing::trace;

use super::patterns::INCIDENT_ROW;
use crate::models::record::FieldCapture;

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The line opens a new record.
    Row(FieldCapture),
    /// The line continues the previous record's location.
    /// Carries the text with leading whitespace removed.
    Continuation(&'a str),
}

/// Classifies lines against the incident table row layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier {
    tolerate_trailing_whitespace: bool,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match rows even when the agency code is followed by whitespace.
    pub fn with_trailing_whitespace(mut self, tolerate: bool) -> Self {
        self.tolerate_trailing_whitespace = tolerate;
        self
    }

    pub fn classify<'a>(&self, line: &'a str) -> Classification<'a> {
        let candidate = if self.tolerate_trailing_whitespace {
            line.trim_end()
        } else {
            line
        };

        match INCIDENT_ROW.captures(candidate) {
            Some(caps) => {
                let field = |i: usize| caps[i].trim().to_string();
                let capture = FieldCapture {
                    date: field(1),
                    time: field(2),
                    case_number: field(3),
                    address: field(4),
                    category: field(5),
                    agency_code: field(6),
                };
                trace!("Row {}: {:?}", capture.case_number, line);
                Classification::Row(capture)
            }
            None => {
                trace!("Continuation: {:?}", line);
                Classification::Continuation(line.trim_start())
            }
        }
    }
}
