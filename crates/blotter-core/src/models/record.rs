//! Incident record models.

use serde::{Deserialize, Serialize};

/// Column names of the `incidents` table, in record field order.
pub const INCIDENT_COLUMNS: [&str; 5] = [
    "incident_time",
    "incident_number",
    "incident_location",
    "nature",
    "incident_ori",
];

/// One line of extracted page text, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Zero-based page index.
    pub page: usize,
    /// Zero-based line index within the untrimmed page.
    pub line: usize,
    /// Line text as produced by the page source.
    pub text: &'a str,
}

impl<'a> RawLine<'a> {
    pub fn new(page: usize, line: usize, text: &'a str) -> Self {
        Self { page, line, text }
    }
}

/// The six raw fields captured from a record-opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCapture {
    pub date: String,
    pub time: String,
    pub case_number: String,
    pub address: String,
    pub category: String,
    pub agency_code: String,
}

/// A record still accepting wrapped address lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    date_time: String,
    case_number: String,
    address: String,
    category: String,
    agency_code: String,
}

impl PartialRecord {
    pub(crate) fn new(
        date_time: String,
        case_number: String,
        address: String,
        category: String,
        agency_code: String,
    ) -> Self {
        Self {
            date_time,
            case_number,
            address,
            category,
            agency_code,
        }
    }

    /// Address assembled so far.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Case number of the record being assembled.
    pub fn case_number(&self) -> &str {
        &self.case_number
    }

    /// Append a wrapped address line, separated by a single space.
    pub fn append_address(&mut self, text: &str) {
        self.address.push(' ');
        self.address.push_str(text);
    }

    /// Freeze into a finished record.
    pub fn finish(self) -> Record {
        Record {
            date_time: self.date_time,
            case_number: self.case_number,
            address: self.address,
            category: self.category,
            agency_code: self.agency_code,
        }
    }
}

/// A finished incident entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Date and time joined as `"<date> / <time>"`.
    pub date_time: String,

    /// Incident (case) number, e.g. `2024-00055436`.
    pub case_number: String,

    /// Location, possibly assembled from several wrapped lines.
    pub address: String,

    /// Incident nature/category.
    pub category: String,

    /// Originating agency identifier (ORI).
    pub agency_code: String,
}

impl Record {
    /// Fields in `incidents` column order.
    pub fn as_row(&self) -> [&str; 5] {
        [
            &self.date_time,
            &self.case_number,
            &self.address,
            &self.category,
            &self.agency_code,
        ]
    }
}
