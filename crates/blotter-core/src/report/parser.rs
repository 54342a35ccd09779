//! Incident report parser: trims pages and assembles records.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::assembler::RecordAssembler;
use super::classifier::LineClassifier;
use super::trimmer::PageTrimmer;
use super::{ReportParser, Result};
use crate::models::config::LayoutConfig;
use crate::models::record::{RawLine, Record};
use crate::source::{Page, PageSource};

/// Result of parsing one report.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Records in input order.
    pub records: Vec<Record>,
    /// Pages read from the source.
    pub pages: usize,
    /// Lines removed as header or footer.
    pub lines_trimmed: usize,
    /// Whitespace-only lines ignored.
    pub blank_lines_skipped: usize,
    /// Continuation lines merged into a record's location.
    pub continuations: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
    /// When the report was parsed.
    pub parsed_at: DateTime<Utc>,
}

/// Parser for the daily incident summary table.
#[derive(Debug, Clone, Default)]
pub struct IncidentParser {
    layout: LayoutConfig,
}

impl IncidentParser {
    /// Create a parser with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific layout.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the number of header lines on the first page.
    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.layout.header_lines = lines;
        self
    }

    /// Set the number of footer lines on the last page.
    pub fn with_footer_lines(mut self, lines: usize) -> Self {
        self.layout.footer_lines = lines;
        self
    }

    /// Set whether a single-page report loses its footer.
    pub fn with_single_page_footer_trim(mut self, trim: bool) -> Self {
        self.layout.trim_single_page_footer = trim;
        self
    }

    /// Set whether whitespace-only lines are dropped before trimming.
    pub fn with_blank_line_skip(mut self, skip: bool) -> Self {
        self.layout.skip_blank_lines = skip;
        self
    }

    /// Set whether rows may end in trailing whitespace.
    pub fn with_trailing_whitespace(mut self, tolerate: bool) -> Self {
        self.layout.tolerate_trailing_whitespace = tolerate;
        self
    }

    /// Extract every page from `source` and parse it.
    pub fn parse_source(&self, source: &dyn PageSource) -> crate::Result<ExtractionResult> {
        let pages = source.extract_pages()?;
        Ok(self.parse(&pages)?)
    }
}

impl ReportParser for IncidentParser {
    fn parse(&self, pages: &[Page]) -> Result<ExtractionResult> {
        let start = Instant::now();
        let trimmer = PageTrimmer::new(self.layout.clone());
        let classifier = LineClassifier::new()
            .with_trailing_whitespace(self.layout.tolerate_trailing_whitespace);
        let mut assembler = RecordAssembler::with_classifier(classifier);
        let mut lines_trimmed = 0;
        let mut blank_lines_skipped = 0;

        for (page_index, page) in pages.iter().enumerate() {
            let candidates: Vec<RawLine<'_>> = page
                .lines
                .iter()
                .enumerate()
                .map(|(line_index, text)| RawLine::new(page_index, line_index, text))
                .filter(|line| !(self.layout.skip_blank_lines && line.text.trim().is_empty()))
                .collect();
            blank_lines_skipped += page.lines.len() - candidates.len();

            if candidates.is_empty() {
                warn!("Page {} has no text lines", page.number);
                continue;
            }

            let plan = trimmer.plan(page_index, pages.len());
            lines_trimmed += plan.dropped(candidates.len());

            for line in plan.apply(&candidates) {
                assembler.push(*line)?;
            }
        }

        let continuations = assembler.continuations();
        let records = assembler.finish();
        let processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Parsed {} pages: {} records, {} continuations, {} trimmed, {} blank",
            pages.len(),
            records.len(),
            continuations,
            lines_trimmed,
            blank_lines_skipped
        );
        info!("Extracted {} incident records", records.len());

        Ok(ExtractionResult {
            records,
            pages: pages.len(),
            lines_trimmed,
            blank_lines_skipped,
            continuations,
            processing_time_ms,
            parsed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MismatchReason, ParseError};
    use crate::source::TextSource;
    use pretty_assertions::assert_eq;

    const TITLE: &str = "NORMAN POLICE DEPARTMENT";
    const SUBTITLE: &str = "Daily Incident Summary (Public)";
    const COLUMNS: &str = "Date / Time    Incident Number    Location    Nature    Incident ORI";
    const FOOTER: &str = "8/2/2024 6:00:12 AM";

    fn row(time: &str, number: &str, address: &str, nature: &str) -> String {
        format!("8/1/2024  {time}    2024-{number}    {address}    {nature}    OK0140200")
    }

    fn page(number: u32, lines: &[&str]) -> Page {
        Page::new(number, lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_single_line_scenario() {
        let pages = vec![page(
            1,
            &[
                TITLE,
                SUBTITLE,
                COLUMNS,
                "8/1/2024  1:19    2024-00055436    123 MAIN ST    TRAFFIC STOP    OK0140200",
            ],
        )];

        let result = IncidentParser::new().parse(&pages).unwrap();

        assert_eq!(
            result.records,
            vec![Record {
                date_time: "8/1/2024 / 1:19".to_string(),
                case_number: "2024-00055436".to_string(),
                address: "123 MAIN ST".to_string(),
                category: "TRAFFIC STOP".to_string(),
                agency_code: "OK0140200".to_string(),
            }]
        );
        assert_eq!(result.lines_trimmed, 3);
    }

    #[test]
    fn test_header_and_footer_trimming() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let r2 = row("1:25", "00000002", "1 W MAIN ST", "ALARM");
        let r3 = row("2:40", "00000003", "200 S PORTER AVE", "CHEST PAIN");
        let r4 = row("3:05", "00000004", "2100 W LINDSEY ST", "LARCENY");

        let pages = vec![
            page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, &r2]),
            page(2, &[&r3, &r4, FOOTER]),
        ];

        let result = IncidentParser::new().parse(&pages).unwrap();
        let numbers: Vec<&str> = result.records.iter().map(|r| r.case_number.as_str()).collect();

        assert_eq!(
            numbers,
            vec!["2024-00000001", "2024-00000002", "2024-00000003", "2024-00000004"]
        );
        assert_eq!(result.lines_trimmed, 4);
        assert!(result.records.iter().all(|r| !r.address.contains("AM")));
    }

    #[test]
    fn test_continuation_across_page_break() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let r2 = row("1:25", "00000002", "1301 W LINDSEY ST", "ALARM");
        let r3 = row("2:40", "00000003", "200 S PORTER AVE", "CHEST PAIN");

        let pages = vec![
            page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, &r2]),
            page(2, &["        UNIT 12", &r3]),
            page(3, &["        APT 4B", FOOTER]),
        ];

        let result = IncidentParser::new().parse(&pages).unwrap();

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[1].address, "1301 W LINDSEY ST UNIT 12");
        assert_eq!(result.records[2].address, "200 S PORTER AVE APT 4B");
        assert_eq!(result.continuations, 2);
    }

    #[test]
    fn test_every_field_non_empty() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let r2 = row("1:25", "00000002", "1 W MAIN ST", "911 CALL NATURE UNKNOWN");
        let pages = vec![page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, "  REAR", &r2])];

        let result = IncidentParser::new().parse(&pages).unwrap();

        assert_eq!(result.records.len(), 2);
        for record in &result.records {
            assert!(record.as_row().iter().all(|field| !field.trim().is_empty()));
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let pages = vec![
            page(1, &[TITLE, SUBTITLE, COLUMNS, &r1]),
            page(2, &["  APT 4B", FOOTER]),
        ];

        let parser = IncidentParser::new();
        let first = parser.parse(&pages).unwrap();
        let second = parser.parse(&pages).unwrap();

        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_single_page_footer_without_records() {
        let pages = vec![page(1, &[TITLE, SUBTITLE, COLUMNS, FOOTER])];

        let err = IncidentParser::new().parse(&pages).unwrap_err();

        assert_eq!(
            err,
            ParseError::StructuralMismatch {
                page: 0,
                line: 3,
                text: FOOTER.to_string(),
                reason: MismatchReason::OrphanContinuation,
            }
        );
    }

    #[test]
    fn test_single_page_footer_policy() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let pages = vec![page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, FOOTER])];

        let kept = IncidentParser::new().parse(&pages).unwrap();
        assert_eq!(kept.records[0].address, format!("123 MAIN ST {}", FOOTER));

        let trimmed = IncidentParser::new()
            .with_single_page_footer_trim(true)
            .parse(&pages)
            .unwrap();
        assert_eq!(trimmed.records[0].address, "123 MAIN ST");
    }

    #[test]
    fn test_blank_line_in_header_is_mismatch() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let pages = vec![page(1, &[TITLE, "", SUBTITLE, COLUMNS, &r1])];

        let err = IncidentParser::new().parse(&pages).unwrap_err();

        assert_eq!(
            err,
            ParseError::StructuralMismatch {
                page: 0,
                line: 3,
                text: COLUMNS.to_string(),
                reason: MismatchReason::OrphanContinuation,
            }
        );
    }

    #[test]
    fn test_blank_line_is_continuation() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let pages = vec![page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, ""])];

        let result = IncidentParser::new().parse(&pages).unwrap();

        assert_eq!(result.records[0].address, "123 MAIN ST ");
        assert_eq!(result.continuations, 1);
    }

    #[test]
    fn test_blank_line_skip_keeps_header_count() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let pages = vec![page(1, &["", TITLE, "", SUBTITLE, COLUMNS, "   ", &r1])];

        let result = IncidentParser::new()
            .with_blank_line_skip(true)
            .parse(&pages)
            .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].address, "123 MAIN ST");
        assert_eq!(result.blank_lines_skipped, 3);
    }

    #[test]
    fn test_mismatch_reports_untrimmed_position() {
        let pages = vec![
            page(1, &[TITLE, SUBTITLE, COLUMNS]),
            page(2, &["", "  STRAY TEXT", FOOTER]),
        ];

        let err = IncidentParser::new()
            .with_blank_line_skip(true)
            .parse(&pages)
            .unwrap_err();

        assert!(matches!(
            err,
            ParseError::StructuralMismatch { page: 1, line: 1, .. }
        ));
    }

    #[test]
    fn test_trailing_whitespace_policy() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let r2 = format!("{}   ", row("1:25", "00000002", "1 W MAIN ST", "ALARM"));
        let pages = vec![page(1, &[TITLE, SUBTITLE, COLUMNS, &r1, &r2])];

        let strict = IncidentParser::new().parse(&pages).unwrap();
        assert_eq!(strict.records.len(), 1);
        assert!(strict.records[0].address.starts_with("123 MAIN ST 8/1/2024"));

        let tolerant = IncidentParser::new()
            .with_trailing_whitespace(true)
            .parse(&pages)
            .unwrap();
        assert_eq!(tolerant.records.len(), 2);
        assert_eq!(tolerant.records[1].agency_code, "OK0140200");
    }

    #[test]
    fn test_empty_input() {
        let result = IncidentParser::new().parse(&[]).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.pages, 0);

        let header_only = vec![page(1, &[TITLE, SUBTITLE, COLUMNS])];
        assert!(IncidentParser::new().parse(&header_only).unwrap().records.is_empty());
    }

    #[test]
    fn test_parse_text_source() {
        let r1 = row("1:19", "00000001", "123 MAIN ST", "TRAFFIC STOP");
        let r2 = row("1:25", "00000002", "1 W MAIN ST", "ALARM");
        let text = format!("{TITLE}\n{SUBTITLE}\n{COLUMNS}\n{r1}\n\x0c{r2}\n{FOOTER}\n\x0c");

        let source = TextSource::from_text(&text);
        let result = IncidentParser::new().parse_source(&source).unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.records.len(), 2);
    }
}
