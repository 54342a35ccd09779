//! Record assembly across page boundaries.
//!
//! A record is closed implicitly: it stays open until the next row line
//! arrives or the input ends.

use std::mem;

use tracing::trace;

use super::classifier::{Classification, LineClassifier};
use super::normalizer::normalize;
use crate::error::{MismatchReason, ParseError};
use crate::models::record::{PartialRecord, RawLine, Record};

#[derive(Debug, Default)]
enum AssemblerState {
    #[default]
    Idle,
    Open(PartialRecord),
}

/// Stateful scan that folds classified lines into records.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    classifier: LineClassifier,
    state: AssemblerState,
    output: Vec<Record>,
    continuations: usize,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble with a specific classifier.
    pub fn with_classifier(classifier: LineClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    /// Feed the next line of the trimmed stream.
    pub fn push(&mut self, line: RawLine<'_>) -> Result<(), ParseError> {
        match self.classifier.classify(line.text) {
            Classification::Row(capture) => {
                let record = normalize(capture).map_err(|reason| mismatch(&line, reason))?;
                if let AssemblerState::Open(previous) =
                    mem::replace(&mut self.state, AssemblerState::Open(record))
                {
                    self.output.push(previous.finish());
                }
            }
            Classification::Continuation(text) => match &mut self.state {
                AssemblerState::Open(record) => {
                    trace!("Appending {:?} to {}", text, record.case_number());
                    record.append_address(text);
                    self.continuations += 1;
                }
                AssemblerState::Idle => {
                    return Err(mismatch(&line, MismatchReason::OrphanContinuation));
                }
            },
        }
        Ok(())
    }

    /// Record currently open, if any.
    pub fn current(&self) -> Option<&PartialRecord> {
        match &self.state {
            AssemblerState::Open(record) => Some(record),
            AssemblerState::Idle => None,
        }
    }

    /// Continuation lines merged so far.
    pub fn continuations(&self) -> usize {
        self.continuations
    }

    /// Close the open record and return all records in input order.
    pub fn finish(mut self) -> Vec<Record> {
        if let AssemblerState::Open(record) = mem::take(&mut self.state) {
            self.output.push(record.finish());
        }
        self.output
    }
}

fn mismatch(line: &RawLine<'_>, reason: MismatchReason) -> ParseError {
    ParseError::StructuralMismatch {
        page: line.page,
        line: line.line,
        text: line.text.to_string(),
        reason,
    }
}
