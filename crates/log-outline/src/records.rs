//! Log record boundaries.
//!
//! A log record starts on a line matching a "record start" pattern (typically a timestamp)
//! and runs until the next such line. Records spanning several lines (stack traces, dumped
//! payloads) become fold regions.
//!
//! ```rust
//! use log_outline::{FoldEngine, RecordLayout, RecordMatcher};
//!
//! let text = "10:00:00.000 boot\n10:00:01.000 crash\n  at main\n  at start\n10:00:02.000 done\n";
//! let matcher = RecordMatcher::timestamp().unwrap();
//! let layout = RecordLayout::build(text, &matcher);
//!
//! assert_eq!(layout.line_count(), 5);
//! assert_eq!(layout.fold_regions(), vec![(1, 3)]);
//!
//! let engine = FoldEngine::from_regions(layout.line_count(), layout.fold_regions()).unwrap();
//! assert_eq!(engine.visible_row_count(), 5);
//! ```

use crate::error::RecordError;
use crate::segment::segment;
use crate::span::TextSpan;
use regex::Regex;
use std::ops::Range;

/// Default record start: a `HH:MM:SS.mmm` timestamp at the beginning of the line.
pub const DEFAULT_RECORD_START: &str = r"^\d{2}:\d{2}:\d{2}\.\d{3}";

/// Decides which lines start a new record.
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    regex: Regex,
}

impl RecordMatcher {
    /// Compile a record start pattern.
    pub fn new(pattern: &str) -> Result<Self, RecordError> {
        let regex = Regex::new(pattern).map_err(|source| RecordError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Matcher for [`DEFAULT_RECORD_START`].
    pub fn timestamp() -> Result<Self, RecordError> {
        Self::new(DEFAULT_RECORD_START)
    }

    /// Source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns `true` if `line` starts a record.
    pub fn is_record_start(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Lines of a buffer grouped into records.
#[derive(Debug, Clone)]
pub struct RecordLayout<'a> {
    lines: Vec<TextSpan<'a>>,
    /// Line ranges, contiguous and covering every line.
    records: Vec<Range<usize>>,
}

impl<'a> RecordLayout<'a> {
    /// Segment `text` and group its lines by `matcher`.
    ///
    /// Lines before the first record start form a leading record of their own.
    pub fn build(text: impl Into<TextSpan<'a>>, matcher: &RecordMatcher) -> Self {
        let lines: Vec<TextSpan<'a>> = segment(text.into()).collect();
        let mut records = Vec::new();
        let mut current = 0;

        for (idx, line) in lines.iter().enumerate().skip(1) {
            if matcher.is_record_start(line.as_str()) {
                records.push(current..idx);
                current = idx;
            }
        }
        if !lines.is_empty() {
            records.push(current..lines.len());
        }

        log::debug!(
            "grouped {} lines into {} records",
            lines.len(),
            records.len()
        );

        Self { lines, records }
    }

    /// Segmented lines.
    pub fn lines(&self) -> &[TextSpan<'a>] {
        &self.lines
    }

    /// Number of segmented lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line ranges of each record, in order.
    pub fn records(&self) -> &[Range<usize>] {
        &self.records
    }

    /// Index of the record containing `line`.
    pub fn record_for_line(&self, line: usize) -> Option<usize> {
        if line >= self.lines.len() {
            return None;
        }
        Some(self.records.partition_point(|r| r.end <= line))
    }

    /// `(start, length)` fold regions for every record of two or more lines.
    pub fn fold_regions(&self) -> Vec<(usize, usize)> {
        self.records
            .iter()
            .filter(|r| r.len() >= 2)
            .map(|r| (r.start, r.len()))
            .collect()
    }
}
