//! Error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when building text spans.
pub enum SpanError {
    #[error("span {start}..{end} is out of bounds for a buffer of {len} bytes")]
    /// The requested range extends past the end of the buffer.
    OutOfBounds {
        /// Requested start offset.
        start: usize,
        /// Requested end offset (exclusive).
        end: usize,
        /// Buffer length in bytes.
        len: usize,
    },

    #[error("offset {0} is not on a UTF-8 character boundary")]
    /// One of the range ends splits a multi-byte character.
    NotCharBoundary(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by [`FoldEngine`](crate::FoldEngine).
pub enum FoldError {
    #[error("fold region starting at line {start} has length {length}; at least 2 lines are required")]
    /// A region covers fewer than two lines.
    RegionTooShort {
        /// First line of the region.
        start: usize,
        /// Region length in lines.
        length: usize,
    },

    #[error("fold region {start}+{length} exceeds the line count {line_count}")]
    /// A region reaches past the last line.
    RegionOutOfBounds {
        /// First line of the region.
        start: usize,
        /// Region length in lines.
        length: usize,
        /// Total line count of the outline.
        line_count: usize,
    },

    #[error("fold regions starting at lines {first} and {second} overlap")]
    /// Two regions share at least one line.
    OverlappingRegions {
        /// Start line of the earlier region.
        first: usize,
        /// Start line of the later region.
        second: usize,
    },

    #[error("visible row {index} is out of bounds (visible row count is {len})")]
    /// A visible row index past [`FoldEngine::visible_row_count`](crate::FoldEngine::visible_row_count).
    RowOutOfBounds {
        /// Requested row.
        index: usize,
        /// Current visible row count.
        len: usize,
    },
}

#[derive(Debug, Error)]
/// Errors produced while configuring record detection.
pub enum RecordError {
    #[error("invalid record start pattern '{pattern}': {source}")]
    /// The record start pattern failed to compile.
    InvalidPattern {
        /// The pattern string.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },
}
