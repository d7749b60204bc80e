//! Zero-copy text spans.
//!
//! A [`TextSpan`] is an offset/length view into a shared, immutable text buffer. Spans never
//! copy characters; the borrow on the buffer guarantees the buffer outlives every span derived
//! from it.

use crate::error::SpanError;
use std::fmt;
use std::ops::Range;

/// A view into a text buffer, expressed as a byte offset and a byte length.
///
/// Two spans are equal when they view the *same* buffer (pointer identity) at the same
/// `(start, len)`. Spans over different buffers with equal content are not equal; compare
/// [`TextSpan::as_str`] for content equality.
#[derive(Clone, Copy)]
pub struct TextSpan<'a> {
    source: &'a str,
    start: usize,
    len: usize,
}

impl<'a> TextSpan<'a> {
    /// Create a span covering the whole buffer.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            len: source.len(),
        }
    }

    /// Create a span over `range` (byte offsets) of `source`.
    pub fn from_range(source: &'a str, range: Range<usize>) -> Result<Self, SpanError> {
        if range.start > range.end || range.end > source.len() {
            return Err(SpanError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: source.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !source.is_char_boundary(offset) {
                return Err(SpanError::NotCharBoundary(offset));
            }
        }

        Ok(Self {
            source,
            start: range.start,
            len: range.end - range.start,
        })
    }

    /// Sub-span relative to this span. Callers guarantee `relative` is in bounds and on
    /// ASCII boundaries.
    pub(crate) fn slice(&self, relative: Range<usize>) -> Self {
        debug_assert!(relative.start <= relative.end && relative.end <= self.len);
        Self {
            source: self.source,
            start: self.start + relative.start,
            len: relative.end - relative.start,
        }
    }

    /// Byte offset of the first byte within the underlying buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last byte within the underlying buffer.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte range within the underlying buffer.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The underlying buffer.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The viewed text.
    pub fn as_str(&self) -> &'a str {
        &self.source[self.range()]
    }

    pub(crate) fn as_bytes(&self) -> &'a [u8] {
        &self.source.as_bytes()[self.range()]
    }
}

impl<'a> From<&'a str> for TextSpan<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl PartialEq for TextSpan<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source) && self.start == other.start && self.len == other.len
    }
}

impl Eq for TextSpan<'_> {}

impl fmt::Debug for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSpan")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("text", &self.as_str())
            .finish()
    }
}

impl fmt::Display for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
