//! Line segmentation.
//!
//! Splits a [`TextSpan`] into non-overlapping line spans in a single forward scan. Line
//! terminators (`'\r'`, `'\n'`, in any run or mixture) never produce spans, so blank lines and
//! `"\r\n"` pairs do not show up as empty lines.
//!
//! ```rust
//! use log_outline::segment_str;
//!
//! let lines: Vec<&str> = segment_str("first\r\nsecond\n\nthird").map(|l| l.as_str()).collect();
//! assert_eq!(lines, ["first", "second", "third"]);
//! ```

use crate::span::TextSpan;
use std::iter::FusedIterator;

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Lazy iterator over the lines of a span. Created by [`segment`].
///
/// The iterator is a pure function of the input span: cloning it, or calling [`segment`] again
/// on the same span, yields the same sequence.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    text: TextSpan<'a>,
    cursor: usize,
    finished: bool,
}

impl<'a> Iterator for Lines<'a> {
    type Item = TextSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let bytes = self.text.as_bytes();
        while self.cursor < bytes.len() {
            let rest = &bytes[self.cursor..];
            match rest.iter().position(|&b| is_terminator(b)) {
                None => {
                    // Last line without a trailing terminator.
                    let line = self.text.slice(self.cursor..bytes.len());
                    self.cursor = bytes.len();
                    self.finished = true;
                    return Some(line);
                }
                Some(0) => {
                    self.cursor += 1;
                }
                Some(k) => {
                    let line = self.text.slice(self.cursor..self.cursor + k);
                    self.cursor += k + 1;
                    return Some(line);
                }
            }
        }

        self.finished = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        // Every line needs at least one byte plus a terminator, except the last.
        let remaining = self.text.len() - self.cursor;
        (0, Some(remaining.div_ceil(2)))
    }
}

impl FusedIterator for Lines<'_> {}

/// Split `text` into lines without copying.
pub fn segment(text: TextSpan<'_>) -> Lines<'_> {
    Lines {
        text,
        cursor: 0,
        finished: false,
    }
}

/// Split a whole string into lines without copying.
pub fn segment_str(text: &str) -> Lines<'_> {
    segment(TextSpan::new(text))
}

/// Returns `true` if `text` holds a single line, ignoring a trailing run of terminators.
///
/// ```rust
/// use log_outline::is_single_line;
///
/// assert!(is_single_line("abc\r\n"));
/// assert!(!is_single_line("abc\ndef"));
/// assert!(is_single_line(""));
/// ```
pub fn is_single_line(text: &str) -> bool {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    !trimmed.bytes().any(is_terminator)
}

impl<'a> TextSpan<'a> {
    /// Lines of this span. See [`segment`].
    pub fn lines(&self) -> Lines<'a> {
        segment(*self)
    }

    /// See [`is_single_line`].
    pub fn is_single_line(&self) -> bool {
        is_single_line(self.as_str())
    }
}
