//! Guide lines joining the two expanders of an expanded region.
//!
//! Renderers draw a vertical line from the `ExpandedUpper` row down to the `ExpandedLower` row.
//! Positions here are visible-row indices; converting them to pixels is the renderer's job.

use crate::outline::{OutlineMarker, VisibleRow};
use std::ops::Range;

/// Vertical guide line between two visible rows (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuideLine {
    /// Row of the `ExpandedUpper` marker.
    pub top: usize,
    /// Row of the `ExpandedLower` marker.
    pub bottom: usize,
}

impl GuideLine {
    /// Returns `true` if the line touches any row in `window`.
    pub fn intersects(&self, window: &Range<usize>) -> bool {
        !window.is_empty() && self.top < window.end && self.bottom >= window.start
    }

    /// Portion of the line inside `window`, or `None` if it lies outside.
    pub fn clip(&self, window: &Range<usize>) -> Option<GuideLine> {
        if !self.intersects(window) {
            return None;
        }
        Some(GuideLine {
            top: self.top.max(window.start),
            bottom: self.bottom.min(window.end.saturating_sub(1)),
        })
    }

    /// Returns `true` if `row` is covered by the line.
    pub fn covers(&self, row: usize) -> bool {
        self.top <= row && row <= self.bottom
    }
}

/// One guide line per expanded region in `rows`.
///
/// Regions are disjoint, so each `ExpandedUpper` is closed by the next `ExpandedLower`.
pub fn guide_lines(rows: &[VisibleRow]) -> Vec<GuideLine> {
    let mut lines = Vec::new();
    let mut open = None;

    for (row, visible) in rows.iter().enumerate() {
        match visible.marker {
            OutlineMarker::ExpandedUpper(_) => open = Some(row),
            OutlineMarker::ExpandedLower(_) => {
                if let Some(top) = open.take() {
                    lines.push(GuideLine { top, bottom: row });
                }
            }
            OutlineMarker::None | OutlineMarker::Collapsed(_) => {}
        }
    }

    lines
}

/// Guide lines touching `window`, clipped to it.
pub fn visible_guide_lines<'a>(
    lines: &'a [GuideLine],
    window: Range<usize>,
) -> impl Iterator<Item = GuideLine> + 'a {
    lines.iter().filter_map(move |line| line.clip(&window))
}
