//! Outline markers attached to visible rows.

/// How a visible row relates to a fold region boundary.
///
/// The activatable variants carry the raw line index that should be passed to
/// [`FoldEngine::toggle`](crate::FoldEngine::toggle) when the user clicks the expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineMarker {
    /// Plain row, not on a region boundary.
    None,
    /// First line of an expanded region.
    ExpandedUpper(usize),
    /// Last line of an expanded region.
    ExpandedLower(usize),
    /// First line of a collapsed region, standing in for the whole region.
    Collapsed(usize),
}

impl OutlineMarker {
    /// Line to toggle when this marker is activated, or `None` for plain rows.
    pub fn toggle_target(&self) -> Option<usize> {
        match *self {
            Self::None => None,
            Self::ExpandedUpper(line) | Self::ExpandedLower(line) | Self::Collapsed(line) => {
                Some(line)
            }
        }
    }

    /// Returns `true` for markers that render an expander.
    pub fn is_expander(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One entry of the post-fold row sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleRow {
    /// Boundary marker for the row.
    pub marker: OutlineMarker,
    /// Raw line index displayed on this row.
    pub line: usize,
}

impl VisibleRow {
    /// Create a row showing `line` with `marker`.
    pub fn new(marker: OutlineMarker, line: usize) -> Self {
        Self { marker, line }
    }
}

impl From<(OutlineMarker, usize)> for VisibleRow {
    fn from((marker, line): (OutlineMarker, usize)) -> Self {
        Self::new(marker, line)
    }
}
