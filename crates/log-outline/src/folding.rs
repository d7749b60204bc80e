//! Collapsible outline over a sequence of lines.
//!
//! [`FoldEngine`] owns a set of disjoint [`FoldRegion`]s and derives the compacted sequence of
//! [`VisibleRow`]s a renderer should draw. Collapsing a region hides its interior and its last
//! line; only the first line stays visible, marked [`OutlineMarker::Collapsed`].
//!
//! The collapsed state can also live outside the engine. A [`CollapsedLinesSource`] (typically
//! a settings store) is re-read before every change and receives the derived collapsed set
//! afterwards. When the set it reports has changed since the engine last looked, the new set
//! wins over the local flags.
//!
//! # Example
//!
//! ```rust
//! use log_outline::{FoldEngine, OutlineMarker, VisibleRow};
//!
//! let mut engine = FoldEngine::from_regions(6, [(1, 3)]).unwrap();
//! assert_eq!(engine.visible_row_count(), 6);
//!
//! engine.toggle(1);
//! assert_eq!(engine.visible_row_count(), 4);
//! assert_eq!(engine.row(1).unwrap(), VisibleRow::new(OutlineMarker::Collapsed(1), 1));
//! assert_eq!(engine.row(2).unwrap().line, 4);
//! ```

use crate::error::FoldError;
use crate::outline::{OutlineMarker, VisibleRow};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Fold region over consecutive raw lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// First line of the region.
    pub start: usize,
    /// Number of lines covered (at least 2).
    pub length: usize,
    /// Whether folded
    pub is_collapsed: bool,
}

impl FoldRegion {
    /// Create an expanded region of `length` lines starting at `start`.
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            is_collapsed: false,
        }
    }

    /// Last line of the region (inclusive).
    pub fn end_line(&self) -> usize {
        self.start + self.length.saturating_sub(1)
    }

    /// Check if line number is within fold region
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start && line <= self.end_line()
    }

    /// Expand
    pub fn expand(&mut self) {
        self.is_collapsed = false;
    }

    /// Collapse
    pub fn collapse(&mut self) {
        self.is_collapsed = true;
    }

    /// Toggle fold state
    pub fn toggle(&mut self) {
        self.is_collapsed = !self.is_collapsed;
    }
}

/// Authority for which region start lines are collapsed.
///
/// [`FoldEngine`] calls [`collapsed_lines`](Self::collapsed_lines) before every mutation and
/// recomputation. Region flags are reseeded only when the returned set differs from the one
/// seen last time, so a supplier that keeps returning the same set seeds the state once. After
/// each recomputation the engine hands its own view to [`publish`](Self::publish).
pub trait CollapsedLinesSource {
    /// Current authoritative set of collapsed start lines, or `None` if there is no external
    /// state yet.
    fn collapsed_lines(&self) -> Option<HashSet<usize>>;

    /// Receive the engine's collapsed start lines. The default ignores them.
    fn publish(&mut self, _collapsed: &HashSet<usize>) {}
}

/// No external state: the engine's own flags are the only authority.
impl CollapsedLinesSource for () {
    fn collapsed_lines(&self) -> Option<HashSet<usize>> {
        None
    }
}

/// Read-only supplier.
impl<F> CollapsedLinesSource for F
where
    F: Fn() -> Option<HashSet<usize>>,
{
    fn collapsed_lines(&self) -> Option<HashSet<usize>> {
        self()
    }
}

/// Shared, read/write collapsed-line set.
///
/// Clones share the same storage: keep one handle in the settings layer and give another to
/// the engine. Changes made through any handle are picked up at the next recomputation.
#[derive(Debug, Clone, Default)]
pub struct SharedCollapsedLines(Rc<RefCell<Option<HashSet<usize>>>>);

impl SharedCollapsedLines {
    /// Create an empty handle (no external state yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle seeded with `lines`.
    pub fn with_lines(lines: impl IntoIterator<Item = usize>) -> Self {
        Self(Rc::new(RefCell::new(Some(lines.into_iter().collect()))))
    }

    /// Snapshot of the stored set.
    pub fn get(&self) -> Option<HashSet<usize>> {
        self.0.borrow().clone()
    }

    /// Replace the stored set.
    pub fn set(&self, lines: HashSet<usize>) {
        *self.0.borrow_mut() = Some(lines);
    }

    /// Forget the stored set.
    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }
}

impl CollapsedLinesSource for SharedCollapsedLines {
    fn collapsed_lines(&self) -> Option<HashSet<usize>> {
        self.get()
    }

    fn publish(&mut self, collapsed: &HashSet<usize>) {
        self.set(collapsed.clone());
    }
}

/// Observer notified after every recomputation.
pub type ChangedCallback = Box<dyn FnMut()>;

/// State of one side (start or end) of a region boundary at a given line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Absent,
    Expanded,
    Collapsed,
}

/// Collapsible outline state machine.
///
/// Regions are validated once at construction (length at least 2, in bounds, pairwise
/// disjoint). After that only their collapsed flags change.
pub struct FoldEngine<S = ()> {
    line_count: usize,
    /// Sorted by start line.
    regions: Vec<FoldRegion>,
    /// Start line -> region index.
    starts: HashMap<usize, usize>,
    /// End line -> region index.
    ends: HashMap<usize, usize>,
    rows: Vec<VisibleRow>,
    collapsed_lines: HashSet<usize>,
    source: S,
    /// Set last read from `source`.
    synced: Option<HashSet<usize>>,
    callbacks: Vec<ChangedCallback>,
    version: u64,
}

impl FoldEngine<()> {
    /// Create an engine with no external collapsed-line authority. All regions start expanded.
    pub fn from_regions<I>(line_count: usize, regions: I) -> Result<Self, FoldError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        Self::new(line_count, regions, ())
    }
}

impl<S: CollapsedLinesSource> FoldEngine<S> {
    /// Create an engine over `line_count` lines with `(start, length)` regions.
    ///
    /// Initial collapsed flags come from `source`: a region is collapsed if its start line is
    /// in the returned set. With no external state every region starts expanded.
    pub fn new<I>(line_count: usize, regions: I, source: S) -> Result<Self, FoldError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut regions: Vec<FoldRegion> = regions
            .into_iter()
            .map(|(start, length)| FoldRegion::new(start, length))
            .collect();
        validate_regions(&mut regions, line_count)?;

        let synced = source.collapsed_lines();
        let collapsed_lines = synced.clone().unwrap_or_default();
        for region in &mut regions {
            region.is_collapsed = collapsed_lines.contains(&region.start);
        }

        let starts = regions
            .iter()
            .enumerate()
            .map(|(idx, region)| (region.start, idx))
            .collect();
        let ends = regions
            .iter()
            .enumerate()
            .map(|(idx, region)| (region.end_line(), idx))
            .collect();

        let mut engine = Self {
            line_count,
            regions,
            starts,
            ends,
            rows: Vec::with_capacity(line_count),
            collapsed_lines,
            source,
            synced,
            callbacks: Vec::new(),
            version: 0,
        };
        engine.recompute();
        Ok(engine)
    }

    /// Toggle the region whose first or last line is `line`.
    ///
    /// Returns `false` (and changes nothing) when no region boundary sits on `line`.
    pub fn toggle(&mut self, line: usize) -> bool {
        let Some(&idx) = self.starts.get(&line).or_else(|| self.ends.get(&line)) else {
            log::trace!("toggle({line}) matched no fold region");
            return false;
        };

        self.resync();
        self.regions[idx].toggle();
        self.recompute();
        true
    }

    /// Expand every region.
    pub fn expand_all(&mut self) {
        self.resync();
        for region in &mut self.regions {
            region.expand();
        }
        self.recompute();
    }

    /// Collapse every region.
    pub fn collapse_all(&mut self) {
        self.resync();
        for region in &mut self.regions {
            region.collapse();
        }
        self.recompute();
    }

    /// Returns `true` if at least one region is collapsed.
    pub fn has_collapsed_regions(&self) -> bool {
        self.regions.iter().any(|r| r.is_collapsed)
    }

    /// Returns `true` if at least one region is expanded.
    pub fn has_expanded_regions(&self) -> bool {
        self.regions.iter().any(|r| !r.is_collapsed)
    }

    /// Returns `true` if `line` starts a collapsed region, according to the last recomputation.
    pub fn is_collapsed(&self, line: usize) -> bool {
        self.collapsed_lines.contains(&line)
    }

    /// Replace the collapsed state with `lines` (e.g. after settings were reloaded).
    pub fn update_collapsed_lines(&mut self, lines: HashSet<usize>) {
        self.resync();
        for region in &mut self.regions {
            region.is_collapsed = lines.contains(&region.start);
        }
        self.collapsed_lines = lines;
        self.recompute();
    }

    /// Number of visible rows after folding.
    pub fn visible_row_count(&self) -> usize {
        self.rows.len()
    }

    /// Visible row at `index`.
    pub fn row(&self, index: usize) -> Result<VisibleRow, FoldError> {
        self.rows
            .get(index)
            .copied()
            .ok_or(FoldError::RowOutOfBounds {
                index,
                len: self.rows.len(),
            })
    }

    /// All visible rows, in order.
    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    /// Iterate over visible rows.
    pub fn iter(&self) -> std::slice::Iter<'_, VisibleRow> {
        self.rows.iter()
    }

    /// Total number of raw lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Fold regions, sorted by start line.
    pub fn regions(&self) -> &[FoldRegion] {
        &self.regions
    }

    /// Collapsed start lines derived by the last recomputation.
    pub fn collapsed_lines(&self) -> &HashSet<usize> {
        &self.collapsed_lines
    }

    /// Incremented after every recomputation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Visible row showing raw `line`, or `None` if the line is hidden inside a collapsed
    /// region (or out of range).
    pub fn logical_to_visual(&self, line: usize) -> Option<usize> {
        self.rows.binary_search_by_key(&line, |row| row.line).ok()
    }

    /// Region whose line range holds `line`.
    pub fn region_containing(&self, line: usize) -> Option<&FoldRegion> {
        let idx = self.regions.partition_point(|r| r.start <= line);
        let region = self.regions.get(idx.checked_sub(1)?)?;
        region.contains_line(line).then_some(region)
    }

    /// Raw line shown on visible row `row`.
    pub fn visual_to_logical(&self, row: usize) -> Option<usize> {
        self.rows.get(row).map(|row| row.line)
    }

    /// Register an observer called after every recomputation.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn collapsed_starts(&self) -> HashSet<usize> {
        self.regions
            .iter()
            .filter(|r| r.is_collapsed)
            .map(|r| r.start)
            .collect()
    }

    fn boundary(&self, lookup: &HashMap<usize, usize>, line: usize) -> (Boundary, usize) {
        match lookup.get(&line) {
            None => (Boundary::Absent, 0),
            Some(&idx) if self.regions[idx].is_collapsed => (Boundary::Collapsed, idx),
            Some(&idx) => (Boundary::Expanded, idx),
        }
    }

    /// Reseed region flags if the source reports a set it has not reported before.
    fn resync(&mut self) {
        let current = self.source.collapsed_lines();
        if current == self.synced {
            return;
        }
        self.synced = current.clone();

        if let Some(lines) = current {
            log::trace!("resyncing {} collapsed lines from source", lines.len());
            for region in &mut self.regions {
                region.is_collapsed = lines.contains(&region.start);
            }
            self.collapsed_lines = lines;
        }
    }

    fn recompute(&mut self) {
        self.resync();

        let mut rows = Vec::with_capacity(self.line_count);
        let mut line = 0;
        while line < self.line_count {
            let (start, start_idx) = self.boundary(&self.starts, line);
            let (end, _) = self.boundary(&self.ends, line);

            let marker = match (start, end) {
                (Boundary::Absent, Boundary::Absent) => OutlineMarker::None,
                (Boundary::Expanded, Boundary::Absent) => OutlineMarker::ExpandedUpper(line),
                (Boundary::Absent, Boundary::Expanded) => OutlineMarker::ExpandedLower(line),
                (Boundary::Collapsed, Boundary::Absent) => OutlineMarker::Collapsed(line),
                (start, end) => unreachable!(
                    "invalid outline at line {line}: start boundary {start:?}, end boundary {end:?}"
                ),
            };

            rows.push(VisibleRow::new(marker, line));
            line += match marker {
                OutlineMarker::Collapsed(_) => self.regions[start_idx].length,
                _ => 1,
            };
        }

        self.rows = rows;
        self.collapsed_lines = self.collapsed_starts();
        self.source.publish(&self.collapsed_lines);
        self.synced = self.source.collapsed_lines();
        self.version += 1;

        log::debug!(
            "outline recomputed: {} of {} lines visible, {} collapsed regions",
            self.rows.len(),
            self.line_count,
            self.collapsed_lines.len()
        );

        for callback in &mut self.callbacks {
            callback();
        }
    }
}

impl<'a, S> IntoIterator for &'a FoldEngine<S> {
    type Item = &'a VisibleRow;
    type IntoIter = std::slice::Iter<'a, VisibleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Sort `regions` by start line and check lengths, bounds and disjointness.
fn validate_regions(regions: &mut [FoldRegion], line_count: usize) -> Result<(), FoldError> {
    regions.sort_by_key(|r| r.start);

    for region in regions.iter() {
        if region.length < 2 {
            return Err(FoldError::RegionTooShort {
                start: region.start,
                length: region.length,
            });
        }
        if region
            .start
            .checked_add(region.length)
            .is_none_or(|end| end > line_count)
        {
            return Err(FoldError::RegionOutOfBounds {
                start: region.start,
                length: region.length,
                line_count,
            });
        }
    }

    for pair in regions.windows(2) {
        if pair[0].end_line() >= pair[1].start {
            return Err(FoldError::OverlappingRegions {
                first: pair[0].start,
                second: pair[1].start,
            });
        }
    }

    Ok(())
}
