#![warn(missing_docs)]
//! Log Outline - Line Segmentation and Collapsible Outline Engine
//!
//! # Overview
//!
//! `log-outline` is the headless core of a log viewer. It does not render anything; it turns a
//! text buffer into lines and decides which of those lines are visible once multi-line log
//! records (stack traces, nested blocks) are folded.
//!
//! # Core Features
//!
//! - **Zero-copy Segmentation**: lines are [`TextSpan`] views into the loaded buffer
//! - **Blank-line Free**: runs of `\r` / `\n` never produce empty lines
//! - **Collapsible Outline**: [`FoldEngine`] maps raw lines to visible rows with expander markers
//! - **External Fold State**: collapsed lines are resynchronized from a settings source on every change
//! - **Record Detection**: regex-based grouping of lines into records and fold regions
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Guide Lines (row geometry for renderers)   │  ← Rendering Data
//! ├─────────────────────────────────────────────┤
//! │  Fold Engine (outline state machine)        │  ← Visibility
//! ├─────────────────────────────────────────────┤
//! │  Records (record start detection)           │  ← Fold Regions
//! ├─────────────────────────────────────────────┤
//! │  Line Segmenter (TextSpan)                  │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use log_outline::{FoldEngine, OutlineMarker, SharedCollapsedLines, segment_str};
//!
//! let text = "start\nstack frame 1\nstack frame 2\nend";
//! let line_count = segment_str(text).count();
//!
//! // Settings layer keeps a handle to the collapsed-line set.
//! let settings = SharedCollapsedLines::new();
//! let mut engine = FoldEngine::new(line_count, [(0, 3)], settings.clone()).unwrap();
//!
//! engine.subscribe(|| println!("outline changed"));
//! engine.toggle(0);
//!
//! assert_eq!(engine.visible_row_count(), 2);
//! assert_eq!(engine.row(0).unwrap().marker, OutlineMarker::Collapsed(0));
//! assert!(settings.get().unwrap().contains(&0));
//! ```
//!
//! # Module Description
//!
//! - [`span`] - zero-copy text spans
//! - [`segment`] - line segmentation
//! - [`outline`] - outline markers and visible rows
//! - [`folding`] - collapsible outline engine
//! - [`guide_lines`] - guide lines between expanders
//! - [`records`] - record boundary detection

pub mod error;
pub mod folding;
pub mod guide_lines;
pub mod outline;
pub mod records;
pub mod segment;
pub mod span;

pub use error::{FoldError, RecordError, SpanError};
pub use folding::{
    ChangedCallback, CollapsedLinesSource, FoldEngine, FoldRegion, SharedCollapsedLines,
};
pub use guide_lines::{GuideLine, guide_lines, visible_guide_lines};
pub use outline::{OutlineMarker, VisibleRow};
pub use records::{DEFAULT_RECORD_START, RecordLayout, RecordMatcher};
pub use segment::{Lines, is_single_line, segment, segment_str};
pub use span::TextSpan;
