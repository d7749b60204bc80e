//! `log-outline` - print the folded outline of a log file.
//!
//! Lines are grouped into records by a record-start pattern; multi-line records become fold
//! regions that can be collapsed from the command line.

use anyhow::{Context as _, Result};
use clap::Parser;
use log_outline::{
    DEFAULT_RECORD_START, FoldEngine, GuideLine, OutlineMarker, RecordLayout, RecordMatcher,
    SharedCollapsedLines, TextSpan, VisibleRow, guide_lines, visible_guide_lines,
};
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(
    name = "log-outline",
    about = "Print a log file with multi-line records folded.",
    after_help = "Set RUST_LOG=debug to see outline recomputation details."
)]
struct Args {
    /// Log file to read.
    file: PathBuf,
    /// Regular expression matching the first line of each record.
    #[arg(long, env = "LOG_OUTLINE_RECORD_START", default_value = DEFAULT_RECORD_START)]
    record_start: String,
    /// Collapse every multi-line record.
    #[arg(long)]
    collapse_all: bool,
    /// Raw line indices of records that start collapsed (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "LINES")]
    collapsed: Vec<usize>,
    /// Toggle the record whose first or last line is LINE. Can be repeated.
    #[arg(long, value_name = "LINE")]
    toggle: Vec<usize>,
    /// First visible row to print.
    #[arg(long, default_value_t = 0)]
    from: usize,
    /// Number of visible rows to print (all by default).
    #[arg(long)]
    count: Option<usize>,
}

/// Loaded file plus its outline.
struct Viewer<'a> {
    layout: RecordLayout<'a>,
    engine: FoldEngine<SharedCollapsedLines>,
    /// Collapsed-line settings, shared with the engine.
    settings: SharedCollapsedLines,
}

impl<'a> Viewer<'a> {
    fn new(text: &'a str, matcher: &RecordMatcher, collapsed: &[usize]) -> Result<Self> {
        let layout = RecordLayout::build(text, matcher);
        let settings = if collapsed.is_empty() {
            SharedCollapsedLines::new()
        } else {
            SharedCollapsedLines::with_lines(collapsed.iter().copied())
        };
        let engine = FoldEngine::new(layout.line_count(), layout.fold_regions(), settings.clone())
            .context("record layout produced invalid fold regions")?;

        Ok(Self {
            layout,
            engine,
            settings,
        })
    }

    fn apply(&mut self, args: &Args) {
        if args.collapse_all {
            self.engine.collapse_all();
        }
        for &line in &args.toggle {
            if self.engine.toggle(line) {
                continue;
            }
            match self.engine.region_containing(line) {
                Some(region) => log::warn!(
                    "line {line} is inside the record at lines {}..={}; toggle its first or last line",
                    region.start,
                    region.end_line()
                ),
                None => log::warn!("line {line} is not part of a multi-line record"),
            }
        }
    }

    fn write_rows<W: Write>(
        &self,
        out: &mut W,
        from: usize,
        count: Option<usize>,
    ) -> io::Result<()> {
        let total = self.engine.visible_row_count();
        let end = count
            .map_or(total, |count| from.saturating_add(count))
            .min(total);
        let window = from.min(end)..end;

        let guides: Vec<GuideLine> =
            visible_guide_lines(&guide_lines(self.engine.rows()), window.clone()).collect();

        for (index, row) in self.engine.rows()[window.clone()].iter().enumerate() {
            let visual = window.start + index;
            let guide = guides.iter().any(|g| g.covers(visual));
            let text = self.layout.lines()[row.line];
            writeln!(out, "{}", format_row(row, guide, text))?;
        }
        Ok(())
    }
}

fn glyph(marker: OutlineMarker) -> &'static str {
    match marker {
        OutlineMarker::None => "   ",
        OutlineMarker::ExpandedUpper(_) => "[-]",
        OutlineMarker::ExpandedLower(_) => "[_]",
        OutlineMarker::Collapsed(_) => "[+]",
    }
}

fn format_row(row: &VisibleRow, guide: bool, text: TextSpan<'_>) -> String {
    let rule = if guide && !row.marker.is_expander() {
        '│'
    } else {
        ' '
    };
    format!("{} {rule} {:>6}  {text}", glyph(row.marker), row.line + 1)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let matcher = RecordMatcher::new(&args.record_start)?;

    let mut viewer = Viewer::new(&text, &matcher, &args.collapsed)?;
    viewer.apply(&args);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    viewer.write_rows(&mut out, args.from, args.count)?;
    out.flush()?;

    let mut collapsed: Vec<usize> = viewer
        .settings
        .get()
        .unwrap_or_default()
        .into_iter()
        .collect();
    collapsed.sort_unstable();
    log::info!(
        "{} of {} lines visible in {} records; collapsed: {:?}",
        viewer.engine.visible_row_count(),
        viewer.layout.line_count(),
        viewer.layout.records().len(),
        collapsed
    );

    Ok(())
}
