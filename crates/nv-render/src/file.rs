//! File renderer — lines in order, each with its optional number prefix.
//!
//! Lines are rendered strictly top to bottom. Line `i + 1` does not start
//! until line `i` has been closed, terminated, and flushed by the sink.

use std::io;

use nv_term::Sink;
use nv_term::ansi;

use crate::line::{LineStats, render_line};
use crate::options::RenderOptions;
use crate::resolve::HighlightResolver;

// ---------------------------------------------------------------------------
// RenderStats
// ---------------------------------------------------------------------------

/// Totals over a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Lines written.
    pub lines: usize,
    /// Units emitted across all lines.
    pub units: usize,
    /// Resolver calls made.
    pub queries: usize,
    /// Resolver calls that failed and degraded a unit to plain text.
    pub failures: usize,
}

impl RenderStats {
    fn add(&mut self, line: &LineStats) {
        self.lines += 1;
        self.units += line.units;
        self.queries += line.queries;
        self.failures += line.failures;
    }
}

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

/// Decimal digits needed to print `n`. Zero still takes one digit.
#[must_use]
pub const fn digit_count(n: usize) -> usize {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Dim, zero-padded, 1-based line number plus one space, closed with its
/// own reset so the gutter style never touches the content.
fn write_prefix(sink: &mut impl Sink, number: usize, width: usize) -> io::Result<()> {
    sink.control(ansi::DIM)?;
    sink.text(&format!("{number:0width$} "))?;
    sink.control(ansi::RESET)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render every line of a file into `sink`.
///
/// A line whose queries failed is still written in full (degraded units
/// appear as plain text) and is reported once at debug level.
///
/// # Errors
///
/// Only sink errors, e.g. a closed stdout.
pub fn render_file(
    lines: &[&str],
    options: &RenderOptions,
    resolver: &mut impl HighlightResolver,
    sink: &mut impl Sink,
) -> io::Result<RenderStats> {
    let width = digit_count(lines.len());
    let mut stats = RenderStats::default();

    for (row, text) in lines.iter().enumerate() {
        if options.line_numbers {
            write_prefix(sink, row + 1, width)?;
        }
        let line = render_line(row, text, options, resolver, sink)?;
        sink.end_line()?;

        if let Some(failure) = &line.first_failure {
            log::debug!(
                "line {}: {} of {} queries failed, rendered plain ({failure})",
                row + 1,
                line.failures,
                line.queries,
            );
        }
        stats.add(&line);
    }

    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TabExpansion;
    use crate::resolve::{QueryFailure, RawAttributes};
    use crate::segment::Granularity;
    use nv_term::{CaptureSink, SinkEvent};
    use pretty_assertions::assert_eq;

    fn scripted<F>(f: F) -> F
    where
        F: FnMut(usize, usize) -> Result<RawAttributes, QueryFailure>,
    {
        f
    }

    fn numbered(tab: usize) -> RenderOptions {
        RenderOptions {
            line_numbers: true,
            granularity: Granularity::Word,
            tab: TabExpansion::new(tab),
        }
    }

    fn render(lines: &[&str], options: &RenderOptions) -> (CaptureSink, RenderStats) {
        let mut resolver = scripted(|_, _| Ok(RawAttributes::default()));
        let mut sink = CaptureSink::new();
        let stats = render_file(lines, options, &mut resolver, &mut sink).unwrap();
        (sink, stats)
    }

    // -- digit_count -------------------------------------------------------

    #[test]
    fn digit_counts() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(7), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(999), 3);
        assert_eq!(digit_count(1000), 4);
    }

    // -- Numbering ---------------------------------------------------------

    #[test]
    fn numbered_scenario_with_tab() {
        let lines = ["func f() {", "\tx := 1", "}"];
        let (sink, stats) = render(&lines, &numbered(4));
        assert_eq!(sink.plain_text(), "1 func f() {\n2     x := 1\n3 }\n");
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn prefix_is_dim_and_closed() {
        let (sink, _) = render(&["x"], &numbered(4));
        assert_eq!(sink.output(), "\x1b[2m1 \x1b[0mx\n");
    }

    #[test]
    fn prefix_is_zero_padded_to_total_width() {
        let lines = vec![""; 1000];
        let (sink, _) = render(&lines, &numbered(4));
        let text = sink.plain_text();
        let mut rows = text.lines();
        assert_eq!(rows.next(), Some("0001 "));
        assert_eq!(rows.nth(8), Some("0010 "));
        assert_eq!(rows.last(), Some("1000 "));
    }

    #[test]
    fn numbering_off_has_no_prefix() {
        let options = RenderOptions::default();
        let (sink, _) = render(&["a", "b"], &options);
        assert_eq!(sink.output(), "a\nb\n");
    }

    // -- Lines -------------------------------------------------------------

    #[test]
    fn empty_line_is_prefix_and_terminator() {
        let (sink, stats) = render(&[""], &numbered(4));
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::Control("\x1b[2m".into()),
                SinkEvent::Text("1 ".into()),
                SinkEvent::Control("\x1b[0m".into()),
                SinkEvent::EndLine,
            ]
        );
        assert_eq!(stats.queries, 0);
    }

    #[test]
    fn empty_file_writes_nothing() {
        let (sink, stats) = render(&[], &numbered(4));
        assert!(sink.events().is_empty());
        assert_eq!(stats, RenderStats::default());
    }

    #[test]
    fn rows_are_passed_in_order() {
        let mut rows = Vec::new();
        let mut resolver = scripted(|row, _| {
            rows.push(row);
            Ok(RawAttributes::default())
        });
        let mut sink = CaptureSink::new();
        render_file(&["a", "b", "c"], &numbered(4), &mut resolver, &mut sink).unwrap();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn stats_aggregate_lines() {
        let mut resolver = scripted(|row, col| {
            if row == 1 {
                Err(QueryFailure::new(row, col, "timeout"))
            } else {
                Ok(RawAttributes::default())
            }
        });
        let mut sink = CaptureSink::new();
        let stats = render_file(
            &["a b", "c d", "\t"],
            &numbered(2),
            &mut resolver,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            stats,
            RenderStats {
                lines: 3,
                units: 7,
                queries: 6,
                failures: 3,
            }
        );
        assert_eq!(sink.plain_text(), "1 a b\n2 c d\n3   \n");
    }
}
