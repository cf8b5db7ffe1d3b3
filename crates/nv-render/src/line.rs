//! Line renderer — one line of source in, styled units out.
//!
//! For each unit, left to right:
//!
//! - **Tab** → the literal tab expansion. Never queried.
//! - **Text** → one resolver query at the unit's first column. On success
//!   the attributes are mapped to a [`Style`], diffed against the open
//!   style, and the codes (if any) go out before the text. On failure the
//!   open style is closed and the text goes out plain.
//!
//! After the last unit, an open non-default style gets one trailing reset
//! so nothing bleeds into the next line.
//!
//! The open style is a local `Option<Style>`. It starts as `None` on every
//! call and is dropped on return; no state crosses a line boundary.

use std::io;

use nv_term::Sink;
use nv_term::encode::{close, encode};
use nv_term::style::Style;

use crate::highlight::map_attributes;
use crate::options::RenderOptions;
use crate::resolve::{HighlightResolver, QueryFailure};
use crate::segment::{UnitKind, segment};

/// What happened while rendering one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Units emitted, tabs included.
    pub units: usize,
    /// Resolver calls made.
    pub queries: usize,
    /// Resolver calls that failed.
    pub failures: usize,
    /// The first failure on the line, kept for the diagnostic.
    pub first_failure: Option<QueryFailure>,
}

impl LineStats {
    /// Whether any unit on the line fell back to plain text.
    #[inline]
    #[must_use]
    pub const fn degraded(&self) -> bool {
        self.failures > 0
    }
}

/// Render `text` (0-based line `row`) into `sink`.
///
/// Writes neither the line-number prefix nor the line terminator; the
/// file renderer owns both.
///
/// # Errors
///
/// Only sink errors. Query failures are absorbed and counted in the
/// returned [`LineStats`].
pub fn render_line(
    row: usize,
    text: &str,
    options: &RenderOptions,
    resolver: &mut impl HighlightResolver,
    sink: &mut impl Sink,
) -> io::Result<LineStats> {
    let mut stats = LineStats::default();
    let mut open: Option<Style> = None;

    for unit in segment(text, options.granularity) {
        stats.units += 1;

        if unit.kind == UnitKind::Tab {
            let expansion = options.tab.as_str();
            if !expansion.is_empty() {
                sink.text(expansion)?;
            }
            continue;
        }

        stats.queries += 1;
        match resolver.resolve(row, unit.column) {
            Ok(raw) => {
                let style = map_attributes(&raw);
                let codes = encode(open, style);
                if !codes.is_empty() {
                    sink.control(&codes)?;
                }
                sink.text(unit.text)?;
                open = Some(style);
            }
            Err(failure) => {
                stats.failures += 1;
                stats.first_failure.get_or_insert(failure);
                let reset = close(open);
                if !reset.is_empty() {
                    sink.control(reset)?;
                }
                sink.text(unit.text)?;
                open = None;
            }
        }
    }

    let reset = close(open);
    if !reset.is_empty() {
        sink.control(reset)?;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TabExpansion;
    use crate::resolve::RawAttributes;
    use crate::segment::Granularity;
    use nv_term::CaptureSink;
    use nv_term::ansi::RESET;
    use pretty_assertions::assert_eq;

    const RED: &str = "\x1b[38;2;255;0;0m";
    const GREEN: &str = "\x1b[38;2;0;255;0m";
    const BLUE: &str = "\x1b[38;2;0;0;255m";
    const BOLD: &str = "\x1b[1m";

    fn scripted<F>(f: F) -> F
    where
        F: FnMut(usize, usize) -> Result<RawAttributes, QueryFailure>,
    {
        f
    }

    fn fg(packed: i64) -> RawAttributes {
        RawAttributes {
            fg: Some(packed),
            ..RawAttributes::default()
        }
    }

    fn opts(granularity: Granularity, tab: usize) -> RenderOptions {
        RenderOptions {
            line_numbers: false,
            granularity,
            tab: TabExpansion::new(tab),
        }
    }

    fn render(
        text: &str,
        options: &RenderOptions,
        mut resolver: impl HighlightResolver,
    ) -> (CaptureSink, LineStats) {
        let mut sink = CaptureSink::new();
        let stats = render_line(0, text, options, &mut resolver, &mut sink).unwrap();
        (sink, stats)
    }

    // -- Plain output ------------------------------------------------------

    #[test]
    fn default_style_emits_no_codes() {
        let (sink, stats) = render(
            "let x = 1;",
            &opts(Granularity::Word, 4),
            scripted(|_, _| Ok(RawAttributes::default())),
        );
        assert_eq!(sink.output(), "let x = 1;");
        assert!(sink.controls().is_empty());
        assert_eq!(stats.failures, 0);
    }

    #[test]
    fn empty_line_never_queries() {
        let (sink, stats) = render(
            "",
            &opts(Granularity::Word, 4),
            scripted(|_, _| panic!("resolver called for an empty line")),
        );
        assert!(sink.events().is_empty());
        assert_eq!(stats, LineStats::default());
    }

    // -- Runs --------------------------------------------------------------

    #[test]
    fn identical_neighbors_share_one_opening() {
        let (sink, _) = render(
            "foo bar",
            &opts(Granularity::Word, 4),
            scripted(|_, _| Ok(fg(0xFF_0000))),
        );
        assert_eq!(sink.output(), format!("{RED}foo bar{RESET}"));
        assert_eq!(sink.controls(), vec![RED, RESET]);
    }

    #[test]
    fn style_change_resets_then_rebuilds() {
        // "let" keyword, " " plain, "x" identifier.
        let (sink, _) = render(
            "let x",
            &opts(Granularity::Word, 4),
            scripted(|_, col| {
                Ok(match col {
                    0 => RawAttributes {
                        fg: Some(0x00_00FF),
                        bold: Some(true),
                        ..RawAttributes::default()
                    },
                    4 => fg(0x00_FF00),
                    _ => RawAttributes::default(),
                })
            }),
        );
        assert_eq!(
            sink.output(),
            format!("{BLUE}{BOLD}let{RESET} {GREEN}x{RESET}")
        );
    }

    #[test]
    fn one_code_group_per_run() {
        // Runs: "aa" red, "bb" green, "cc" red.
        let (sink, _) = render(
            "aabbcc",
            &opts(Granularity::Char, 4),
            scripted(|_, col| Ok(if (2..4).contains(&col) { fg(0x00_FF00) } else { fg(0xFF_0000) })),
        );
        assert_eq!(
            sink.controls(),
            vec![
                RED.to_string(),
                format!("{RESET}{GREEN}"),
                format!("{RESET}{RED}"),
                RESET.to_string(),
            ]
        );
    }

    #[test]
    fn no_trailing_reset_after_default() {
        let (sink, _) = render(
            "x ",
            &opts(Granularity::Word, 4),
            scripted(|_, col| Ok(if col == 0 { fg(0xFF_0000) } else { RawAttributes::default() })),
        );
        assert_eq!(sink.output(), format!("{RED}x{RESET} "));
        assert_eq!(sink.output().matches(RESET).count(), 1);
    }

    #[test]
    fn out_of_range_color_is_default() {
        let (sink, _) = render(
            "x",
            &opts(Granularity::Word, 4),
            scripted(|_, _| Ok(fg(0x100_0000))),
        );
        assert_eq!(sink.output(), "x");
    }

    // -- Tabs --------------------------------------------------------------

    #[test]
    fn tabs_expand_without_queries() {
        let mut columns = Vec::new();
        let (sink, stats) = render(
            "\tx",
            &opts(Granularity::Word, 4),
            scripted(|_, col| {
                columns.push(col);
                Ok(fg(0xFF_0000))
            }),
        );
        assert_eq!(sink.output(), format!("    {RED}x{RESET}"));
        assert_eq!(columns, vec![1]);
        assert_eq!(stats.units, 2);
        assert_eq!(stats.queries, 1);
    }

    #[test]
    fn tab_keeps_the_open_style() {
        let (sink, _) = render(
            "a\tb",
            &opts(Granularity::Char, 2),
            scripted(|_, _| Ok(fg(0xFF_0000))),
        );
        assert_eq!(sink.output(), format!("{RED}a  b{RESET}"));
    }

    #[test]
    fn plain_text_round_trips() {
        let line = "\tif (a\t&& b) { return; }";
        let (sink, _) = render(
            line,
            &opts(Granularity::Word, 3),
            scripted(|_, col| Ok(fg(i64::try_from(col).unwrap() * 0x10))),
        );
        assert_eq!(sink.plain_text().replace("   ", "\t"), line);
    }

    // -- Queries -----------------------------------------------------------

    #[test]
    fn one_query_per_word_at_its_first_column() {
        let mut seen = Vec::new();
        let mut resolver = scripted(|row, col| {
            seen.push((row, col));
            Ok(RawAttributes::default())
        });
        let mut sink = CaptureSink::new();
        render_line(6, "foo(bar)", &opts(Granularity::Word, 4), &mut resolver, &mut sink)
            .unwrap();
        assert_eq!(seen, vec![(6, 0), (6, 3), (6, 4), (6, 7)]);
    }

    #[test]
    fn member_after_a_dot_gets_its_own_query() {
        let mut columns = Vec::new();
        let (sink, _) = render(
            "fmt.Println()",
            &opts(Granularity::Word, 4),
            scripted(|_, col| {
                columns.push(col);
                Ok(if (4..11).contains(&col) { fg(0x00_FF00) } else { fg(0xFF_0000) })
            }),
        );
        assert_eq!(columns, vec![0, 3, 4, 11, 12]);
        assert_eq!(
            sink.output(),
            format!("{RED}fmt.{RESET}{GREEN}Println{RESET}{RED}(){RESET}")
        );
    }

    // -- Failures ----------------------------------------------------------

    #[test]
    fn failure_is_isolated_to_its_unit() {
        let (sink, stats) = render(
            "abcdefg",
            &opts(Granularity::Char, 4),
            scripted(|row, col| {
                if col == 5 {
                    Err(QueryFailure::new(row, col, "disconnected"))
                } else {
                    Ok(fg(0xFF_0000))
                }
            }),
        );
        assert_eq!(
            sink.output(),
            format!("{RED}abcde{RESET}f{RED}g{RESET}")
        );
        assert_eq!(stats.failures, 1);
        assert!(stats.degraded());
        assert_eq!(stats.first_failure.map(|f| f.col), Some(5));
    }

    #[test]
    fn failure_with_nothing_open_emits_no_reset() {
        let (sink, stats) = render(
            "a b",
            &opts(Granularity::Word, 4),
            scripted(|row, col| Err(QueryFailure::new(row, col, "gone"))),
        );
        assert_eq!(sink.output(), "a b");
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.first_failure.map(|f| f.col), Some(0));
    }
}
