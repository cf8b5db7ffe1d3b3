//! Unit segmentation — splitting a line into the pieces we query for.
//!
//! Each [`Unit`] is resolved with exactly one oracle query at its first
//! column and drawn in a single style. Two granularities are offered:
//!
//! | Granularity | Unit | Queries per line |
//! |-------------|------|------------------|
//! | [`Granularity::Char`] | one Unicode scalar | one per char |
//! | [`Granularity::Word`] | one same-class run inside a UAX #29 segment | one per token |
//!
//! Word units are the default. They rely on the oracle styling a lexical
//! token uniformly from its first column; `Char` is the fallback for
//! highlighters that break that assumption.
//!
//! UAX #29 keeps `fmt.Println`, `a:b` and `don't` together as one word,
//! while a highlighter colors the receiver and the member differently. So
//! every word-boundary segment is cut again wherever the character class
//! changes: runs of word characters (letters, digits, `_`) and runs of
//! whitespace stay whole, and every punctuation mark stands alone.
//!
//! Either way a tab is always its own [`UnitKind::Tab`] unit, never merged
//! with its neighbors, because tabs are expanded rather than queried.
//!
//! Columns are **byte offsets** into the line. That is the column unit the
//! oracle addresses, so a unit after `"café"` starts at column 5, not 4.

use std::str::CharIndices;

use unicode_segmentation::{UWordBoundIndices, UnicodeSegmentation};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How finely a line is cut into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Every Unicode scalar value is its own unit.
    Char,
    /// Word-boundary tokens: runs of word characters, single punctuation
    /// marks, runs of whitespace.
    #[default]
    Word,
}

/// What a unit stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Literal text, resolved against the oracle.
    Text,
    /// A single `\t`, replaced by the tab expansion.
    Tab,
}

/// A contiguous slice of a line rendered in one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit<'a> {
    /// The literal text, borrowed from the line.
    pub text: &'a str,
    /// Byte offset of `text` within the line.
    pub column: usize,
    pub kind: UnitKind,
}

impl Unit<'_> {
    /// Column just past this unit.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.column + self.text.len()
    }
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Split `line` into units, lazily, left to right.
///
/// The units partition the line: concatenating their text gives back
/// `line` exactly, and each unit starts where the previous one ended.
#[must_use]
pub fn segment(line: &str, granularity: Granularity) -> Units<'_> {
    let pieces = match granularity {
        Granularity::Char => Pieces::Chars {
            line,
            chars: line.char_indices(),
        },
        Granularity::Word => Pieces::Words {
            words: line.split_word_bound_indices(),
            rest: None,
        },
    };
    Units {
        pieces,
        pending: None,
    }
}

/// Raw segments before tabs are carved out.
enum Pieces<'a> {
    Chars {
        line: &'a str,
        chars: CharIndices<'a>,
    },
    Words {
        words: UWordBoundIndices<'a>,
        /// Tail of a word segment not yet split off.
        rest: Option<(usize, &'a str)>,
    },
}

/// Character classes a word unit may not mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Space,
    Punct,
}

impl Class {
    fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            Self::Space
        } else if ch != '_' && (ch.is_ascii_punctuation() || is_unicode_punctuation(ch)) {
            Self::Punct
        } else {
            Self::Word
        }
    }
}

/// Non-ASCII marks UAX #29 lets a word run through (`MidLetter`,
/// `MidNumLet`, `MidNum`). The ASCII ones are caught by
/// `is_ascii_punctuation`.
const fn is_unicode_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '\u{00B7}'
            | '\u{0387}'
            | '\u{055F}'
            | '\u{05F4}'
            | '\u{066C}'
            | '\u{2018}'
            | '\u{2019}'
            | '\u{2024}'
            | '\u{2027}'
            | '\u{FE13}'
            | '\u{FE50}'
            | '\u{FE52}'
            | '\u{FE54}'
            | '\u{FE55}'
            | '\u{FF07}'
            | '\u{FF0C}'
            | '\u{FF0E}'
            | '\u{FF1A}'
            | '\u{FF1B}'
    )
}

/// Length of the leading same-class run of a non-empty `piece`.
fn class_run(piece: &str) -> usize {
    let mut chars = piece.char_indices();
    let Some((_, first)) = chars.next() else {
        return 0;
    };
    let class = Class::of(first);
    if class == Class::Punct {
        return first.len_utf8();
    }
    chars
        .find(|&(_, ch)| Class::of(ch) != class)
        .map_or(piece.len(), |(at, _)| at)
}

impl<'a> Iterator for Pieces<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Chars { line, chars } => {
                let line: &'a str = *line;
                let (start, ch) = chars.next()?;
                Some((start, &line[start..start + ch.len_utf8()]))
            }
            Self::Words { words, rest } => {
                let (start, piece) = match rest.take() {
                    Some(tail) => tail,
                    None => words.next()?,
                };
                let end = class_run(piece);
                if end < piece.len() {
                    *rest = Some((start + end, &piece[end..]));
                }
                Some((start, &piece[..end]))
            }
        }
    }
}

/// Iterator returned by [`segment`].
pub struct Units<'a> {
    pieces: Pieces<'a>,
    /// Remainder of a piece that still has a tab in it.
    pending: Option<(usize, &'a str)>,
}

impl<'a> Iterator for Units<'a> {
    type Item = Unit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (column, piece) = match self.pending.take() {
            Some(rest) => rest,
            None => self.pieces.next()?,
        };

        if let Some(after) = piece.strip_prefix('\t') {
            if !after.is_empty() {
                self.pending = Some((column + 1, after));
            }
            return Some(Unit {
                text: &piece[..1],
                column,
                kind: UnitKind::Tab,
            });
        }

        let end = piece.find('\t').unwrap_or(piece.len());
        if end < piece.len() {
            self.pending = Some((column + end, &piece[end..]));
        }
        Some(Unit {
            text: &piece[..end],
            column,
            kind: UnitKind::Text,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
