//! Highlight resolution — the boundary to the oracle.
//!
//! A resolver answers one question: which highlight attributes apply at
//! `(row, col)`? Both coordinates are 0-based; `col` is a byte offset
//! into the line. The call is a blocking round trip with no caching and
//! no retry, and it may fail. A failure is an ordinary value here, never
//! a reason to stop rendering.

use thiserror::Error;

// ---------------------------------------------------------------------------
// RawAttributes
// ---------------------------------------------------------------------------

/// What the oracle reported for one position.
///
/// Only the four attributes nvcat draws are kept. Every field is optional:
/// an empty report means "no highlight applies here".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawAttributes {
    /// Packed `0xRRGGBB` foreground, unvalidated.
    pub fg: Option<i64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

// ---------------------------------------------------------------------------
// QueryFailure
// ---------------------------------------------------------------------------

/// A single resolution request that did not complete.
///
/// Recoverable by construction: the line renderer degrades the unit to
/// plain text and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("highlight query at {row}:{col} failed: {reason}")]
pub struct QueryFailure {
    pub row: usize,
    pub col: usize,
    pub reason: String,
}

impl QueryFailure {
    #[must_use]
    pub fn new(row: usize, col: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            col,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// HighlightResolver
// ---------------------------------------------------------------------------

/// A source of per-position highlight attributes.
///
/// Any `FnMut(row, col)` closure with the right return type is a resolver,
/// which is how tests script an oracle.
pub trait HighlightResolver {
    /// Query the attributes at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryFailure`] when the oracle could not answer.
    fn resolve(&mut self, row: usize, col: usize) -> Result<RawAttributes, QueryFailure>;
}

impl<F> HighlightResolver for F
where
    F: FnMut(usize, usize) -> Result<RawAttributes, QueryFailure>,
{
    fn resolve(&mut self, row: usize, col: usize) -> Result<RawAttributes, QueryFailure> {
        self(row, col)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
