//! Render options — built once at startup, read-only afterwards.
//!
//! Nothing in the pipeline reads global flags. The binary turns its
//! command line and the oracle's tab settings into one [`RenderOptions`]
//! value and passes it down by reference.

use crate::segment::Granularity;

/// The literal replacement for a tab character.
///
/// A fixed run of spaces as wide as the oracle's `tabstop`. Tabs are
/// expanded to the full width wherever they occur; there is no tab-stop
/// alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabExpansion(String);

impl TabExpansion {
    /// Expansion for a tab width of `width` columns.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self(" ".repeat(width))
    }

    /// The replacement text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of spaces a tab becomes.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl Default for TabExpansion {
    /// Vim's default `tabstop`.
    fn default() -> Self {
        Self::new(8)
    }
}

/// Everything the file and line renderers need to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix every line with its 1-based number.
    pub line_numbers: bool,
    /// Unit size used for oracle queries.
    pub granularity: Granularity,
    /// What a tab turns into.
    pub tab: TabExpansion,
}
