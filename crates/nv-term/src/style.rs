// SPDX-License-Identifier: MIT
//
// Style — the canonical description of how a run of text is drawn.
//
// The oracle can report dozens of highlight attributes; nvcat consumes
// four. A style is therefore a fixed-shape record: an optional 24-bit
// foreground and three attribute bits. Anything else the oracle says is
// dropped before it gets here.
//
// Equality is structural. Two units with equal styles form one run and
// share a single opening escape sequence.

use crate::color::Rgb;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// Each flag maps to one SGR parameter. Combine with bitwise OR:
    ///
    /// ```
    /// use nv_term::style::Attr;
    ///
    /// let attrs = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(attrs.contains(Attr::BOLD));
    /// assert!(!attrs.contains(Attr::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 3 — italic.
        const ITALIC    = 1 << 1;
        /// SGR 4 — single straight underline.
        const UNDERLINE = 1 << 2;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// A resolved visual style: foreground color plus attributes.
///
/// `Style::default()` is "no style": terminal default color, no
/// attributes. It is a real style, distinct from "the query for this
/// position failed", which the renderer tracks as the absence of any open
/// style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color. `None` keeps the terminal's default.
    pub fg: Option<Rgb>,
    /// Bold / italic / underline.
    pub attrs: Attr,
}

impl Style {
    /// The "no style" value as a constant.
    pub const PLAIN: Self = Self {
        fg: None,
        attrs: Attr::empty(),
    };

    /// A style with only a foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            attrs: Attr::empty(),
        }
    }

    /// Return a copy with `attrs` added.
    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self {
            attrs: self.attrs.union(attrs),
            ..self
        }
    }

    /// Whether this is the "no style" value.
    #[inline]
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.fg.is_none() && self.attrs.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.attrs.contains(Attr::BOLD)
    }

    #[inline]
    #[must_use]
    pub const fn is_italic(&self) -> bool {
        self.attrs.contains(Attr::ITALIC)
    }

    #[inline]
    #[must_use]
    pub const fn is_underline(&self) -> bool {
        self.attrs.contains(Attr::UNDERLINE)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_plain() {
        assert_eq!(Style::default(), Style::PLAIN);
        assert!(Style::default().is_default());
    }

    #[test]
    fn any_field_makes_it_non_default() {
        assert!(!Style::fg(Rgb(0, 0, 0)).is_default());
        assert!(!Style::PLAIN.with_attrs(Attr::UNDERLINE).is_default());
    }

    #[test]
    fn equality_covers_every_field() {
        let a = Style::fg(Rgb(1, 2, 3)).with_attrs(Attr::BOLD);
        assert_eq!(a, Style::fg(Rgb(1, 2, 3)).with_attrs(Attr::BOLD));
        assert_ne!(a, Style::fg(Rgb(1, 2, 4)).with_attrs(Attr::BOLD));
        assert_ne!(a, Style::fg(Rgb(1, 2, 3)).with_attrs(Attr::ITALIC));
        assert_ne!(a, Style::PLAIN.with_attrs(Attr::BOLD));
    }

    #[test]
    fn with_attrs_accumulates() {
        let s = Style::PLAIN
            .with_attrs(Attr::BOLD)
            .with_attrs(Attr::ITALIC);
        assert!(s.is_bold());
        assert!(s.is_italic());
        assert!(!s.is_underline());
    }
}
