//! Attribute mapping — oracle report to [`Style`].
//!
//! Pure and infallible. A field that is absent, falsy, or malformed is
//! simply unset; there is no way to express "explicitly off" other than
//! the reset the encoder emits between runs.

use nv_term::{Attr, Rgb, Style};

use crate::resolve::RawAttributes;

/// Map a raw report to the style it should be drawn with.
///
/// - `fg` is copied verbatim when it fits in 24 bits, dropped otherwise.
/// - `bold` / `italic` / `underline` set their flag only when `Some(true)`.
/// - An empty report maps to `Style::default()`.
#[must_use]
pub fn map_attributes(raw: &RawAttributes) -> Style {
    let mut attrs = Attr::empty();
    attrs.set(Attr::BOLD, raw.bold == Some(true));
    attrs.set(Attr::ITALIC, raw.italic == Some(true));
    attrs.set(Attr::UNDERLINE, raw.underline == Some(true));

    raw.fg
        .and_then(Rgb::from_u24)
        .map_or(Style::PLAIN, Style::fg)
        .with_attrs(attrs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
