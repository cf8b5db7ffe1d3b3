// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write SGR sequences to any `fmt::Write`. No state,
// no decisions about when to emit — that's the encoder's job. This module
// just knows the byte-level encoding of every code nvcat prints.
//
// Each attribute gets its own CSI sequence rather than one combined
// `ESC[1;3;4m`. The encoder's contract is "color, then bold, italic,
// underline", and separate sequences keep that order visible in output.

use std::fmt::{self, Write};

use crate::color::Rgb;
use crate::style::Style;

// ─── Constants ───────────────────────────────────────────────────────────────

/// SGR 0 — reset every attribute and color. Whoever tracks the open style
/// must forget it after writing this.
pub const RESET: &str = "\x1b[0m";
/// SGR 1 — bold.
pub const BOLD: &str = "\x1b[1m";
/// SGR 2 — faint. Used for the line-number gutter.
pub const DIM: &str = "\x1b[2m";
/// SGR 3 — italic.
pub const ITALIC: &str = "\x1b[3m";
/// SGR 4 — underline.
pub const UNDERLINE: &str = "\x1b[4m";

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Bold (SGR 1).
#[inline]
pub fn bold(w: &mut impl Write) -> fmt::Result {
    w.write_str(BOLD)
}

/// Italic (SGR 3).
#[inline]
pub fn italic(w: &mut impl Write) -> fmt::Result {
    w.write_str(ITALIC)
}

/// Straight underline (SGR 4).
#[inline]
pub fn underline(w: &mut impl Write) -> fmt::Result {
    w.write_str(UNDERLINE)
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground to a 24-bit color (`ESC[38;2;R;G;Bm`).
pub fn fg(w: &mut impl Write, color: Rgb) -> fmt::Result {
    let Rgb(r, g, b) = color;
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

// ─── Full Style ──────────────────────────────────────────────────────────────

/// Emit the opening sequences for `style` on top of a clean terminal state.
///
/// Order is fixed: foreground, bold, italic, underline. The default style
/// emits nothing.
pub fn sgr(w: &mut impl Write, style: &Style) -> fmt::Result {
    if let Some(color) = style.fg {
        fg(w, color)?;
    }
    if style.is_bold() {
        bold(w)?;
    }
    if style.is_italic() {
        italic(w)?;
    }
    if style.is_underline() {
        underline(w)?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
