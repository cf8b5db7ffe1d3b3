// SPDX-License-Identifier: MIT
//
// Escape encoder — the smallest transition between two styles.
//
// The terminal is a two-state machine from nvcat's point of view:
//
//   nothing open ──open S──▶ S open ──reset, open S′──▶ S′ open
//
// There is no partial update. Turning bold off while keeping the color,
// or swapping one color for another, always goes through SGR 0 and then
// rebuilds the new style from scratch. That keeps the encoder trivially
// correct: whatever the terminal had before, after a transition it shows
// exactly `next`.
//
// `None` as the previous state means "nothing is known to be open" (start
// of line, or right after a failed query). For emission purposes it is the
// same as an open default style: neither needs a reset.

use crate::ansi;
use crate::style::Style;

/// Control codes that move the terminal from `previous` to `next`.
///
/// - `next == previous` → empty (run-length compression).
/// - otherwise, a reset if a non-default style is open, then the opening
///   sequences of `next` (nothing more when `next` is the default style).
#[must_use]
pub fn encode(previous: Option<Style>, next: Style) -> String {
    let mut out = String::new();
    if previous == Some(next) {
        return out;
    }
    out.push_str(close(previous));
    // Writing into a String cannot fail.
    let _ = ansi::sgr(&mut out, &next);
    out
}

/// The reset needed to close `previous`, if any.
///
/// Used at end of line and before degrading a unit to plain text.
#[must_use]
pub fn close(previous: Option<Style>) -> &'static str {
    match previous {
        Some(style) if !style.is_default() => ansi::RESET,
        _ => "",
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
