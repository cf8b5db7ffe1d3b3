// SPDX-License-Identifier: MIT
//
// 24-bit color.
//
// nvcat is truecolor only: the oracle reports colors as packed 0xRRGGBB
// integers and we pass them through to the terminal verbatim. There is no
// palette approximation and no "default" variant; the absence of a color
// is `Option::None` on the style that holds it.

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit `TrueColor` value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Largest value representable in 24 bits.
    pub const MAX_PACKED: i64 = 0xFF_FFFF;

    /// Unpack a `0xRRGGBB` integer.
    ///
    /// Returns `None` for negative values and values wider than 24 bits,
    /// so a malformed report never turns into a wrong color.
    #[must_use]
    pub fn from_u24(value: i64) -> Option<Self> {
        if !(0..=Self::MAX_PACKED).contains(&value) {
            return None;
        }
        let [_, _, _, _, _, r, g, b] = value.to_be_bytes();
        Some(Self(r, g, b))
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
