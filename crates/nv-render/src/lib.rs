//! # nv-render — Rendering pipeline for nvcat
//!
//! Turns source lines into colored terminal output, one oracle query per
//! unit:
//!
//! ```text
//! file::render_file ── numbering prefix, line order
//!     │
//!     ▼
//! line::render_line ── per-line render state, failure fallback
//!     │
//!     ├─ segment  ── line → units (words / chars, tabs split out)
//!     ├─ resolve  ── (row, col) → RawAttributes | QueryFailure
//!     ├─ highlight── RawAttributes → Style
//!     └─ nv_term::encode ── Style diff → control codes → Sink
//! ```
//!
//! - **[`source`]** — loading and validating the input file
//! - **[`options`]** — immutable render options (numbering, granularity, tabs)
//!
//! The oracle itself lives behind the [`HighlightResolver`] trait; this
//! crate has no idea it is talking to Neovim.

pub mod file;
pub mod highlight;
pub mod line;
pub mod options;
pub mod resolve;
pub mod segment;
pub mod source;

pub use file::{RenderStats, digit_count, render_file};
pub use highlight::map_attributes;
pub use line::{LineStats, render_line};
pub use options::{RenderOptions, TabExpansion};
pub use resolve::{HighlightResolver, QueryFailure, RawAttributes};
pub use segment::{Granularity, Unit, UnitKind, segment};
pub use source::{InputError, Source};
