// SPDX-License-Identifier: MIT
//
// nv-term — Terminal escape layer for nvcat.
//
// Everything nvcat knows about the terminal lives here: the canonical
// style a run of text is drawn with, the SGR byte encoding of that style,
// the encoder that diffs two styles into the smallest transition, and the
// sinks the renderer writes into.
//
// Raw ANSI escape sequences, no TUI framework. nvcat never moves the
// cursor or touches screen modes; it only colors a stream of text, so the
// surface is a handful of SGR codes and a line-oriented sink.

pub mod ansi;
pub mod color;
pub mod encode;
pub mod output;
pub mod style;

pub use color::Rgb;
pub use output::{CaptureSink, OutputBuffer, Sink, SinkEvent, StreamSink};
pub use style::{Attr, Style};
