// SPDX-License-Identifier: MIT
//
// Output sinks and line buffering.
//
// The renderer never touches stdout directly. It talks to a `Sink`, which
// accepts three things in strict emission order: literal text, control
// codes, and the end of a line. Text and control codes go to the same
// stream — splitting them across stdout and stderr breaks as soon as the
// two are redirected separately.
//
//   OutputBuffer — accumulates one line of bytes so it reaches the
//   terminal in a single write() instead of one write per unit.
//
//   StreamSink — the production sink: buffers a line, and on end_line()
//   writes it with its terminator and flushes before returning. Line N+1
//   can therefore never start before line N is on the wire.
//
//   CaptureSink — records every call for tests.

use std::io::{self, Write};

// ─── Sink ────────────────────────────────────────────────────────────────────

/// Destination for rendered output.
pub trait Sink {
    /// Append literal text from the source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn text(&mut self, text: &str) -> io::Result<()>;

    /// Append terminal control codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn control(&mut self, code: &str) -> io::Result<()>;

    /// Terminate the current line and make it visible downstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn end_line(&mut self) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn text(&mut self, text: &str) -> io::Result<()> {
        (**self).text(text)
    }

    fn control(&mut self, code: &str) -> io::Result<()> {
        (**self).control(code)
    }

    fn end_line(&mut self) -> io::Result<()> {
        (**self).end_line()
    }
}

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates output for a single `write()` call.
///
/// Default capacity: 4 KB — a long source line with a color change every
/// few characters still fits without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Append a string.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Hand the pending bytes to `w` in one `write_all`, then flush `w`.
    ///
    /// # Errors
    ///
    /// Any write or flush error from `w`. On error the bytes stay pending.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            self.buf.clear();
        }
        w.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── StreamSink ──────────────────────────────────────────────────────────────

/// Line-buffered sink over any writer (stdout in production).
pub struct StreamSink<W: Write> {
    out: W,
    line: OutputBuffer,
}

impl<W: Write> StreamSink<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: OutputBuffer::new(),
        }
    }
}

impl<W: Write> Sink for StreamSink<W> {
    #[inline]
    fn text(&mut self, text: &str) -> io::Result<()> {
        self.line.push_str(text);
        Ok(())
    }

    #[inline]
    fn control(&mut self, code: &str) -> io::Result<()> {
        self.line.push_str(code);
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.line.push_str("\n");
        self.line.flush_to(&mut self.out)
    }
}

// ─── CaptureSink ─────────────────────────────────────────────────────────────

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Text(String),
    Control(String),
    EndLine,
}

/// A sink that records every call, for asserting on renderer behavior
/// without going through a process stream.
#[derive(Debug, Default)]
pub struct CaptureSink {
    events: Vec<SinkEvent>,
}

impl CaptureSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    #[must_use]
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Everything written, control codes included, lines joined by `\n`.
    #[must_use]
    pub fn output(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                SinkEvent::Text(s) | SinkEvent::Control(s) => out.push_str(s),
                SinkEvent::EndLine => out.push('\n'),
            }
        }
        out
    }

    /// Only the literal text and line terminators.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                SinkEvent::Text(s) => out.push_str(s),
                SinkEvent::EndLine => out.push('\n'),
                SinkEvent::Control(_) => {}
            }
        }
        out
    }

    /// The non-empty control codes, in order.
    #[must_use]
    pub fn controls(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Control(s) if !s.is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Sink for CaptureSink {
    fn text(&mut self, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Text(text.to_owned()));
        Ok(())
    }

    fn control(&mut self, code: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Control(code.to_owned()));
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::EndLine);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A writer that records how many times it was flushed.
    #[derive(Default)]
    struct CountingWriter {
        bytes: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            self.writes += 1;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn output_buffer_collects_a_line() {
        let mut line = OutputBuffer::new();
        line.push_str("\x1b[2m");
        line.push_str("007 ");
        line.push_str("\x1b[0m");
        let mut out = CountingWriter::default();
        line.flush_to(&mut out).unwrap();
        assert_eq!(out.bytes, b"\x1b[2m007 \x1b[0m");
        assert_eq!(out.writes, 1);
    }

    #[test]
    fn output_buffer_flushes_even_when_empty() {
        let mut line = OutputBuffer::new();
        let mut out = CountingWriter::default();
        line.flush_to(&mut out).unwrap();
        assert_eq!((out.writes, out.flushes), (0, 1));

        line.push_str("x");
        line.flush_to(&mut out).unwrap();
        line.flush_to(&mut out).unwrap();
        assert_eq!(out.bytes, b"x");
        assert_eq!((out.writes, out.flushes), (1, 3));
    }

    // ── StreamSink ──────────────────────────────────────────────────────

    #[test]
    fn stream_sink_holds_line_until_end() {
        let mut sink = StreamSink::new(CountingWriter::default());
        sink.control("\x1b[1m").unwrap();
        sink.text("fn").unwrap();
        assert!(sink.out.bytes.is_empty());

        sink.end_line().unwrap();
        assert_eq!(sink.out.bytes, b"\x1b[1mfn\n");
        assert_eq!(sink.out.writes, 1);
        assert_eq!(sink.out.flushes, 1);
    }

    #[test]
    fn stream_sink_keeps_codes_and_text_on_one_stream() {
        let mut sink = StreamSink::new(Vec::new());
        sink.text("a").unwrap();
        sink.control("\x1b[3m").unwrap();
        sink.text("b").unwrap();
        sink.control("\x1b[0m").unwrap();
        sink.end_line().unwrap();
        sink.end_line().unwrap();
        assert_eq!(sink.out, b"a\x1b[3mb\x1b[0m\n\n");
    }

    // ── CaptureSink ─────────────────────────────────────────────────────

    #[test]
    fn capture_sink_records_in_order() {
        let mut sink = CaptureSink::new();
        sink.control("\x1b[1m").unwrap();
        sink.text("x").unwrap();
        sink.end_line().unwrap();
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::Control("\x1b[1m".into()),
                SinkEvent::Text("x".into()),
                SinkEvent::EndLine,
            ]
        );
        assert_eq!(sink.output(), "\x1b[1mx\n");
        assert_eq!(sink.plain_text(), "x\n");
        assert_eq!(sink.controls(), vec!["\x1b[1m"]);
    }

    #[test]
    fn sink_through_mutable_reference() {
        fn write_through(mut sink: impl Sink) {
            sink.text("ok").unwrap();
        }
        let mut capture = CaptureSink::new();
        write_through(&mut capture);
        assert_eq!(capture.plain_text(), "ok");
    }
}
