//! Diagnostics on stderr.
//!
//! A minimal `log` backend: one line per record, `nvcat: <level>: <msg>`,
//! written to stderr so it can never end up in the rendered output. The
//! level comes from `NVCAT_LOG` and defaults to `warn`.

use std::fmt;
use std::io::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Nowhere left to report a failed write to stderr.
        let _ = writeln!(io::stderr().lock(), "{}", format_line(record.level(), record.args()));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn format_line(level: Level, message: &fmt::Arguments<'_>) -> String {
    format!("nvcat: {}: {message}", level.as_str().to_ascii_lowercase())
}

/// Install the logger. Calling it twice keeps the first installation.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
