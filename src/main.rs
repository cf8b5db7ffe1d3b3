// SPDX-License-Identifier: MIT
//
// nvcat — cat with the syntax highlighting of your Neovim.
//
// This binary wires the crates together:
//
//   nv-render → source loading, segmentation, line and file rendering
//   nv-oracle → embedded Neovim answering "which highlight is at (row, col)?"
//   nv-term   → style encoding and the stdout sink
//
// One run, start to finish:
//
//   argv + env → Config
//   Config.file → Source (validated before Neovim is started)
//   Source → Oracle::start → tab settings → RenderOptions
//   render_file(lines, options, oracle, stdout)
//
// Fatal errors print one line to stderr and exit 1. Query failures only
// degrade output to plain text.

mod cli;
mod logging;

use std::env;
use std::io;
use std::process;

use anyhow::{Context, Result};

use nv_oracle::Oracle;
use nv_render::{RenderOptions, Source, render_file};
use nv_term::StreamSink;

use crate::cli::Config;

fn run(config: &Config) -> Result<()> {
    let source = Source::load(&config.file)?;
    let lines = source.lines();
    if lines.is_empty() {
        log::debug!("{} is empty", source.path().display());
        return Ok(());
    }

    let mut oracle = Oracle::start(&config.oracle, source.path(), lines.len())
        .context("neovim startup failed")?;

    let options = RenderOptions {
        line_numbers: config.line_numbers,
        granularity: config.granularity,
        tab: oracle.tab_settings().expansion(),
    };

    let stdout = io::stdout();
    let mut sink = StreamSink::new(stdout.lock());
    let stats = render_file(&lines, &options, oracle.resolver(), &mut sink)?;

    log::debug!(
        "{} lines, {} units, {} queries, {} failed",
        stats.lines,
        stats.units,
        stats.queries,
        stats.failures,
    );
    Ok(())
}

/// `nvcat file | head` closes our stdout early. That is not an error.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn main() {
    let cli = match cli::parse(env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            process::exit(code);
        }
    };

    let config = Config::new(cli, |key| env::var_os(key));
    logging::init(config.log_level);

    match run(&config) {
        Ok(()) => {}
        Err(err) if is_broken_pipe(&err) => {}
        Err(err) => {
            eprintln!("nvcat: {err:#}");
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nv_render::InputError;

    #[test]
    fn broken_pipe_is_detected_through_context() {
        let err = anyhow::Error::from(io::Error::from(io::ErrorKind::BrokenPipe))
            .context("writing output");
        assert!(is_broken_pipe(&err));

        let other = anyhow::Error::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!is_broken_pipe(&other));
    }

    #[test]
    fn binary_file_fails_before_neovim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, b"\x7fELF\0\0").unwrap();

        let config = Config::new(
            cli::parse(["nvcat".into(), path.into_os_string()]).unwrap(),
            |_| Some("/nonexistent/nvim".into()),
        );
        let err = run(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Binary { .. })
        ));
    }

    #[test]
    fn empty_file_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let config = Config::new(
            cli::parse(["nvcat".into(), path.into_os_string()]).unwrap(),
            |_| Some("/nonexistent/nvim".into()),
        );
        run(&config).unwrap();
    }

    #[test]
    fn missing_neovim_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let config = Config::new(
            cli::parse(["nvcat".into(), path.into_os_string()]).unwrap(),
            |key| (key == "NVCAT_NVIM").then(|| "/nonexistent/nvim".into()),
        );
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").starts_with("neovim startup failed: cannot start"));
    }
}
