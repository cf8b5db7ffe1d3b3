//! Command-line interface and startup configuration.
//!
//! The command line and the environment are read exactly once, here, and
//! folded into a [`Config`] that the rest of the program only borrows.

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use log::LevelFilter;

use nv_oracle::OracleConfig;
use nv_render::Granularity;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "NVCAT_LOG";

/// nvcat - cat with syntax highlighting by Neovim
#[derive(Debug, Parser)]
#[command(name = "nvcat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File to print
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number every output line
    #[arg(short = 'n', long = "number")]
    pub number: bool,

    /// Start Neovim with --clean (no user config, no plugins)
    #[arg(long)]
    pub clean: bool,

    /// Query the highlight of every character instead of every word
    #[arg(long)]
    pub per_char: bool,
}

/// The clap command, with `-v` as the version flag.
fn command() -> clap::Command {
    Cli::command().disable_version_flag(true).arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

/// Single-dash long flags earlier nvcat releases accepted, spelled the way
/// clap expects them.
const LEGACY_FLAGS: &[(&str, &str)] = &[("-clean", "--clean")];

/// Rewrite legacy spellings up to the first `--`.
fn legacy_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut options_ended = false;
    args.into_iter()
        .map(|arg| {
            if options_ended {
                return arg;
            }
            if arg == "--" {
                options_ended = true;
                return arg;
            }
            LEGACY_FLAGS
                .iter()
                .find(|(old, _)| arg == *old)
                .map_or(arg, |(_, new)| OsString::from(new))
        })
        .collect()
}

/// Parse `args` (program name first).
///
/// `-clean` is accepted as a spelling of `--clean`.
///
/// # Errors
///
/// Clap's error for usage problems, and also for `--help` and `--version`,
/// which clap reports as errors that do not go to stderr.
pub fn parse<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = legacy_flags(args.into_iter().map(Into::into));
    let matches = command().try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Everything nvcat needs to know before it starts working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub file: PathBuf,
    pub line_numbers: bool,
    pub granularity: Granularity,
    pub oracle: OracleConfig,
    pub log_level: LevelFilter,
}

impl Config {
    /// Combine the command line with the environment, looked up via `env`.
    pub fn new(cli: Cli, env: impl Fn(&str) -> Option<OsString>) -> Self {
        let program = env(OracleConfig::PROGRAM_ENV)
            .filter(|p| !p.is_empty())
            .map_or_else(|| OracleConfig::default().program, PathBuf::from);

        let log_level = env(LOG_ENV)
            .and_then(|v| v.into_string().ok())
            .and_then(|v| LevelFilter::from_str(v.trim()).ok())
            .unwrap_or(LevelFilter::Warn);

        Self {
            file: cli.file,
            line_numbers: cli.number,
            granularity: if cli.per_char {
                Granularity::Char
            } else {
                Granularity::Word
            },
            oracle: OracleConfig {
                program,
                clean: cli.clean,
            },
            log_level,
        }
    }
}
