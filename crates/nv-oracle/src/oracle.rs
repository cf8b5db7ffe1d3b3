//! Starting the embedded Neovim and preparing it for queries.
//!
//! Startup runs in a fixed order. Later steps depend on earlier ones: the
//! tab options are read after the user config had its chance to change
//! them, and the query function is installed once the buffer exists.
//!
//! 1. spawn `nvim --embed --headless -n` (plus `--clean` on request)
//! 2. version gate
//! 3. attach a UI tall enough for the whole file
//! 4. nvcat user config (skipped with `--clean`, failure only warns)
//! 5. `expandtab` / `tabstop`
//! 6. `:edit` the file
//! 7. install `NvcatGetHl` (failure only warns)

use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use nv_render::{HighlightResolver, QueryFailure, RawAttributes};

use crate::error::OracleError;
use crate::nvim::{Nvim, TabSettings};
use crate::rpc::RpcClient;

/// Width of the attached UI. Highlighting does not depend on it.
const UI_WIDTH: usize = 80;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// How to start Neovim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// The `nvim` executable, looked up on `PATH` when not absolute.
    pub program: PathBuf,
    /// Pass `--clean`: no user init, no plugins, no nvcat config.
    pub clean: bool,
}

impl OracleConfig {
    /// Environment variable that overrides [`program`](Self::program).
    pub const PROGRAM_ENV: &'static str = "NVCAT_NVIM";
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("nvim"),
            clean: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Steps 2 to 7 against an already connected Neovim.
fn prepare<R: Read, W: Write>(
    nvim: &mut Nvim<R, W>,
    clean: bool,
    path: &Path,
    line_count: usize,
) -> Result<TabSettings, OracleError> {
    nvim.check_version()?;
    nvim.ui_attach(UI_WIDTH, line_count.max(1).saturating_mul(2))?;

    if clean {
        log::debug!("clean instance, skipping nvcat config");
    } else {
        match nvim.load_user_config() {
            Ok(Some(file)) => log::debug!("loaded {}", file.display()),
            Ok(None) => log::debug!("no nvcat config found"),
            Err(err) => log::warn!("could not load nvcat config: {err}"),
        }
    }

    let tabs = nvim.tab_settings()?;
    log::debug!("tabstop={} expandtab={}", tabs.tabstop, tabs.expandtab);

    nvim.edit(path)?;

    if let Err(err) = nvim.install_query() {
        log::warn!("could not install highlight query: {err}");
    }
    Ok(tabs)
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

type ChildNvim = Nvim<BufReader<ChildStdout>, ChildStdin>;

/// A running Neovim with the file open, ready to answer highlight queries.
///
/// Dropping it kills and reaps the child.
pub struct Oracle {
    child: Child,
    nvim: ChildNvim,
    tabs: TabSettings,
}

impl Oracle {
    /// Start Neovim and open `path` (absolute) in it.
    ///
    /// `line_count` sizes the attached UI.
    ///
    /// # Errors
    ///
    /// Any [`OracleError`]. The child is cleaned up before returning.
    pub fn start(config: &OracleConfig, path: &Path, line_count: usize) -> Result<Self, OracleError> {
        let mut command = Command::new(&config.program);
        command.args(["--embed", "--headless", "-n"]);
        if config.clean {
            command.arg("--clean");
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        log::debug!("spawning {command:?}");
        let mut child = command.spawn().map_err(|source| OracleError::Spawn {
            program: config.program.clone(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            reap(&mut child);
            return Err(OracleError::Protocol("child stdio was not captured".into()));
        };

        let mut nvim = Nvim::new(RpcClient::new(BufReader::new(stdout), stdin));
        match prepare(&mut nvim, config.clean, path, line_count) {
            Ok(tabs) => Ok(Self { child, nvim, tabs }),
            Err(err) => {
                drop(nvim);
                reap(&mut child);
                Err(err)
            }
        }
    }

    /// Tab options as Neovim reported them.
    #[must_use]
    pub const fn tab_settings(&self) -> TabSettings {
        self.tabs
    }

    /// The highlight resolver backed by this instance.
    pub fn resolver(&mut self) -> &mut impl HighlightResolver {
        self
    }
}

impl HighlightResolver for Oracle {
    fn resolve(&mut self, row: usize, col: usize) -> Result<RawAttributes, QueryFailure> {
        self.nvim.resolve(row, col)
    }
}

impl Drop for Oracle {
    fn drop(&mut self) {
        reap(&mut self.child);
    }
}

fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        log::debug!("killing neovim: {err}");
    }
    if let Err(err) = child.wait() {
        log::debug!("waiting for neovim: {err}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
