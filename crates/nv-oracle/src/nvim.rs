//! Typed Neovim API calls on top of [`RpcClient`].
//!
//! Only the handful of calls nvcat needs are wrapped. Each startup step is
//! its own method so the sequence in [`oracle`](crate::oracle) reads like a
//! script and each step can be tested against canned replies.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rmpv::Value;

use nv_render::{HighlightResolver, QueryFailure, RawAttributes, TabExpansion};

use crate::error::OracleError;
use crate::rpc::RpcClient;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Oldest Neovim with `vim.treesitter.get_captures_at_pos`, `nvim_get_hl`,
/// and `vim.fs.joinpath`.
pub const MIN_VERSION: &str = "0.10";

const VERSION_LUA: &str = "local v = vim.version() return v.major .. '.' .. v.minor .. '.' .. v.patch";

/// Loads `<config parent>/nvcat/init.lua` or `init.vim`, returning the file
/// that was sourced (or nil).
const LOAD_CONFIG_LUA: &str = r"
local dir = vim.fs.joinpath(vim.fn.fnamemodify(vim.fn.stdpath('config'), ':h'), 'nvcat')
vim.opt.runtimepath:append(dir)
for _, name in ipairs({ 'init.lua', 'init.vim' }) do
  local file = vim.fs.joinpath(dir, name)
  if vim.fn.filereadable(file) == 1 then
    vim.cmd.source(vim.fn.fnameescape(file))
    return file
  end
end
return nil
";

/// Defines `NvcatGetHl(row, col)`: the last treesitter capture at the
/// position, else the legacy syntax item, else an empty dict.
const INSTALL_QUERY_LUA: &str = r"
function NvcatGetHl(row, col)
  local ok, captures = pcall(vim.treesitter.get_captures_at_pos, 0, row, col)
  if ok and #captures > 0 then
    local name = '@' .. captures[#captures].capture
    return vim.api.nvim_get_hl(0, { name = name, link = false, create = false })
  end
  local id = vim.fn.synID(row + 1, col + 1, 1)
  if id == 0 then
    return vim.empty_dict()
  end
  return vim.api.nvim_get_hl(0, { id = id, link = false, create = false })
end
";

const QUERY_LUA: &str = "return NvcatGetHl(...)";

// ---------------------------------------------------------------------------
// TabSettings
// ---------------------------------------------------------------------------

/// Neovim's tab options after the user config has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSettings {
    pub expandtab: bool,
    pub tabstop: usize,
}

impl TabSettings {
    /// Tabs always become `tabstop` spaces, whatever `expandtab` says.
    #[must_use]
    pub fn expansion(&self) -> TabExpansion {
        TabExpansion::new(self.tabstop)
    }
}

// ---------------------------------------------------------------------------
// Attribute decoding
// ---------------------------------------------------------------------------

/// Turn an `nvim_get_hl` reply into [`RawAttributes`].
///
/// A map is read for `fg`, `bold`, `italic` and `underline`; other keys and
/// values of the wrong type are ignored. An empty array is accepted as an
/// empty map, since Lua cannot tell the two apart. Any other shape is
/// `None`.
#[must_use]
pub fn decode_attributes(reply: &Value) -> Option<RawAttributes> {
    let entries: &[(Value, Value)] = match reply {
        Value::Map(entries) => entries,
        Value::Array(items) if items.is_empty() => &[],
        _ => return None,
    };

    let mut raw = RawAttributes::default();
    for (key, value) in entries {
        match key.as_str() {
            Some("fg") => raw.fg = value.as_i64(),
            Some("bold") => raw.bold = value.as_bool(),
            Some("italic") => raw.italic = value.as_bool(),
            Some("underline") => raw.underline = value.as_bool(),
            _ => {}
        }
    }
    Some(raw)
}

fn int(n: usize) -> Value {
    Value::from(u64::try_from(n).unwrap_or(u64::MAX))
}

// ---------------------------------------------------------------------------
// Nvim
// ---------------------------------------------------------------------------

/// A connected Neovim instance.
pub struct Nvim<R, W> {
    rpc: RpcClient<R, W>,
}

impl<R: Read, W: Write> Nvim<R, W> {
    #[must_use]
    pub const fn new(rpc: RpcClient<R, W>) -> Self {
        Self { rpc }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> RpcClient<R, W> {
        self.rpc
    }

    // -- API calls ----------------------------------------------------------

    /// `nvim_exec_lua` — run `code` with `args` bound to `...`.
    ///
    /// # Errors
    ///
    /// Lua errors come back as [`OracleError::Remote`].
    pub fn exec_lua(&mut self, code: &str, args: Vec<Value>) -> Result<Value, OracleError> {
        self.rpc
            .call("nvim_exec_lua", vec![Value::from(code), Value::Array(args)])
    }

    /// `nvim_command` — run one Ex command.
    ///
    /// # Errors
    ///
    /// [`OracleError::Remote`] when the command fails.
    pub fn command(&mut self, command: &str) -> Result<(), OracleError> {
        self.rpc.call("nvim_command", vec![Value::from(command)])?;
        Ok(())
    }

    /// `nvim_call_function` — call a Vimscript function.
    ///
    /// # Errors
    ///
    /// [`OracleError::Remote`] when the function throws.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, OracleError> {
        self.rpc
            .call("nvim_call_function", vec![Value::from(name), Value::Array(args)])
    }

    /// `nvim_get_option_value` with the default (global/current) scope.
    ///
    /// # Errors
    ///
    /// [`OracleError::Remote`] for unknown options.
    pub fn get_option(&mut self, name: &str) -> Result<Value, OracleError> {
        self.rpc
            .call("nvim_get_option_value", vec![Value::from(name), Value::Map(Vec::new())])
    }

    /// `nvim_ui_attach` with true-color enabled.
    ///
    /// # Errors
    ///
    /// [`OracleError::Remote`] if a UI is already attached.
    pub fn ui_attach(&mut self, width: usize, height: usize) -> Result<(), OracleError> {
        let options = Value::Map(vec![(Value::from("rgb"), Value::from(true))]);
        self.rpc
            .call("nvim_ui_attach", vec![int(width), int(height), options])?;
        Ok(())
    }

    // -- Startup steps ------------------------------------------------------

    /// Fail unless this Neovim is at least [`MIN_VERSION`].
    ///
    /// # Errors
    ///
    /// [`OracleError::IncompatibleVersion`], or any RPC error from `has()`.
    pub fn check_version(&mut self) -> Result<(), OracleError> {
        let feature = format!("nvim-{MIN_VERSION}");
        let has = self.call_function("has", vec![Value::from(feature)])?;
        if has.as_i64() == Some(1) {
            return Ok(());
        }
        let found = self
            .exec_lua(VERSION_LUA, Vec::new())
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| "(unknown)".to_owned());
        Err(OracleError::IncompatibleVersion {
            found,
            required: MIN_VERSION,
        })
    }

    /// Source the nvcat-specific user config, if there is one.
    ///
    /// Returns the file that was loaded.
    ///
    /// # Errors
    ///
    /// Whatever the config itself raised. Callers treat this as a warning.
    pub fn load_user_config(&mut self) -> Result<Option<PathBuf>, OracleError> {
        let loaded = self.exec_lua(LOAD_CONFIG_LUA, Vec::new())?;
        Ok(loaded.as_str().map(PathBuf::from))
    }

    /// Read `expandtab` and `tabstop`.
    ///
    /// # Errors
    ///
    /// [`OracleError::Option`] if either cannot be read or `tabstop` is not
    /// a positive integer.
    pub fn tab_settings(&mut self) -> Result<TabSettings, OracleError> {
        let expandtab = self.option("expandtab")?;
        let expandtab = expandtab.as_bool().ok_or_else(|| OracleError::Option {
            name: "expandtab",
            reason: format!("expected a boolean, got {expandtab}"),
        })?;

        let tabstop = self.option("tabstop")?;
        let tabstop = tabstop
            .as_u64()
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| OracleError::Option {
                name: "tabstop",
                reason: format!("expected a positive integer, got {tabstop}"),
            })?;

        Ok(TabSettings { expandtab, tabstop })
    }

    fn option(&mut self, name: &'static str) -> Result<Value, OracleError> {
        self.get_option(name).map_err(|err| OracleError::Option {
            name,
            reason: err.to_string(),
        })
    }

    /// `:edit` the file at `path`.
    ///
    /// # Errors
    ///
    /// [`OracleError::Protocol`] for a path that is not UTF-8, otherwise
    /// whatever `:edit` reports.
    pub fn edit(&mut self, path: &Path) -> Result<(), OracleError> {
        let path = path.to_str().ok_or_else(|| {
            OracleError::Protocol(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        let escaped = self.call_function("fnameescape", vec![Value::from(path)])?;
        let escaped = escaped
            .as_str()
            .ok_or_else(|| OracleError::Protocol(format!("fnameescape returned {escaped}")))?;
        self.command(&format!("edit {escaped}"))
    }

    /// Define `NvcatGetHl` in the Lua global scope.
    ///
    /// # Errors
    ///
    /// Any RPC error. Without the function every later query fails.
    pub fn install_query(&mut self) -> Result<(), OracleError> {
        self.exec_lua(INSTALL_QUERY_LUA, Vec::new())?;
        Ok(())
    }

    /// Raw highlight reply for `(row, col)`, both 0-based.
    ///
    /// # Errors
    ///
    /// Any RPC error.
    pub fn highlight_at(&mut self, row: usize, col: usize) -> Result<Value, OracleError> {
        self.exec_lua(QUERY_LUA, vec![int(row), int(col)])
    }
}

impl<R: Read, W: Write> HighlightResolver for Nvim<R, W> {
    fn resolve(&mut self, row: usize, col: usize) -> Result<RawAttributes, QueryFailure> {
        let reply = self
            .highlight_at(row, col)
            .map_err(|err| QueryFailure::new(row, col, err.to_string()))?;
        decode_attributes(&reply).ok_or_else(|| {
            QueryFailure::new(row, col, format!("unexpected highlight reply: {reply}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
