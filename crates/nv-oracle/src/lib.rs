//! # nv-oracle — Neovim as nvcat's highlighting oracle
//!
//! nvcat does not highlight anything itself. It starts an embedded Neovim
//! (`nvim --embed --headless`), opens the file there, and asks Neovim what
//! highlight applies at each position. This crate owns that conversation:
//!
//! - **[`rpc`]** — a synchronous msgpack-RPC client over any byte stream
//! - **[`nvim`]** — typed wrappers for the few API calls nvcat needs, the
//!   startup steps, and the [`HighlightResolver`](nv_render::HighlightResolver)
//!   implementation
//! - **[`oracle`]** — spawning the child process and running startup
//! - **[`error`]** — [`OracleError`]
//!
//! Exactly one request is ever in flight. Every query is a blocking round
//! trip; nothing here needs threads or an event loop.

pub mod error;
pub mod nvim;
pub mod oracle;
pub mod rpc;

pub use error::OracleError;
pub use nvim::{Nvim, TabSettings, decode_attributes};
pub use oracle::{Oracle, OracleConfig};
pub use rpc::RpcClient;
