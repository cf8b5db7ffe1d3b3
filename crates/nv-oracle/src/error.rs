//! Oracle errors.
//!
//! Everything here is fatal at startup. Once rendering has begun, a failed
//! call is reported to the renderer as a `QueryFailure` instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    /// The Neovim binary could not be started.
    #[error("cannot start '{}'", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the child failed.
    #[error("neovim connection: {0}")]
    Io(#[from] io::Error),

    #[error("cannot encode request: {0}")]
    Encode(String),

    /// The byte stream ended or was not valid msgpack.
    #[error("cannot decode neovim message: {0}")]
    Decode(String),

    /// Valid msgpack that is not a well-formed RPC message.
    #[error("unexpected neovim message: {0}")]
    Protocol(String),

    /// Neovim answered with an error.
    #[error("{method} failed: {message}")]
    Remote { method: String, message: String },

    #[error("neovim {found} is too old, nvcat needs {required} or newer")]
    IncompatibleVersion { found: String, required: &'static str },

    /// An editor option could not be read or has an unusable value.
    #[error("cannot read option '{name}': {reason}")]
    Option { name: &'static str, reason: String },
}

impl From<rmpv::encode::Error> for OracleError {
    fn from(err: rmpv::encode::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<rmpv::decode::Error> for OracleError {
    fn from(err: rmpv::decode::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
