//! Source file — the text being rendered.
//!
//! A `Source` is read once, validated, and then only borrowed. Validation
//! happens here, before any oracle is started, so that a file we refuse to
//! render never produces partial output.
//!
//! # Rules
//!
//! - **Absolute path.** The oracle is a separate process with its own
//!   working directory, so the path handed to it must not be relative.
//!
//! - **No NUL bytes.** A single NUL anywhere marks the file as binary.
//!
//! - **UTF-8 only.** Columns are byte offsets shared with the oracle. Any
//!   lossy decoding would shift them, so invalid UTF-8 is rejected rather
//!   than replaced.
//!
//! - **Lines follow [`str::lines`].** `\n` and `\r\n` both terminate a
//!   line, and a trailing newline does not create an extra empty line.

use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Why a file cannot be rendered.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot resolve path '{}'", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' looks like a binary file", .path.display())]
    Binary { path: PathBuf },

    #[error("'{}' is not valid UTF-8", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// A validated input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    path: PathBuf,
    text: String,
}

impl Source {
    /// Resolve, read, and validate the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`InputError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let absolute = path::absolute(path).map_err(|source| InputError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = fs::read(&absolute).map_err(|source| InputError::Read {
            path: absolute.clone(),
            source,
        })?;
        Self::from_bytes(absolute, bytes)
    }

    /// Validate already-read content.
    ///
    /// # Errors
    ///
    /// [`InputError::Binary`] or [`InputError::Encoding`].
    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>) -> Result<Self, InputError> {
        if bytes.contains(&0) {
            return Err(InputError::Binary { path });
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Self { path, text }),
            Err(source) => Err(InputError::Encoding { path, source }),
        }
    }

    /// Absolute path of the file.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines without their terminators.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
