//! Synchronous msgpack-RPC client.
//!
//! Neovim speaks msgpack-RPC over its stdio when started with `--embed`.
//! Every message is one msgpack array:
//!
//! | Kind | Shape |
//! |------|-------|
//! | request | `[0, id, method, params]` |
//! | response | `[1, id, error, result]` |
//! | notification | `[2, method, params]` |
//!
//! The client sends one request and then reads until the matching response
//! arrives. Anything else that shows up in between is dealt with inline:
//! notifications (mostly `redraw` batches from the attached UI) are
//! dropped, and requests from Neovim get an error reply so Neovim never
//! waits on us.

use std::io::{Read, Write};

use rmpv::Value;

use crate::error::OracleError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

const REQUEST: u64 = 0;
const RESPONSE: u64 = 1;
const NOTIFICATION: u64 = 2;

/// An incoming message, classified by its type tag.
#[derive(Debug, Clone, PartialEq)]
enum Incoming {
    Request { id: u64, method: String },
    Response { id: u64, error: Value, result: Value },
    Notification { method: String },
}

impl Incoming {
    fn parse(message: Value) -> Result<Self, OracleError> {
        let mut items = match message {
            Value::Array(items) => items,
            other => return Err(OracleError::Protocol(format!("not an array: {other}"))),
        };
        let kind = items.first().and_then(Value::as_u64);

        match (kind, items.len()) {
            (Some(REQUEST), 4) => Ok(Self::Request {
                id: id_of(&items[1])?,
                method: method_of(&items[2])?,
            }),
            (Some(RESPONSE), 4) => {
                let id = id_of(&items[1])?;
                let result = items.pop().unwrap_or(Value::Nil);
                let error = items.pop().unwrap_or(Value::Nil);
                Ok(Self::Response { id, error, result })
            }
            (Some(NOTIFICATION), 3) => Ok(Self::Notification {
                method: method_of(&items[1])?,
            }),
            _ => Err(OracleError::Protocol(format!(
                "unknown message shape: {}",
                Value::Array(items)
            ))),
        }
    }
}

fn id_of(value: &Value) -> Result<u64, OracleError> {
    value
        .as_u64()
        .ok_or_else(|| OracleError::Protocol(format!("bad message id: {value}")))
}

fn method_of(value: &Value) -> Result<String, OracleError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| OracleError::Protocol(format!("bad method name: {value}")))
}

/// Neovim reports errors as `[type, message]`. Fall back to the raw value
/// for anything else.
fn remote_message(error: &Value) -> String {
    error
        .as_array()
        .and_then(|parts| parts.get(1))
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), str::to_owned)
}

// ---------------------------------------------------------------------------
// RpcClient
// ---------------------------------------------------------------------------

/// msgpack-RPC over a reader/writer pair.
///
/// Generic over the transport so tests can drive it with in-memory
/// buffers; in production it is the child's stdout and stdin.
pub struct RpcClient<R, W> {
    reader: R,
    writer: W,
    next_id: u64,
}

impl<R: Read, W: Write> RpcClient<R, W> {
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            next_id: 0,
        }
    }

    /// Call `method` with `args` and wait for its result.
    ///
    /// # Errors
    ///
    /// [`OracleError::Remote`] when Neovim answers with an error; transport
    /// and decoding errors otherwise.
    pub fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, OracleError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = Value::Array(vec![
            Value::from(REQUEST),
            Value::from(id),
            Value::from(method),
            Value::Array(args),
        ]);
        self.send(&request)?;

        loop {
            let message = rmpv::decode::read_value(&mut self.reader)?;
            match Incoming::parse(message)? {
                Incoming::Response {
                    id: got,
                    error,
                    result,
                } if got == id => {
                    return if error.is_nil() {
                        Ok(result)
                    } else {
                        Err(OracleError::Remote {
                            method: method.to_owned(),
                            message: remote_message(&error),
                        })
                    };
                }
                Incoming::Response { id: got, .. } => {
                    log::trace!("dropping response to unknown request {got}");
                }
                Incoming::Notification { method } => {
                    log::trace!("skipping notification '{method}'");
                }
                Incoming::Request { id: peer, method } => {
                    log::trace!("refusing request '{method}' from neovim");
                    self.send(&Value::Array(vec![
                        Value::from(RESPONSE),
                        Value::from(peer),
                        Value::from(format!("nvcat does not handle '{method}'")),
                        Value::Nil,
                    ]))?;
                }
            }
        }
    }

    fn send(&mut self, message: &Value) -> Result<(), OracleError> {
        rmpv::encode::write_value(&mut self.writer, message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Give back the transport.
    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
