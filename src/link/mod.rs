//! Board link: single request/response exchanges with attached boards.
//!
//! ```text
//!  open ─▶ settle ─▶ write "<cmd>\n" ─▶ [read one line ─▶ parse N fields]
//!    │                                                         │
//!    └──────────── transport dropped (closed) on every path ◀──┘
//! ```
//!
//! Exchanges are never retried here.  The caller owns the skip policy;
//! this layer only reports what went wrong.

pub mod codec;
pub mod transport;

use std::io;
use std::thread;

use log::debug;

use crate::config::BoardEndpoint;
use crate::error::TransactionError;
use transport::{Transport, TransportFactory};

/// Executes transactions against board endpoints, one at a time.
pub struct TransactionManager<F: TransportFactory> {
    factory: F,
}

impl<F: TransportFactory> TransactionManager<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Send `command` and, if `expected_fields > 0`, read back exactly that
    /// many comma-separated decimals.
    ///
    /// With `expected_fields == 0` this returns `Ok(vec![])` as soon as the
    /// write completes; nothing is read.
    pub fn execute(
        &mut self,
        endpoint: &BoardEndpoint,
        command: &str,
        expected_fields: usize,
    ) -> Result<Vec<f64>, TransactionError> {
        let mut transport = self.open_and_send(endpoint, command)?;

        if expected_fields == 0 {
            return Ok(Vec::new());
        }

        let line = match transport.read_line() {
            Ok(Some(line)) if !line.trim().is_empty() => line,
            Ok(_) => return Err(timeout(endpoint, command)),
            Err(e) if is_timeout(&e) => return Err(timeout(endpoint, command)),
            Err(source) => {
                return Err(TransactionError::Io {
                    port: endpoint.port.clone(),
                    source,
                });
            }
        };

        codec::parse_fields(&line, expected_fields).map_err(|fault| TransactionError::Format {
            port: endpoint.port.clone(),
            line: line.trim().to_string(),
            fault,
        })
    }

    /// Send `command`, then try to read one line for diagnostics.
    ///
    /// Only opening and writing can fail; a missing or unreadable response
    /// yields `Ok(None)`.
    pub fn write_then_peek(
        &mut self,
        endpoint: &BoardEndpoint,
        command: &str,
    ) -> Result<Option<String>, TransactionError> {
        let mut transport = self.open_and_send(endpoint, command)?;

        match transport.read_line() {
            Ok(Some(line)) if !line.trim().is_empty() => Ok(Some(line.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) => {
                debug!("{}: no echo for '{}': {}", endpoint.port, command, e);
                Ok(None)
            }
        }
    }

    fn open_and_send(
        &mut self,
        endpoint: &BoardEndpoint,
        command: &str,
    ) -> Result<F::Transport, TransactionError> {
        let mut transport =
            self.factory
                .open(endpoint)
                .map_err(|source| TransactionError::TransportOpen {
                    port: endpoint.port.clone(),
                    source,
                })?;

        // Boards reset when the port opens; commands sent earlier are lost.
        thread::sleep(endpoint.settle_delay());

        let mut frame = String::with_capacity(command.len() + 1);
        frame.push_str(command);
        frame.push('\n');
        transport
            .write_all(frame.as_bytes())
            .map_err(|source| TransactionError::Io {
                port: endpoint.port.clone(),
                source,
            })?;

        debug!("{} <- '{}'", endpoint.port, command);
        Ok(transport)
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn timeout(endpoint: &BoardEndpoint, command: &str) -> TransactionError {
    TransactionError::Timeout {
        port: endpoint.port.clone(),
        command: command.to_string(),
        timeout: endpoint.timeout(),
    }
}
