//! Transport abstraction for any line-oriented byte channel to a board.
//!
//! Concrete implementations:
//! - USB serial (`adapters::serial`, one port per board)
//! - scripted in-memory benches in tests
//!
//! The transaction manager is generic over [`TransportFactory`], so adding a
//! new transport requires zero changes to the exchange logic.

use std::io;

use crate::config::BoardEndpoint;

/// An open connection to one board.
///
/// Dropping the value releases the underlying device; the transaction
/// manager relies on this to close the port on every exit path.
pub trait Transport {
    /// Write all of `data` and flush it to the device.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Block for at most the endpoint timeout waiting for one line.
    ///
    /// Returns `Ok(None)` if nothing arrived in the window.  The returned
    /// line has its terminator stripped.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Opens transports for endpoints.
pub trait TransportFactory {
    type Transport: Transport;

    fn open(&mut self, endpoint: &BoardEndpoint) -> io::Result<Self::Transport>;
}
