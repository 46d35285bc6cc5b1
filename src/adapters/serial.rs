//! USB serial transport.
//!
//! Every transaction opens the board's tty, which resets the board (hence
//! the settle delay in the transaction manager), and closes it again when
//! the [`SerialTransport`] is dropped.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use log::trace;
use serialport::SerialPort;

use crate::config::BoardEndpoint;
use crate::link::codec::LineDecoder;
use crate::link::transport::{Transport, TransportFactory};

/// Opens [`SerialTransport`]s with the endpoint's baud rate and timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialTransportFactory;

impl TransportFactory for SerialTransportFactory {
    type Transport = SerialTransport;

    fn open(&mut self, endpoint: &BoardEndpoint) -> io::Result<SerialTransport> {
        let port = serialport::new(&endpoint.port, endpoint.baud_rate)
            .timeout(endpoint.timeout())
            .open()?;
        trace!("opened {} @ {} baud", endpoint.port, endpoint.baud_rate);
        Ok(SerialTransport {
            port,
            timeout: endpoint.timeout(),
            decoder: LineDecoder::new(),
        })
    }
}

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    timeout: Duration,
    decoder: LineDecoder,
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    /// Reads until `\n` or the endpoint timeout.  Bytes received before
    /// the deadline without a terminator are returned as the line.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 64];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(self.decoder.take_partial());
            }
            self.port.set_timeout(remaining)?;

            match self.port.read(&mut buf) {
                Ok(0) => return Ok(self.decoder.take_partial()),
                Ok(n) => {
                    if let Some(line) = self.decoder.feed(&buf[..n]) {
                        return Ok(Some(line));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Ok(self.decoder.take_partial());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}
