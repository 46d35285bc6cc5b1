//! Line codec for board responses.
//!
//! Wire format:
//! ```text
//! ┌──────────┬───┬──────────┬───┬─────┬────┐
//! │ field 0  │ , │ field 1  │ , │ ... │ \n │
//! │ decimal  │   │ decimal  │   │     │    │
//! └──────────┴───┴──────────┴───┴─────┴────┘
//! ```
//!
//! [`LineDecoder`] accumulates raw bytes from partial reads and yields
//! complete lines; [`parse_fields`] validates and converts one line.

use crate::error::FormatFault;

/// Longest line we are willing to buffer before giving up on a terminator.
const MAX_LINE_LEN: usize = 256;

/// Field separator within a response line.
pub const FIELD_DELIMITER: char = ',';

/// Streaming line decoder.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the decoder.
    ///
    /// Returns the first complete line (terminator and any `\r` stripped)
    /// once a `\n` has been seen.  Bytes after the terminator are discarded:
    /// one exchange carries exactly one response line.
    pub fn feed(&mut self, data: &[u8]) -> Option<String> {
        for &byte in data {
            if byte == b'\n' {
                return Some(self.take());
            }
            if self.buf.len() < MAX_LINE_LEN {
                self.buf.push(byte);
            }
        }
        None
    }

    /// Whatever arrived without a terminator, if anything.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf)
            .trim_end_matches('\r')
            .to_string();
        self.buf.clear();
        line
    }
}

/// Split `line` on commas and parse exactly `expected` decimal fields.
pub fn parse_fields(line: &str, expected: usize) -> Result<Vec<f64>, FormatFault> {
    let parts: Vec<&str> = line.trim().split(FIELD_DELIMITER).collect();
    if parts.len() != expected {
        return Err(FormatFault::FieldCount {
            found: parts.len(),
            expected,
        });
    }

    parts
        .into_iter()
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| FormatFault::NotNumeric {
                    field: part.to_string(),
                })
        })
        .collect()
}
