//! Positioning motor board.
//!
//! Moves the sensor head on to the next plant.  The board may echo a
//! status line; it is kept for diagnostics only.

use log::debug;

use crate::config::BoardEndpoint;
use crate::error::TransactionError;
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;

pub struct MotorDriver {
    endpoint: BoardEndpoint,
    command: String,
}

impl MotorDriver {
    pub fn new(endpoint: BoardEndpoint, command: impl Into<String>) -> Self {
        Self {
            endpoint,
            command: command.into(),
        }
    }

    pub fn advance<F: TransportFactory>(
        &self,
        link: &mut TransactionManager<F>,
    ) -> Result<Option<String>, TransactionError> {
        let echo = link.write_then_peek(&self.endpoint, &self.command)?;
        match &echo {
            Some(line) => debug!("Motor echo: {}", line),
            None => debug!("Motor sent no echo"),
        }
        Ok(echo)
    }
}
