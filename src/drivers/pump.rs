//! Irrigation pump board.
//!
//! The board runs the pump line named by the channel symbol for its own
//! fixed watering time, then stops.  Nothing is read back; a completed
//! write counts as success.

use log::info;

use crate::config::{BoardEndpoint, Channel};
use crate::error::TransactionError;
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;

pub struct PumpDriver {
    endpoint: BoardEndpoint,
}

impl PumpDriver {
    pub fn new(endpoint: BoardEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn trigger<F: TransportFactory>(
        &self,
        link: &mut TransactionManager<F>,
        channel: Channel,
    ) -> Result<(), TransactionError> {
        link.execute(&self.endpoint, &channel.command(), 0)?;
        info!("Pump command sent for channel {}", channel);
        Ok(())
    }
}
