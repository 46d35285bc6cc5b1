//! Capacitive soil-moisture board.
//!
//! One board serves every channel: sending the channel symbol selects the
//! probe, and the board answers with a single percentage.

use log::debug;

use crate::config::{BoardEndpoint, Channel};
use crate::error::TransactionError;
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;

pub struct MoistureProbe {
    endpoint: BoardEndpoint,
}

impl MoistureProbe {
    pub fn new(endpoint: BoardEndpoint) -> Self {
        Self { endpoint }
    }

    /// Soil moisture (%) for `channel`.
    pub fn read<F: TransportFactory>(
        &self,
        link: &mut TransactionManager<F>,
        channel: Channel,
    ) -> Result<f64, TransactionError> {
        let fields = link.execute(&self.endpoint, &channel.command(), 1)?;
        let percent = fields[0];
        debug!("[{}] moisture={}%", channel, percent);
        Ok(percent)
    }
}
