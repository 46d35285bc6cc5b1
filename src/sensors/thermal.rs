//! Non-contact IR thermometer board (ambient + canopy temperature).

use log::debug;

use crate::config::BoardEndpoint;
use crate::error::TransactionError;
use crate::fsm::context::Thermal;
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;

pub struct ThermalProbe {
    endpoint: BoardEndpoint,
    command: String,
}

impl ThermalProbe {
    pub fn new(endpoint: BoardEndpoint, command: impl Into<String>) -> Self {
        Self {
            endpoint,
            command: command.into(),
        }
    }

    /// Board reply is `ambient,object` in °C.
    pub fn read<F: TransportFactory>(
        &self,
        link: &mut TransactionManager<F>,
    ) -> Result<Thermal, TransactionError> {
        let fields = link.execute(&self.endpoint, &self.command, 2)?;
        let thermal = Thermal {
            ambient_c: fields[0],
            object_c: fields[1],
        };
        debug!(
            "ambient={}\u{00b0}C object={}\u{00b0}C",
            thermal.ambient_c, thermal.object_c
        );
        Ok(thermal)
    }
}
