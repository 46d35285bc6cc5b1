//! Camera board reporting the average canopy colour.
//!
//! Capture and pixel averaging happen on the board; this side only
//! receives `r,g,b`.  Any failure degrades to [`Rgb::ZERO`] so a flaky
//! camera never costs a channel its record.

use log::warn;

use crate::config::BoardEndpoint;
use crate::fsm::context::Rgb;
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;

pub struct Camera {
    endpoint: BoardEndpoint,
    command: String,
}

impl Camera {
    pub fn new(endpoint: BoardEndpoint, command: impl Into<String>) -> Self {
        Self {
            endpoint,
            command: command.into(),
        }
    }

    pub fn capture<F: TransportFactory>(&self, link: &mut TransactionManager<F>) -> Rgb {
        match link.execute(&self.endpoint, &self.command, 3) {
            Ok(fields) => Rgb::from_components(fields[0], fields[1], fields[2]),
            Err(e) => {
                warn!("Camera capture failed, using zero colour: {}", e);
                Rgb::ZERO
            }
        }
    }
}
