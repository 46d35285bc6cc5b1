//! Board adapter: bridges the attached boards to domain port traits.
//!
//! Owns the [`TransactionManager`] together with every sensor and
//! actuator wrapper, exposing them through [`SensorPort`] and
//! [`ActuatorPort`].  Generic over the transport factory: serial ports in
//! production, scripted benches in tests.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::{Channel, SystemConfig};
use crate::drivers::motor::MotorDriver;
use crate::drivers::pump::PumpDriver;
use crate::error::TransactionError;
use crate::fsm::context::{Rgb, Thermal};
use crate::link::TransactionManager;
use crate::link::transport::TransportFactory;
use crate::sensors::moisture::MoistureProbe;
use crate::sensors::thermal::ThermalProbe;
use crate::sensors::vision::Camera;

/// Concrete adapter that combines all boards behind port traits.
pub struct BoardRig<F: TransportFactory> {
    link: TransactionManager<F>,
    moisture: MoistureProbe,
    thermal: ThermalProbe,
    camera: Option<Camera>,
    pump: PumpDriver,
    motor: MotorDriver,
}

impl<F: TransportFactory> BoardRig<F> {
    pub fn from_config(config: &SystemConfig, factory: F) -> Self {
        let boards = &config.boards;
        let commands = &config.commands;
        Self {
            link: TransactionManager::new(factory),
            moisture: MoistureProbe::new(boards.moisture.clone()),
            thermal: ThermalProbe::new(boards.thermal.clone(), commands.thermal.clone()),
            camera: boards
                .vision
                .clone()
                .map(|endpoint| Camera::new(endpoint, commands.vision.clone())),
            pump: PumpDriver::new(boards.pump.clone()),
            motor: MotorDriver::new(boards.motor.clone(), commands.motor.clone()),
        }
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<F: TransportFactory> SensorPort for BoardRig<F> {
    fn read_moisture(&mut self, channel: Channel) -> Result<f64, TransactionError> {
        self.moisture.read(&mut self.link, channel)
    }

    fn read_temperature(&mut self) -> Result<Thermal, TransactionError> {
        self.thermal.read(&mut self.link)
    }

    fn capture_rgb(&mut self) -> Option<Rgb> {
        self.camera
            .as_ref()
            .map(|camera| camera.capture(&mut self.link))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<F: TransportFactory> ActuatorPort for BoardRig<F> {
    fn trigger_pump(&mut self, channel: Channel) -> Result<(), TransactionError> {
        self.pump.trigger(&mut self.link, channel)
    }

    fn advance_motor(&mut self) -> Result<Option<String>, TransactionError> {
        self.motor.advance(&mut self.link)
    }
}
