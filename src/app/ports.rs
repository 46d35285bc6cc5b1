//! Port traits: the hexagonal boundary between the cycle engine and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CycleOrchestrator (domain)
//! ```
//!
//! Driven adapters (boards, record log, event sinks, clock, config file)
//! implement these traits.  The
//! [`CycleOrchestrator`](super::orchestrator::CycleOrchestrator) consumes
//! them via generics, so the domain core never touches a serial port or a
//! file directly.

use chrono::NaiveDateTime;

use crate::config::{Channel, SystemConfig};
use crate::error::{ConfigError, LogError, TransactionError};
use crate::fsm::context::{Rgb, Thermal};
use crate::record::LogRecord;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: boards → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the orchestrator calls this to obtain telemetry.
pub trait SensorPort {
    /// Soil moisture (%) for one channel.
    fn read_moisture(&mut self, channel: Channel) -> Result<f64, TransactionError>;

    /// Ambient and canopy temperature.
    fn read_temperature(&mut self) -> Result<Thermal, TransactionError>;

    /// Average canopy colour.
    ///
    /// `None` when no camera is fitted.  A fitted camera that fails
    /// reports [`Rgb::ZERO`]; this call never errors.
    fn capture_rgb(&mut self) -> Option<Rgb>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → boards)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the orchestrator calls this to command actuators.
pub trait ActuatorPort {
    /// Run the pump for one channel.
    fn trigger_pump(&mut self, channel: Channel) -> Result<(), TransactionError>;

    /// Advance the positioning motor.  Returns the board's echo line,
    /// if it sent one.
    fn advance_motor(&mut self) -> Result<Option<String>, TransactionError>;
}

// ───────────────────────────────────────────────────────────────
// Record sink port (driven adapter: domain → persistent log)
// ───────────────────────────────────────────────────────────────

/// Append-only record store.
pub trait RecordSink {
    /// Create the store and its header if absent.
    /// Returns `true` if it was created by this call.
    fn initialize(&mut self) -> Result<bool, LogError>;

    /// Append one row.
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The orchestrator emits structured [`CycleEvent`](super::events::CycleEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::CycleEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for record timestamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST validate before returning.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
