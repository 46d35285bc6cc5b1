//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the business rules of one irrigation cycle: channel
//! sequencing, skip-on-failure, stress computation and the watering
//! decision.  All interaction with boards and files happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod orchestrator;
pub mod ports;
