//! Irrigator library.
//!
//! CWSI-driven irrigation cycle engine.  Exposes the domain core and its
//! adapters for the binary and for integration testing.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  BoardRig            CsvRecordLog   LogEventSink  SystemClock │
//! │  (Sensor+Actuator)   (RecordSink)   (EventSink)   (Clock)     │
//! │  SerialTransport     JsonConfigFile                           │
//! │  (TransportFactory)  (ConfigPort)                             │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ──────────────────      │
//! │                                                               │
//! │  ┌─────────────────────────────────────────────────────┐      │
//! │  │          CycleOrchestrator (pure logic)             │      │
//! │  │  PassState · StressEngine · DecisionPolicy          │      │
//! │  └─────────────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod link;
pub mod record;

pub mod adapters;
pub mod drivers;
pub mod sensors;
