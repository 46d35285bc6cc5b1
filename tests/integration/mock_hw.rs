//! Mock adapters for integration tests.
//!
//! Two levels of fake:
//! - [`MockHardware`] implements the port traits directly, for tests of
//!   orchestration logic.
//! - [`Bench`] implements `TransportFactory`, so the real `BoardRig`,
//!   sensors, drivers and transaction manager run against scripted
//!   board replies.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};

use irrigator::app::events::CycleEvent;
use irrigator::app::ports::{ActuatorPort, Clock, EventSink, RecordSink, SensorPort};
use irrigator::config::{BoardEndpoint, Channel, ChannelSet, SystemConfig};
use irrigator::error::{FormatFault, LogError, TransactionError};
use irrigator::fsm::context::{Rgb, Thermal};
use irrigator::link::transport::{Transport, TransportFactory};
use irrigator::record::LogRecord;

pub const MOISTURE_PORT: &str = "bench/moisture";
pub const THERMAL_PORT: &str = "bench/thermal";
pub const PUMP_PORT: &str = "bench/pump";
pub const MOTOR_PORT: &str = "bench/motor";
pub const CAMERA_PORT: &str = "bench/camera";

// ── Config helpers ────────────────────────────────────────────

fn bench_endpoint(port: &str) -> BoardEndpoint {
    BoardEndpoint {
        settle_delay_ms: 0,
        timeout_ms: 50,
        ..BoardEndpoint::new(port)
    }
}

pub fn channels(symbols: &str) -> ChannelSet {
    symbols
        .chars()
        .map(|c| Channel::new(c).unwrap())
        .collect()
}

pub fn ch(symbol: char) -> Channel {
    Channel::new(symbol).unwrap()
}

/// Default config with bench ports, no delays and the given channels.
pub fn bench_config(symbols: &str) -> SystemConfig {
    let mut cfg = SystemConfig {
        channels: channels(symbols),
        channel_pause_ms: 0,
        ..Default::default()
    };
    cfg.boards.moisture = bench_endpoint(MOISTURE_PORT);
    cfg.boards.thermal = bench_endpoint(THERMAL_PORT);
    cfg.boards.pump = bench_endpoint(PUMP_PORT);
    cfg.boards.motor = bench_endpoint(MOTOR_PORT);
    cfg
}

pub fn with_camera(mut cfg: SystemConfig) -> SystemConfig {
    cfg.boards.vision = Some(bench_endpoint(CAMERA_PORT));
    cfg
}

// ── FixedClock ────────────────────────────────────────────────

pub struct FixedClock;

impl FixedClock {
    pub fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        Self::instant()
    }
}

// ── Bench (scripted transport) ────────────────────────────────

#[derive(Default)]
struct BenchState {
    replies: HashMap<String, VecDeque<String>>,
    writes: Vec<(String, String)>,
    unplugged: Vec<String>,
    opens: usize,
    closes: usize,
}

/// Scripted boards keyed by port.  Clones share state, so a test keeps
/// one handle while the rig owns another.
#[derive(Clone, Default)]
pub struct Bench {
    state: Rc<RefCell<BenchState>>,
}

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response line on `port`.
    pub fn reply(&self, port: &str, line: &str) -> &Self {
        self.state
            .borrow_mut()
            .replies
            .entry(port.to_string())
            .or_default()
            .push_back(line.to_string());
        self
    }

    /// Make every open of `port` fail.
    pub fn unplug(&self, port: &str) -> &Self {
        self.state.borrow_mut().unplugged.push(port.to_string());
        self
    }

    /// Commands written to `port`, terminator stripped, in order.
    pub fn writes_to(&self, port: &str) -> Vec<String> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(p, _)| p == port)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Every write across the rig, as `port:command`.
    pub fn transcript(&self) -> Vec<String> {
        self.state
            .borrow()
            .writes
            .iter()
            .map(|(p, c)| format!("{p}:{c}"))
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }

    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }
}

pub struct BenchPort {
    port: String,
    state: Rc<RefCell<BenchState>>,
}

impl Transport for BenchPort {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let command = String::from_utf8_lossy(data).trim_end().to_string();
        self.state
            .borrow_mut()
            .writes
            .push((self.port.clone(), command));
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .state
            .borrow_mut()
            .replies
            .get_mut(&self.port)
            .and_then(VecDeque::pop_front))
    }
}

impl Drop for BenchPort {
    fn drop(&mut self) {
        self.state.borrow_mut().closes += 1;
    }
}

impl TransportFactory for Bench {
    type Transport = BenchPort;

    fn open(&mut self, endpoint: &BoardEndpoint) -> io::Result<BenchPort> {
        let mut state = self.state.borrow_mut();
        if state.unplugged.contains(&endpoint.port) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "unplugged"));
        }
        state.opens += 1;
        Ok(BenchPort {
            port: endpoint.port.clone(),
            state: Rc::clone(&self.state),
        })
    }
}

// ── MockHardware (port-level fake) ────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Pump(Channel),
    Motor,
}

/// Per-channel scripted readings; channels without a script read
/// 42 % moisture, 30.0 / 28.3 °C.
#[derive(Default)]
pub struct MockHardware {
    pub moisture: HashMap<char, Result<f64, ()>>,
    pub thermal: HashMap<char, (f64, f64)>,
    pub rgb: Option<Rgb>,
    pub pump_fails: bool,
    pub motor_fails: bool,
    pub calls: Vec<ActuatorCall>,
    pub current: Option<Channel>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pumped(&self) -> Vec<Channel> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Pump(ch) => Some(*ch),
                ActuatorCall::Motor => None,
            })
            .collect()
    }

    pub fn motor_moves(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Motor)
            .count()
    }
}

fn scripted_timeout(port: &str) -> TransactionError {
    TransactionError::Timeout {
        port: port.into(),
        command: "?".into(),
        timeout: Duration::from_millis(50),
    }
}

impl SensorPort for MockHardware {
    fn read_moisture(&mut self, channel: Channel) -> Result<f64, TransactionError> {
        self.current = Some(channel);
        match self.moisture.get(&channel.symbol()) {
            Some(Ok(v)) => Ok(*v),
            Some(Err(())) => Err(TransactionError::Format {
                port: "mock/moisture".into(),
                line: "wet".into(),
                fault: FormatFault::NotNumeric {
                    field: "wet".into(),
                },
            }),
            None => Ok(42.0),
        }
    }

    fn read_temperature(&mut self) -> Result<Thermal, TransactionError> {
        let symbol = self.current.map(Channel::symbol).unwrap_or('?');
        let (ambient_c, object_c) = self.thermal.get(&symbol).copied().unwrap_or((30.0, 28.3));
        if ambient_c.is_nan() {
            return Err(scripted_timeout("mock/thermal"));
        }
        Ok(Thermal {
            ambient_c,
            object_c,
        })
    }

    fn capture_rgb(&mut self) -> Option<Rgb> {
        self.rgb
    }
}

impl ActuatorPort for MockHardware {
    fn trigger_pump(&mut self, channel: Channel) -> Result<(), TransactionError> {
        if self.pump_fails {
            return Err(scripted_timeout("mock/pump"));
        }
        self.calls.push(ActuatorCall::Pump(channel));
        Ok(())
    }

    fn advance_motor(&mut self) -> Result<Option<String>, TransactionError> {
        if self.motor_fails {
            return Err(scripted_timeout("mock/motor"));
        }
        self.calls.push(ActuatorCall::Motor);
        Ok(None)
    }
}

// ── MemoryLog ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLog {
    pub records: Vec<LogRecord>,
    pub failing: bool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemoryLog {
    fn initialize(&mut self) -> Result<bool, LogError> {
        Ok(true)
    }

    fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        if self.failing {
            return Err(LogError::Io {
                path: "memory".into(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        self.records.push(record.clone());
        Ok(())
    }
}

// ── VecSink ───────────────────────────────────────────────────

/// Event sink that stores every emitted event.
#[derive(Default)]
pub struct VecSink {
    pub events: Vec<CycleEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&CycleEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &CycleEvent) {
        self.events.push(event.clone());
    }
}
