//! System configuration parameters
//!
//! All tunable parameters for the irrigation rig: board endpoints, the
//! channel alphabet, CWSI baselines, the watering threshold and the
//! stress strategy.  Values are loaded from a JSON file through
//! [`ConfigPort`](crate::app::ports::ConfigPort); anything missing falls
//! back to the defaults below, which match the calibrated bench setup.

use core::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on the channel alphabet.
pub const MAX_CHANNELS: usize = 16;

/// Fixed, ordered set of channels cycled through in one pass.
pub type ChannelSet = heapless::Vec<Channel, MAX_CHANNELS>;

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// One plant / sensor position, identified by a single ASCII symbol.
///
/// The symbol is also the wire command: the moisture board answers for
/// the probe it names and the pump board waters the matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(char);

impl Channel {
    pub fn new(symbol: char) -> Result<Self, ConfigError> {
        let channel = Self(symbol);
        channel.check()?;
        Ok(channel)
    }

    pub const fn symbol(self) -> char {
        self.0
    }

    /// Command string sent to the moisture and pump boards.
    pub fn command(self) -> String {
        self.0.to_string()
    }

    fn check(self) -> Result<(), ConfigError> {
        if self.0.is_ascii_alphanumeric() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed(format!(
                "channel symbol {:?} must be ASCII alphanumeric",
                self.0
            )))
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Board endpoints
// ---------------------------------------------------------------------------

/// Connection parameters for one attached board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEndpoint {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    #[serde(default = "default_baud")]
    pub baud_rate: u32,
    /// Upper bound on waiting for a response line.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Wait after opening, while the board finishes its reset-on-connect.
    #[serde(default = "default_settle_ms")]
    pub settle_delay_ms: u64,
}

fn default_baud() -> u32 {
    BoardEndpoint::DEFAULT_BAUD
}

fn default_timeout_ms() -> u64 {
    BoardEndpoint::DEFAULT_TIMEOUT_MS
}

fn default_settle_ms() -> u64 {
    BoardEndpoint::DEFAULT_SETTLE_MS
}

impl BoardEndpoint {
    pub const DEFAULT_BAUD: u32 = 9600;
    pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
    pub const DEFAULT_SETTLE_MS: u64 = 2000;

    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: Self::DEFAULT_BAUD,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            settle_delay_ms: Self::DEFAULT_SETTLE_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Every board role in the rig.  Vision is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boards {
    pub moisture: BoardEndpoint,
    pub thermal: BoardEndpoint,
    pub pump: BoardEndpoint,
    pub motor: BoardEndpoint,
    pub vision: Option<BoardEndpoint>,
}

impl Default for Boards {
    fn default() -> Self {
        Self {
            moisture: BoardEndpoint::new("/dev/ttyUSB1"),
            thermal: BoardEndpoint::new("/dev/ttyUSB0"),
            pump: BoardEndpoint::new("/dev/ttyUSB2"),
            motor: BoardEndpoint::new("/dev/ttyUSB3"),
            vision: None,
        }
    }
}

/// Fixed commands for the boards that are not addressed per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardCommands {
    /// Triggers an `ambient,object` reading on the IR board.
    pub thermal: String,
    /// Advances the positioning motor to the next plant.
    pub motor: String,
    /// Requests an `r,g,b` average from the camera board.
    pub vision: String,
}

impl Default for BoardCommands {
    fn default() -> Self {
        Self {
            thermal: "T".into(),
            motor: "M".into(),
            vision: "C".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stress
// ---------------------------------------------------------------------------

/// Calibrated canopy-air temperature differential baselines (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baselines {
    /// dT_LL: non-water-stressed (well watered) baseline.
    pub dt_ll: f64,
    /// dT_UL: fully stressed (drought) upper limit.
    pub dt_ul: f64,
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            dt_ll: -2.06,
            dt_ul: -1.33,
        }
    }
}

impl Baselines {
    /// `dt_ul - dt_ll`; the formula is undefined unless this is positive.
    pub fn span(&self) -> f64 {
        self.dt_ul - self.dt_ll
    }
}

/// Which stress engine to build at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StressStrategy {
    /// Temperature-differential CWSI formula using [`Baselines`].
    Formula,
    /// Pre-trained regression model loaded from a JSON file.
    Model { model_path: PathBuf },
}

/// What to do with a channel whose model prediction failed.
///
/// Either way the pump is skipped and the motor advances.  The
/// invalid-baseline sentinel is always logged regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionFailurePolicy {
    /// Log the row with the prediction-failure sentinel.
    #[default]
    RecordAndContinue,
    /// Write no record for the channel.
    SkipRecord,
}

// ---------------------------------------------------------------------------
// SystemConfig
// ---------------------------------------------------------------------------

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Channels ---
    /// Cycled in this order, once per pass.
    pub channels: ChannelSet,

    // --- Boards ---
    pub boards: Boards,
    pub commands: BoardCommands,

    // --- Stress ---
    pub baselines: Baselines,
    /// CWSI at or above which the pump is triggered.
    pub watering_threshold: f64,
    pub stress: StressStrategy,
    pub prediction_failure: PredictionFailurePolicy,

    // --- Record log ---
    pub log_path: PathBuf,

    // --- Timing ---
    /// Pause after each processed channel (milliseconds).
    pub channel_pause_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channels: ['A', 'B', 'C', 'D', 'E'].into_iter().map(Channel).collect(),

            boards: Boards::default(),
            commands: BoardCommands::default(),

            baselines: Baselines::default(),
            watering_threshold: 0.4,
            stress: StressStrategy::Formula,
            prediction_failure: PredictionFailurePolicy::RecordAndContinue,

            log_path: PathBuf::from("dual_sensor_readings.csv"),

            channel_pause_ms: 1000,
        }
    }
}

impl SystemConfig {
    pub fn channel_pause(&self) -> Duration {
        Duration::from_millis(self.channel_pause_ms)
    }

    /// Range-check every field.
    ///
    /// Inverted baselines are *not* rejected: the formula reports them
    /// per channel as the `-9.99` sentinel so the rig keeps logging raw
    /// telemetry while the calibration is fixed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "channels must name at least one channel".into(),
            ));
        }
        for (i, channel) in self.channels.iter().enumerate() {
            channel.check()?;
            if self.channels[..i].contains(channel) {
                return Err(ConfigError::ValidationFailed(format!(
                    "channel {channel} is listed twice"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.watering_threshold) {
            return Err(ConfigError::ValidationFailed(
                "watering_threshold must be 0.0–1.0".into(),
            ));
        }
        if !self.baselines.dt_ll.is_finite() || !self.baselines.dt_ul.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "baselines must be finite".into(),
            ));
        }
        if self.baselines.span() <= 0.0 {
            warn!(
                "CWSI baselines inverted (dT_UL={} <= dT_LL={}); formula will report -9.99",
                self.baselines.dt_ul, self.baselines.dt_ll
            );
        }

        let boards = &self.boards;
        for (role, endpoint) in [
            ("moisture", Some(&boards.moisture)),
            ("thermal", Some(&boards.thermal)),
            ("pump", Some(&boards.pump)),
            ("motor", Some(&boards.motor)),
            ("vision", boards.vision.as_ref()),
        ] {
            if let Some(endpoint) = endpoint {
                validate_endpoint(role, endpoint)?;
            }
        }

        for (role, command) in [
            ("thermal", &self.commands.thermal),
            ("motor", &self.commands.motor),
            ("vision", &self.commands.vision),
        ] {
            if command.is_empty() || command.contains(['\n', '\r']) {
                return Err(ConfigError::ValidationFailed(format!(
                    "{role} command must be a non-empty single line"
                )));
            }
        }

        if let StressStrategy::Model { model_path } = &self.stress {
            if model_path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "model strategy requires model_path".into(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_endpoint(role: &str, endpoint: &BoardEndpoint) -> Result<(), ConfigError> {
    if endpoint.port.is_empty() {
        return Err(ConfigError::ValidationFailed(format!(
            "{role} board port must not be empty"
        )));
    }
    if endpoint.baud_rate == 0 {
        return Err(ConfigError::ValidationFailed(format!(
            "{role} board baud_rate must be > 0"
        )));
    }
    if endpoint.timeout_ms == 0 {
        return Err(ConfigError::ValidationFailed(format!(
            "{role} board timeout_ms must be > 0"
        )));
    }
    Ok(())
}
