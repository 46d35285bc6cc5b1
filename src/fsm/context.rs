//! Blackboard threaded through one channel pass.
//!
//! `PassContext` is filled in progressively as the pass moves through
//! [`PassState`](super::PassState).  The orchestrator reads what earlier
//! states wrote; nothing here performs I/O.

use crate::config::Channel;
use crate::control::decision::Decision;
use crate::control::stress::{StressIndex, StressInputs};

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Average colour reported by the camera board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Fallback used when the camera is absent or its reading failed.
    pub const ZERO: Self = Self { r: 0, g: 0, b: 0 };

    /// Round and clamp board-reported components into `0..=255`.
    pub fn from_components(r: f64, g: f64, b: f64) -> Self {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, 255.0) as u8
            }
        }
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

/// Ambient and canopy temperature from the IR thermometer (°C).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thermal {
    pub ambient_c: f64,
    pub object_c: f64,
}

/// Telemetry accumulated for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Soil moisture (%).
    pub moisture_percent: Option<f64>,
    pub thermal: Option<Thermal>,
    /// `None` when no camera board is fitted.
    pub rgb: Option<Rgb>,
}

impl Reading {
    /// Stress inputs, once both required readings are present.
    pub fn stress_inputs(&self) -> Option<StressInputs> {
        let moisture_percent = self.moisture_percent?;
        let thermal = self.thermal?;
        Some(StressInputs {
            moisture_percent,
            ambient_c: thermal.ambient_c,
            object_c: thermal.object_c,
            rgb: self.rgb.unwrap_or(Rgb::ZERO),
        })
    }
}

// ---------------------------------------------------------------------------
// PassContext
// ---------------------------------------------------------------------------

/// Everything one pass has learned so far.
#[derive(Debug, Clone)]
pub struct PassContext {
    pub channel: Channel,
    pub reading: Reading,
    pub stress: Option<StressIndex>,
    pub decision: Option<Decision>,
    pub pump_fired: bool,
    pub logged: bool,
}

impl PassContext {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            reading: Reading::default(),
            stress: None,
            decision: None,
            pump_fired: false,
            logged: false,
        }
    }
}
