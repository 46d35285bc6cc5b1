//! Per-channel pass state machine.
//!
//! One pass visits one channel.  States run in a fixed order; the only
//! non-linear edges are the skip edges out of the two required
//! acquisitions and the pump bypass when the decision is not `Irrigate`.
//!
//! ```text
//!  AcquireMoisture ──err──┐
//!        │                │
//!  AcquireTemperature ─err┤
//!        │                │
//!  AcquireVisualFeature   │
//!        │                │
//!  ComputeStress          │
//!        │                │
//!  Decide ──hold/indet.─┐ │
//!        │              │ │
//!  ActuatePump          │ │
//!        │              │ │
//!  ActuateMotor ◀───────┘ │
//!        │                │
//!  LogRecord              │
//!        │                │
//!  Advance ◀──────────────┘
//! ```
//!
//! Transitions are driven by
//! [`CycleOrchestrator`](crate::app::orchestrator::CycleOrchestrator);
//! the states themselves are plain data so they can appear in events and
//! reports.

pub mod context;

use core::fmt;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PassState {
    AcquireMoisture = 0,
    AcquireTemperature = 1,
    AcquireVisualFeature = 2,
    ComputeStress = 3,
    Decide = 4,
    ActuatePump = 5,
    ActuateMotor = 6,
    LogRecord = 7,
    Advance = 8,
}

impl PassState {
    /// Total number of states.
    pub const COUNT: usize = 9;

    /// Entry state of every pass.
    pub const INITIAL: Self = Self::AcquireMoisture;

    /// Convert an index back to `PassState`.  Out-of-range indices map to
    /// `Advance` so a corrupt index ends the pass instead of looping.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::AcquireMoisture,
            1 => Self::AcquireTemperature,
            2 => Self::AcquireVisualFeature,
            3 => Self::ComputeStress,
            4 => Self::Decide,
            5 => Self::ActuatePump,
            6 => Self::ActuateMotor,
            7 => Self::LogRecord,
            _ => {
                debug_assert!(idx == 8, "invalid pass state index: {idx}");
                Self::Advance
            }
        }
    }

    /// The state that follows on the success path.
    pub fn next(self) -> Self {
        Self::from_index(self as usize + 1)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Advance
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AcquireMoisture => "acquire_moisture",
            Self::AcquireTemperature => "acquire_temperature",
            Self::AcquireVisualFeature => "acquire_visual_feature",
            Self::ComputeStress => "compute_stress",
            Self::Decide => "decide",
            Self::ActuatePump => "actuate_pump",
            Self::ActuateMotor => "actuate_motor",
            Self::LogRecord => "log_record",
            Self::Advance => "advance",
        }
    }
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
