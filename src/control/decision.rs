//! Watering decision policy.

use core::fmt;

use super::stress::StressIndex;

/// Outcome of comparing a stress index against the watering threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stress at or above threshold; water this channel.
    Irrigate,
    /// Plant healthy; leave the pump alone.
    Hold,
    /// Stress index is a sentinel; no decision can be made.
    Indeterminate,
}

impl Decision {
    pub fn irrigate(self) -> bool {
        matches!(self, Self::Irrigate)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Irrigate => write!(f, "irrigate"),
            Self::Hold => write!(f, "hold"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Inclusive threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decide(&self, stress: StressIndex) -> Decision {
        match stress.valid() {
            None => Decision::Indeterminate,
            Some(cwsi) if cwsi >= self.threshold => Decision::Irrigate,
            Some(_) => Decision::Hold,
        }
    }
}
