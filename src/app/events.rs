//! Outbound cycle events.
//!
//! The [`CycleOrchestrator`](super::orchestrator::CycleOrchestrator) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them.

use std::time::Duration;

use crate::config::Channel;
use crate::control::decision::Decision;
use crate::control::stress::StressIndex;
use crate::fsm::PassState;

/// Structured events emitted by the cycle engine.
#[derive(Debug, Clone)]
pub enum CycleEvent {
    /// A pass over all channels began.
    CycleStarted { cycle: u64, channels: usize },

    /// Processing of one channel began.
    ChannelStarted(Channel),

    /// A required reading failed; the rest of the channel was skipped.
    ChannelSkipped {
        channel: Channel,
        stage: PassState,
        reason: String,
    },

    StressComputed {
        channel: Channel,
        stress: StressIndex,
    },

    DecisionMade {
        channel: Channel,
        decision: Decision,
        threshold: f64,
    },

    PumpTriggered(Channel),
    PumpFailed { channel: Channel, reason: String },

    MotorAdvanced {
        channel: Channel,
        echo: Option<String>,
    },
    MotorFailed { channel: Channel, reason: String },

    RecordLogged(Channel),
    /// Record not written: either the log failed or policy withheld it.
    RecordDropped { channel: Channel, reason: String },

    /// The pass over all channels finished.
    CycleCompleted(CycleSummary),
}

/// Counts carried by [`CycleEvent::CycleCompleted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSummary {
    pub cycle: u64,
    pub completed: usize,
    pub skipped: usize,
    pub indeterminate: usize,
    pub irrigated: usize,
    pub logged: usize,
    pub elapsed: Duration,
}
