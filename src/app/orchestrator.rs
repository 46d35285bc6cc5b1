//! Cycle orchestrator, the hexagonal core.
//!
//! [`CycleOrchestrator`] owns the stress engine, the decision policy and
//! the channel alphabet.  All I/O flows through port traits injected at
//! call sites, so a whole irrigation cycle runs against mock adapters in
//! tests.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ RecordSink
//!                  │    CycleOrchestrator      │
//! ActuatorPort ◀── │  PassState · Stress · Dec │ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! One channel's failure never stops the others: a failed required
//! reading skips the rest of that channel, a failed actuation or log
//! write is reported and the pass continues.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::{Channel, ChannelSet, PredictionFailurePolicy, SystemConfig};
use crate::control::decision::{Decision, DecisionPolicy};
use crate::control::predictor::PredictorHandle;
use crate::control::stress::{StressEngine, StressIndex};
use crate::error::StartupError;
use crate::fsm::PassState;
use crate::fsm::context::PassContext;
use crate::record::LogRecord;

use super::events::{CycleEvent, CycleSummary};
use super::ports::{ActuatorPort, Clock, EventSink, RecordSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Outcomes
// ───────────────────────────────────────────────────────────────

/// How one channel pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    /// A required reading failed at `stage`; nothing after it ran.
    Skipped { stage: PassState },
    Completed {
        stress: StressIndex,
        decision: Decision,
        pump_fired: bool,
        logged: bool,
    },
}

impl ChannelOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReport {
    pub channel: Channel,
    pub outcome: ChannelOutcome,
}

/// Result of one pass over every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub channels: Vec<ChannelReport>,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn completed(&self) -> usize {
        self.count(|o| !o.is_skipped())
    }

    pub fn skipped(&self) -> usize {
        self.count(ChannelOutcome::is_skipped)
    }

    pub fn indeterminate(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ChannelOutcome::Completed {
                    decision: Decision::Indeterminate,
                    ..
                }
            )
        })
    }

    /// Channels whose pump write succeeded.
    pub fn irrigated(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ChannelOutcome::Completed {
                    pump_fired: true,
                    ..
                }
            )
        })
    }

    pub fn logged(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::Completed { logged: true, .. }))
    }

    pub fn outcome(&self, channel: Channel) -> Option<&ChannelOutcome> {
        self.channels
            .iter()
            .find(|r| r.channel == channel)
            .map(|r| &r.outcome)
    }

    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            cycle: self.cycle,
            completed: self.completed(),
            skipped: self.skipped(),
            indeterminate: self.indeterminate(),
            irrigated: self.irrigated(),
            logged: self.logged(),
            elapsed: self.elapsed,
        }
    }

    fn count(&self, pred: impl Fn(&ChannelOutcome) -> bool) -> usize {
        self.channels.iter().filter(|r| pred(&r.outcome)).count()
    }
}

// ───────────────────────────────────────────────────────────────
// CycleOrchestrator
// ───────────────────────────────────────────────────────────────

pub struct CycleOrchestrator<C: Clock> {
    channels: ChannelSet,
    engine: StressEngine,
    policy: DecisionPolicy,
    prediction_failure: PredictionFailurePolicy,
    channel_pause: Duration,
    clock: C,
    cycles_run: u64,
}

impl<C: Clock> CycleOrchestrator<C> {
    /// Construct the orchestrator.
    ///
    /// Refuses a model engine whose predictor failed to load: running
    /// cycles would water nothing and log only sentinels.
    pub fn new(
        config: &SystemConfig,
        engine: StressEngine,
        clock: C,
    ) -> Result<Self, StartupError> {
        config.validate()?;
        if let StressEngine::Model(PredictorHandle::Unready(reason)) = &engine {
            return Err(StartupError::PredictorUnavailable(reason.clone()));
        }

        info!(
            "Orchestrator ready: {} channel(s), threshold={}, on indeterminate={:?}",
            config.channels.len(),
            config.watering_threshold,
            config.prediction_failure
        );

        Ok(Self {
            channels: config.channels.clone(),
            engine,
            policy: DecisionPolicy::new(config.watering_threshold),
            prediction_failure: config.prediction_failure,
            channel_pause: config.channel_pause(),
            clock,
            cycles_run: 0,
        })
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    // ── Cycle ─────────────────────────────────────────────────

    /// Run one pass over every channel, in alphabet order.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        log: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycles_run += 1;
        let started = Instant::now();
        sink.emit(&CycleEvent::CycleStarted {
            cycle: self.cycles_run,
            channels: self.channels.len(),
        });

        let channels = self.channels.clone();
        let mut reports = Vec::with_capacity(channels.len());
        for channel in channels {
            let outcome = self.run_channel(channel, hw, log, sink);
            let skipped = outcome.is_skipped();
            reports.push(ChannelReport { channel, outcome });

            if !skipped && !self.channel_pause.is_zero() {
                thread::sleep(self.channel_pause);
            }
        }

        let report = CycleReport {
            cycle: self.cycles_run,
            channels: reports,
            elapsed: started.elapsed(),
        };
        sink.emit(&CycleEvent::CycleCompleted(report.summary()));
        report
    }

    // ── Channel pass ──────────────────────────────────────────

    /// Run one pass for a single channel.
    pub fn run_channel(
        &mut self,
        channel: Channel,
        hw: &mut (impl SensorPort + ActuatorPort),
        log: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> ChannelOutcome {
        sink.emit(&CycleEvent::ChannelStarted(channel));

        let mut ctx = PassContext::new(channel);
        let mut state = PassState::INITIAL;
        while !state.is_terminal() {
            match self.step(state, &mut ctx, hw, log, sink) {
                Ok(next) => {
                    debug!("[{}] {} -> {}", channel, state, next);
                    state = next;
                }
                Err(reason) => {
                    sink.emit(&CycleEvent::ChannelSkipped {
                        channel,
                        stage: state,
                        reason,
                    });
                    return ChannelOutcome::Skipped { stage: state };
                }
            }
        }

        match (ctx.stress, ctx.decision) {
            (Some(stress), Some(decision)) => ChannelOutcome::Completed {
                stress,
                decision,
                pump_fired: ctx.pump_fired,
                logged: ctx.logged,
            },
            // Every path to Advance that does not skip passes Decide.
            _ => ChannelOutcome::Skipped {
                stage: PassState::Decide,
            },
        }
    }

    /// Execute `state` and return the next one.  `Err` skips the channel.
    fn step(
        &self,
        state: PassState,
        ctx: &mut PassContext,
        hw: &mut (impl SensorPort + ActuatorPort),
        log: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> Result<PassState, String> {
        let channel = ctx.channel;
        match state {
            PassState::AcquireMoisture => {
                let moisture = hw.read_moisture(channel).map_err(|e| e.to_string())?;
                ctx.reading.moisture_percent = Some(moisture);
                Ok(state.next())
            }

            PassState::AcquireTemperature => {
                let thermal = hw.read_temperature().map_err(|e| e.to_string())?;
                ctx.reading.thermal = Some(thermal);
                Ok(state.next())
            }

            PassState::AcquireVisualFeature => {
                ctx.reading.rgb = hw.capture_rgb();
                Ok(state.next())
            }

            PassState::ComputeStress => {
                let inputs = ctx
                    .reading
                    .stress_inputs()
                    .ok_or_else(|| "required readings missing".to_string())?;
                let stress = self.engine.compute(&inputs);
                ctx.stress = Some(stress);
                sink.emit(&CycleEvent::StressComputed { channel, stress });
                Ok(state.next())
            }

            PassState::Decide => {
                let stress = ctx
                    .stress
                    .ok_or_else(|| "stress index missing".to_string())?;
                let decision = self.policy.decide(stress);
                ctx.decision = Some(decision);
                sink.emit(&CycleEvent::DecisionMade {
                    channel,
                    decision,
                    threshold: self.policy.threshold(),
                });
                if decision.irrigate() {
                    Ok(PassState::ActuatePump)
                } else {
                    Ok(PassState::ActuateMotor)
                }
            }

            PassState::ActuatePump => {
                match hw.trigger_pump(channel) {
                    Ok(()) => {
                        ctx.pump_fired = true;
                        sink.emit(&CycleEvent::PumpTriggered(channel));
                    }
                    Err(e) => sink.emit(&CycleEvent::PumpFailed {
                        channel,
                        reason: e.to_string(),
                    }),
                }
                Ok(PassState::ActuateMotor)
            }

            PassState::ActuateMotor => {
                match hw.advance_motor() {
                    Ok(echo) => sink.emit(&CycleEvent::MotorAdvanced { channel, echo }),
                    Err(e) => sink.emit(&CycleEvent::MotorFailed {
                        channel,
                        reason: e.to_string(),
                    }),
                }
                Ok(PassState::LogRecord)
            }

            PassState::LogRecord => {
                self.write_record(ctx, log, sink);
                Ok(PassState::Advance)
            }

            PassState::Advance => Ok(PassState::Advance),
        }
    }

    fn write_record(
        &self,
        ctx: &mut PassContext,
        log: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) {
        let channel = ctx.channel;
        let (Some(inputs), Some(stress)) = (ctx.reading.stress_inputs(), ctx.stress) else {
            return;
        };

        if stress == StressIndex::PREDICTION_FAILED
            && self.prediction_failure == PredictionFailurePolicy::SkipRecord
        {
            sink.emit(&CycleEvent::RecordDropped {
                channel,
                reason: format!("prediction failed (stress index {stress})"),
            });
            return;
        }

        let record = LogRecord {
            timestamp: self.clock.now(),
            channel,
            moisture_percent: inputs.moisture_percent,
            ambient_c: inputs.ambient_c,
            object_c: inputs.object_c,
            stress,
            rgb: ctx.reading.rgb,
        };
        match log.append(&record) {
            Ok(()) => {
                ctx.logged = true;
                sink.emit(&CycleEvent::RecordLogged(channel));
            }
            Err(e) => sink.emit(&CycleEvent::RecordDropped {
                channel,
                reason: e.to_string(),
            }),
        }
    }
}
