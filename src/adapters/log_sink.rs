//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one tagged line per
//! [`CycleEvent`] through the `log` facade.

use log::{debug, info, warn};

use crate::app::events::CycleEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`CycleEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &CycleEvent) {
        match event {
            CycleEvent::CycleStarted { cycle, channels } => {
                info!("CYCLE | #{} started | channels={}", cycle, channels);
            }
            CycleEvent::ChannelStarted(channel) => {
                info!("CHAN  | {} | processing", channel);
            }
            CycleEvent::ChannelSkipped {
                channel,
                stage,
                reason,
            } => {
                warn!("SKIP  | {} | at {} | {}", channel, stage, reason);
            }
            CycleEvent::StressComputed { channel, stress } => {
                if stress.is_sentinel() {
                    warn!("CWSI  | {} | {} (indeterminate)", channel, stress);
                } else {
                    info!("CWSI  | {} | {}", channel, stress);
                }
            }
            CycleEvent::DecisionMade {
                channel,
                decision,
                threshold,
            } => {
                debug!("CWSI  | {} | decision={} threshold={}", channel, decision, threshold);
            }
            CycleEvent::PumpTriggered(channel) => {
                info!("PUMP  | {} | watering", channel);
            }
            CycleEvent::PumpFailed { channel, reason } => {
                warn!("PUMP  | {} | failed: {}", channel, reason);
            }
            CycleEvent::MotorAdvanced { channel, echo } => match echo {
                Some(line) => info!("MOTOR | {} | advanced (echo '{}')", channel, line),
                None => info!("MOTOR | {} | advanced", channel),
            },
            CycleEvent::MotorFailed { channel, reason } => {
                warn!("MOTOR | {} | failed: {}", channel, reason);
            }
            CycleEvent::RecordLogged(channel) => {
                info!("LOG   | {} | record written", channel);
            }
            CycleEvent::RecordDropped { channel, reason } => {
                warn!("LOG   | {} | record dropped: {}", channel, reason);
            }
            CycleEvent::CycleCompleted(s) => {
                info!(
                    "CYCLE | #{} done in {:.1}s | completed={} skipped={} \
                     indeterminate={} irrigated={} logged={}",
                    s.cycle,
                    s.elapsed.as_secs_f64(),
                    s.completed,
                    s.skipped,
                    s.indeterminate,
                    s.irrigated,
                    s.logged,
                );
            }
        }
    }
}
