//! Orchestration tests: the cycle engine against port-level mocks.

use std::cell::RefCell;
use std::rc::Rc;

use irrigator::app::events::CycleEvent;
use irrigator::app::orchestrator::{ChannelOutcome, CycleOrchestrator};
use irrigator::config::{Baselines, PredictionFailurePolicy, SystemConfig};
use irrigator::control::decision::Decision;
use irrigator::control::predictor::{FeatureVector, Predictor, PredictorHandle};
use irrigator::control::stress::{StressEngine, StressIndex};
use irrigator::error::{PredictorError, StartupError};
use irrigator::fsm::PassState;
use irrigator::fsm::context::Rgb;

use crate::mock_hw::{ActuatorCall, FixedClock, MemoryLog, MockHardware, VecSink, bench_config, ch};

fn formula(cfg: &SystemConfig) -> CycleOrchestrator<FixedClock> {
    CycleOrchestrator::new(cfg, StressEngine::Formula(cfg.baselines), FixedClock).unwrap()
}

fn inverted() -> Baselines {
    Baselines {
        dt_ll: -1.33,
        dt_ul: -2.06,
    }
}

// ── Ordering ──────────────────────────────────────────────────

#[test]
fn channels_run_in_alphabet_order_with_pump_before_motor() {
    let cfg = bench_config("ABC");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    let mut log = MemoryLog::new();
    let mut sink = VecSink::new();

    orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::Pump(ch('A')),
            ActuatorCall::Motor,
            ActuatorCall::Pump(ch('B')),
            ActuatorCall::Motor,
            ActuatorCall::Pump(ch('C')),
            ActuatorCall::Motor,
        ]
    );
    let logged: String = log.records.iter().map(|r| r.channel.symbol()).collect();
    assert_eq!(logged, "ABC");
}

#[test]
fn event_stream_for_one_channel() {
    let cfg = bench_config("A");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    let mut sink = VecSink::new();

    orch.run_cycle(&mut hw, &mut MemoryLog::new(), &mut sink);

    let tags: Vec<&str> = sink
        .events
        .iter()
        .map(|e| match e {
            CycleEvent::CycleStarted { .. } => "cycle_started",
            CycleEvent::ChannelStarted(_) => "channel_started",
            CycleEvent::ChannelSkipped { .. } => "skipped",
            CycleEvent::StressComputed { .. } => "stress",
            CycleEvent::DecisionMade { .. } => "decision",
            CycleEvent::PumpTriggered(_) => "pump",
            CycleEvent::PumpFailed { .. } => "pump_failed",
            CycleEvent::MotorAdvanced { .. } => "motor",
            CycleEvent::MotorFailed { .. } => "motor_failed",
            CycleEvent::RecordLogged(_) => "logged",
            CycleEvent::RecordDropped { .. } => "dropped",
            CycleEvent::CycleCompleted(_) => "cycle_completed",
        })
        .collect();
    assert_eq!(
        tags,
        vec![
            "cycle_started",
            "channel_started",
            "stress",
            "decision",
            "pump",
            "motor",
            "logged",
            "cycle_completed"
        ]
    );
}

// ── Skips ─────────────────────────────────────────────────────

#[test]
fn malformed_moisture_skips_only_that_channel() {
    let cfg = bench_config("ABC");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    hw.moisture.insert('B', Err(()));
    let mut log = MemoryLog::new();
    let mut sink = VecSink::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert_eq!(
        report.outcome(ch('B')),
        Some(&ChannelOutcome::Skipped {
            stage: PassState::AcquireMoisture
        })
    );
    assert_eq!(report.completed(), 2);
    assert_eq!(hw.motor_moves(), 2, "skipped channel does not move the motor");
    assert!(log.records.iter().all(|r| r.channel != ch('B')));
    assert_eq!(
        sink.count(|e| matches!(e, CycleEvent::ChannelSkipped { .. })),
        1
    );
}

#[test]
fn thermal_failure_skips_at_temperature_stage() {
    let cfg = bench_config("AB");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    hw.thermal.insert('A', (f64::NAN, f64::NAN));
    let mut log = MemoryLog::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert_eq!(
        report.outcome(ch('A')),
        Some(&ChannelOutcome::Skipped {
            stage: PassState::AcquireTemperature
        })
    );
    assert_eq!(hw.pumped(), vec![ch('B')]);
    assert_eq!(log.records.len(), 1);
}

// ── Decisions ─────────────────────────────────────────────────

#[test]
fn mixed_stress_waters_only_stressed_channels() {
    let cfg = bench_config("AB");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    hw.thermal.insert('A', (30.0, 28.3)); // 0.493
    hw.thermal.insert('B', (30.0, 27.0)); // 0.0
    let mut log = MemoryLog::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert_eq!(hw.pumped(), vec![ch('A')]);
    assert_eq!(hw.motor_moves(), 2);
    assert_eq!(report.irrigated(), 1);
    assert!(matches!(
        report.outcome(ch('B')),
        Some(ChannelOutcome::Completed {
            decision: Decision::Hold,
            ..
        })
    ));
    assert_eq!(log.records[1].stress.valid(), Some(0.0));
}

#[test]
fn threshold_tie_irrigates() {
    let mut cfg = bench_config("A");
    // dT = -1.77 gives 0.29 / 0.73, which rounds to exactly 0.397.
    cfg.watering_threshold = 0.397;
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    hw.thermal.insert('A', (30.0, 28.23));

    let report = orch.run_cycle(&mut hw, &mut MemoryLog::new(), &mut VecSink::new());

    assert_eq!(report.irrigated(), 1);
}

#[test]
fn sentinel_suppresses_pump_but_moves_motor_and_logs() {
    let mut cfg = bench_config("AB");
    cfg.baselines = inverted();
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    let mut log = MemoryLog::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert!(hw.pumped().is_empty());
    assert_eq!(hw.motor_moves(), 2);
    assert_eq!(report.indeterminate(), 2);
    assert_eq!(log.records.len(), 2);
    assert!(
        log.records
            .iter()
            .all(|r| r.stress == StressIndex::INVALID_BASELINES)
    );
}

#[test]
fn skip_record_policy_drops_failed_prediction_rows() {
    let mut cfg = bench_config("AB");
    cfg.prediction_failure = PredictionFailurePolicy::SkipRecord;
    let engine = StressEngine::Model(PredictorHandle::ready(Failing));
    let mut orch = CycleOrchestrator::new(&cfg, engine, FixedClock).unwrap();
    let mut hw = MockHardware::new();
    let mut log = MemoryLog::new();
    let mut sink = VecSink::new();

    orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert!(log.records.is_empty());
    assert_eq!(hw.motor_moves(), 2);
    assert_eq!(
        sink.count(|e| matches!(e, CycleEvent::RecordDropped { .. })),
        2
    );
}

#[test]
fn skip_record_policy_still_logs_invalid_baselines() {
    let mut cfg = bench_config("AB");
    cfg.baselines = inverted();
    cfg.prediction_failure = PredictionFailurePolicy::SkipRecord;
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    let mut log = MemoryLog::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert!(hw.pumped().is_empty());
    assert_eq!(report.logged(), 2);
    assert!(
        log.records
            .iter()
            .all(|r| r.stress == StressIndex::INVALID_BASELINES)
    );
}

// ── Best-effort actuation and logging ─────────────────────────

#[test]
fn pump_failure_is_reported_and_cycle_continues() {
    let cfg = bench_config("AB");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware {
        pump_fails: true,
        ..Default::default()
    };
    let mut log = MemoryLog::new();
    let mut sink = VecSink::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert_eq!(report.completed(), 2);
    assert_eq!(report.irrigated(), 0);
    assert_eq!(hw.motor_moves(), 2);
    assert_eq!(log.records.len(), 2);
    assert_eq!(
        sink.count(|e| matches!(e, CycleEvent::PumpFailed { .. })),
        2
    );
}

#[test]
fn motor_failure_still_logs() {
    let cfg = bench_config("A");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware {
        motor_fails: true,
        ..Default::default()
    };
    let mut log = MemoryLog::new();
    let mut sink = VecSink::new();

    orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert_eq!(log.records.len(), 1);
    assert_eq!(
        sink.count(|e| matches!(e, CycleEvent::MotorFailed { .. })),
        1
    );
}

#[test]
fn log_failure_does_not_stop_later_channels() {
    let cfg = bench_config("ABC");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    let mut log = MemoryLog {
        failing: true,
        ..Default::default()
    };
    let mut sink = VecSink::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut sink);

    assert_eq!(report.completed(), 3);
    assert_eq!(report.logged(), 0);
    assert_eq!(hw.pumped().len(), 3);
    assert_eq!(
        sink.count(|e| matches!(e, CycleEvent::RecordDropped { .. })),
        3
    );
}

// ── Model strategy ────────────────────────────────────────────

struct Recording {
    seen: Rc<RefCell<Vec<FeatureVector>>>,
    output: f64,
}

impl Predictor for Recording {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        self.seen.borrow_mut().push(*features);
        Ok(self.output)
    }
}

struct Failing;

impl Predictor for Failing {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, PredictorError> {
        Err(PredictorError::NonFinite)
    }
}

#[test]
fn model_sees_rgb_then_temperatures() {
    let cfg = bench_config("A");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let engine = StressEngine::Model(PredictorHandle::ready(Recording {
        seen: Rc::clone(&seen),
        output: 0.8,
    }));
    let mut orch = CycleOrchestrator::new(&cfg, engine, FixedClock).unwrap();
    let mut hw = MockHardware {
        rgb: Some(Rgb { r: 12, g: 140, b: 40 }),
        ..Default::default()
    };
    let mut log = MemoryLog::new();

    orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert_eq!(seen.borrow().as_slice(), &[[12.0, 140.0, 40.0, 30.0, 28.3]]);
    assert_eq!(hw.pumped(), vec![ch('A')]);
    assert_eq!(log.records[0].rgb, Some(Rgb { r: 12, g: 140, b: 40 }));
}

#[test]
fn model_output_above_one_is_clamped() {
    let cfg = bench_config("A");
    let engine = StressEngine::Model(PredictorHandle::ready(Recording {
        seen: Rc::default(),
        output: 3.2,
    }));
    let mut orch = CycleOrchestrator::new(&cfg, engine, FixedClock).unwrap();
    let mut log = MemoryLog::new();

    orch.run_cycle(&mut MockHardware::new(), &mut log, &mut VecSink::new());

    assert_eq!(log.records[0].stress.valid(), Some(1.0));
}

#[test]
fn inference_failure_logs_prediction_sentinel() {
    let cfg = bench_config("AB");
    let engine = StressEngine::Model(PredictorHandle::ready(Failing));
    let mut orch = CycleOrchestrator::new(&cfg, engine, FixedClock).unwrap();
    let mut hw = MockHardware::new();
    let mut log = MemoryLog::new();

    let report = orch.run_cycle(&mut hw, &mut log, &mut VecSink::new());

    assert!(hw.pumped().is_empty());
    assert_eq!(hw.motor_moves(), 2);
    assert_eq!(report.indeterminate(), 2);
    assert!(
        log.records
            .iter()
            .all(|r| r.stress == StressIndex::PREDICTION_FAILED)
    );
}

#[test]
fn unloaded_model_refuses_to_start() {
    let cfg = bench_config("A");
    let engine = StressEngine::Model(PredictorHandle::Unready("file not found".into()));
    match CycleOrchestrator::new(&cfg, engine, FixedClock) {
        Err(StartupError::PredictorUnavailable(reason)) => assert!(reason.contains("not found")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("orchestrator must not start without a model"),
    }
}

#[test]
fn invalid_config_refuses_to_start() {
    let mut cfg = bench_config("A");
    cfg.watering_threshold = -0.1;
    let result = CycleOrchestrator::new(&cfg, StressEngine::Formula(cfg.baselines), FixedClock);
    assert!(matches!(result, Err(StartupError::Config(_))));
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn report_summary_matches_counts() {
    let cfg = bench_config("ABCD");
    let mut orch = formula(&cfg);
    let mut hw = MockHardware::new();
    hw.moisture.insert('A', Err(()));
    hw.thermal.insert('C', (30.0, 27.0));
    let mut sink = VecSink::new();

    let report = orch.run_cycle(&mut hw, &mut MemoryLog::new(), &mut sink);
    let summary = report.summary();

    assert_eq!(summary.cycle, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.completed, 3);
    assert_eq!(summary.irrigated, 2);
    assert_eq!(summary.logged, 3);
    assert!(matches!(
        sink.events.last(),
        Some(CycleEvent::CycleCompleted(s)) if s.completed == 3
    ));
}
