//! Irrigator main entry point.
//!
//! Loads the configuration, wires the adapters around the
//! [`CycleOrchestrator`] and runs the requested number of cycles.
//!
//! ```text
//!  config ─▶ StressEngine ─▶ CycleOrchestrator ◀─ BoardRig<SerialTransportFactory>
//!                                   │
//!                     CsvRecordLog ◀┴▶ LogEventSink
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use irrigator::adapters::config_file::JsonConfigFile;
use irrigator::adapters::csv_log::CsvRecordLog;
use irrigator::adapters::hardware::BoardRig;
use irrigator::adapters::log_sink::LogEventSink;
use irrigator::adapters::serial::SerialTransportFactory;
use irrigator::adapters::time::SystemClock;
use irrigator::app::events::CycleSummary;
use irrigator::app::orchestrator::CycleOrchestrator;
use irrigator::app::ports::{ConfigPort, RecordSink};
use irrigator::control::stress::StressEngine;

/// CWSI-driven irrigation cycle runner.
#[derive(Debug, Parser)]
#[command(name = "irrigator", version, about)]
struct Args {
    /// JSON configuration file.  Defaults apply if it does not exist.
    #[arg(short, long, default_value = "irrigator.json")]
    config: PathBuf,

    /// Number of cycles to run; 0 runs until interrupted.
    #[arg(short = 'n', long, default_value_t = 1)]
    cycles: u64,

    /// Pause between cycles, in seconds.
    #[arg(short, long, default_value_t = 0)]
    interval_secs: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("=== Irrigator v{} ===", env!("CARGO_PKG_VERSION"));

    // ── Configuration ─────────────────────────────────────────
    let config = JsonConfigFile::new(&args.config)
        .load()
        .with_context(|| format!("loading {}", args.config.display()))?;

    // ── Domain core ───────────────────────────────────────────
    let engine = StressEngine::from_strategy(&config.stress, config.baselines);
    let mut orchestrator = CycleOrchestrator::new(&config, engine, SystemClock)
        .context("cannot start cycle engine")?;

    // ── Adapters ──────────────────────────────────────────────
    let mut log = CsvRecordLog::for_config(&config);
    log.initialize()
        .with_context(|| format!("initialising {}", log.path().display()))?;
    let mut rig = BoardRig::from_config(&config, SerialTransportFactory);
    let mut sink = LogEventSink::new();

    info!(
        "Rig: {} channel(s), camera={}, log={}",
        config.channels.len(),
        if rig.has_camera() { "yes" } else { "no" },
        log.path().display()
    );

    // ── Cycle loop ────────────────────────────────────────────
    let started = Instant::now();
    let mut totals = CycleSummary::default();
    let interval = Duration::from_secs(args.interval_secs);

    loop {
        let report = orchestrator.run_cycle(&mut rig, &mut log, &mut sink);
        accumulate(&mut totals, &report.summary());

        if args.cycles != 0 && orchestrator.cycles_run() >= args.cycles {
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    info!(
        "Run summary: cycles={} completed={} skipped={} indeterminate={} \
         irrigated={} logged={} wall={:.1}s",
        orchestrator.cycles_run(),
        totals.completed,
        totals.skipped,
        totals.indeterminate,
        totals.irrigated,
        totals.logged,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn accumulate(totals: &mut CycleSummary, cycle: &CycleSummary) {
    totals.cycle = cycle.cycle;
    totals.completed += cycle.completed;
    totals.skipped += cycle.skipped;
    totals.indeterminate += cycle.indeterminate;
    totals.irrigated += cycle.irrigated;
    totals.logged += cycle.logged;
    totals.elapsed += cycle.elapsed;
}
