//! fridgesim: headless runner for the refrigerator simulation engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main thread                    fridgesim-loop thread     │
//! │  ConsoleDisplay ◀── Arc<Snapshot> ── SimulationCore       │
//! │  scripted actions ── AppCommand ──▶ (tick every N ms)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Scripted actions are keyed to simulated time:
//!
//! ```text
//! fridgesim --seconds 20 --fault controller@3s --target compartment=25@8s --json
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use fridgesim::adapters::console::ConsoleDisplay;
use fridgesim::config::SimConfig;
use fridgesim::engine::Engine;
use fridgesim::model::{FaultKind, Zone};

#[derive(Parser, Debug)]
#[command(
    name = "fridgesim",
    version,
    about = "Two-compartment refrigerator simulation (headless runner)"
)]
struct Args {
    /// JSON config file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated run time in seconds
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Override the tick period (milliseconds)
    #[arg(long)]
    tick_ms: Option<u32>,

    /// RNG seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the sensor noise standard deviation (°C)
    #[arg(long)]
    noise: Option<f32>,

    /// Telemetry print interval (wall-clock milliseconds)
    #[arg(long, default_value_t = 1000)]
    telemetry_ms: u64,

    /// Inject a fault at a simulated time, e.g. `controller@3s` (repeatable)
    #[arg(long = "fault")]
    faults: Vec<ScriptedFault>,

    /// Change a target at a simulated time, e.g. `freezer=-20@5s` (repeatable)
    #[arg(long = "target")]
    targets: Vec<ScriptedTarget>,

    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    json: bool,
}

// ── Scripted actions ──────────────────────────────────────────

#[derive(Debug, Clone)]
struct ScriptedFault {
    kind: FaultKind,
    at: Duration,
}

impl FromStr for ScriptedFault {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, at) = split_at_time(s)?;
        let kind = kind.parse::<FaultKind>().map_err(|e| e.to_string())?;
        Ok(Self { kind, at })
    }
}

#[derive(Debug, Clone)]
struct ScriptedTarget {
    zone: Zone,
    celsius: f32,
    at: Duration,
}

impl FromStr for ScriptedTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (assignment, at) = split_at_time(s)?;
        let (zone, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected ZONE=CELSIUS@TIME, got `{s}`"))?;
        let zone = zone.parse::<Zone>().map_err(|e| e.to_string())?;
        let celsius = value
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("bad temperature `{value}`: {e}"))?;
        Ok(Self { zone, celsius, at })
    }
}

/// Split `what@12.5s` into `("what", 12.5 s)`; the `s` suffix is optional.
fn split_at_time(s: &str) -> Result<(&str, Duration), String> {
    let (what, when) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected `...@SECONDS`, got `{s}`"))?;
    let secs = when
        .trim()
        .trim_end_matches('s')
        .parse::<f64>()
        .map_err(|e| format!("bad time `{when}`: {e}"))?;
    let at = Duration::try_from_secs_f64(secs).map_err(|e| format!("bad time `{when}`: {e}"))?;
    Ok((what.trim(), at))
}

/// Wall-clock wait between loop passes: at most one tick, so scripted
/// actions land on the tick they name rather than on the next render.
fn poll_interval(telemetry_ms: u64, tick_interval_ms: u32) -> Duration {
    Duration::from_millis(telemetry_ms.min(u64::from(tick_interval_ms)).max(1))
}

enum Action {
    Fault(FaultKind),
    Target(Zone, f32),
}

// ── Main ──────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }
    if let Some(seed) = args.seed {
        config.rng_seed = Some(seed);
    }
    if let Some(noise) = args.noise {
        config.noise_std_dev_c = noise;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    info!("fridgesim v{}", env!("CARGO_PKG_VERSION"));
    info!("Config: {config:?}");

    let mut script: Vec<(Duration, Action)> = args
        .faults
        .iter()
        .map(|f| (f.at, Action::Fault(f.kind)))
        .chain(
            args.targets
                .iter()
                .map(|t| (t.at, Action::Target(t.zone, t.celsius))),
        )
        .collect();
    script.sort_by_key(|(at, _)| *at);
    let mut script = script.into_iter().peekable();

    let run_for = Duration::try_from_secs_f64(args.seconds).context("--seconds")?;
    let telemetry_every = Duration::from_millis(args.telemetry_ms.max(1));
    let poll_every = poll_interval(args.telemetry_ms, config.tick_interval_ms);
    let mut engine = Engine::new(config)?;
    let mut display = ConsoleDisplay::new();
    engine.start()?;
    let mut last_render: Option<Instant> = None;

    loop {
        let snap = engine.read_snapshot();
        let now = snap.uptime();

        while let Some((_, action)) = script.next_if(|(at, _)| *at <= now) {
            match action {
                Action::Fault(kind) => {
                    info!("Script: {kind} fault at {:.1}s", now.as_secs_f64());
                    engine.trigger_fault(kind)?;
                }
                Action::Target(zone, celsius) => {
                    info!("Script: {zone} target {celsius:.1}°C at {:.1}s", now.as_secs_f64());
                    engine.set_target(zone, celsius)?;
                }
            }
        }

        if now >= run_for {
            break;
        }
        if last_render.is_none_or(|at| at.elapsed() >= telemetry_every) {
            display.render(&snap);
            last_render = Some(Instant::now());
        }
        thread::sleep(poll_every);
    }

    engine.stop();
    let last = engine.read_snapshot();
    display.render(&last);

    let stats = &last.stats;
    info!(
        "Summary: {} ticks, {} events | fridge mean {:.2}\u{00b0}C | freezer mean {:.2}\u{00b0}C",
        last.tick,
        last.total_events,
        stats.compartment.mean().unwrap_or(f32::NAN),
        stats.freezer.mean().unwrap_or(f32::NAN),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*last)?);
    }
    Ok(())
}
