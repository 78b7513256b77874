//! Simulation core: the tick pipeline over owned state.
//!
//! [`SimulationCore`] owns the canonical thermal, actuator and fault state,
//! the event log and the history window.  It performs no I/O and knows
//! nothing about threads; the [`Engine`](crate::engine::Engine) drives it
//! from the loop thread and tests drive it directly.
//!
//! ```text
//!  commands ──▶ ┌──────────────────────────────────────┐
//!               │            SimulationCore             │ ──▶ Snapshot
//!               │ FaultInjector · ControlUnit · Physics │
//!               └──────────────────┬───────────────────┘
//!                                  ▼
//!                          EventLog (EventSink)
//! ```
//!
//! One tick, in order: stamp the log clock, advance fault countdowns, apply
//! queued commands, decide actuators, step physics, record history and
//! statistics.

use heapless::HistoryBuffer;
use log::{info, warn};

use crate::config::SimConfig;
use crate::control::ControlUnit;
use crate::error::Result;
use crate::event_log::EventLog;
use crate::faults::FaultInjector;
use crate::model::{Actuators, FaultState, ThermalState};
use crate::physics::PhysicsEngine;
use crate::stats::ZoneStats;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::EventSink;
use super::snapshot::{HISTORY_CAPACITY, HistorySample, Snapshot};

// ───────────────────────────────────────────────────────────────
// SimulationCore
// ───────────────────────────────────────────────────────────────

/// Owns all mutable simulation state and runs the tick pipeline.
pub struct SimulationCore {
    config: SimConfig,
    state: ThermalState,
    actuators: Actuators,
    faults: FaultState,
    physics: PhysicsEngine,
    control: ControlUnit,
    injector: FaultInjector,
    log: EventLog,
    history: HistoryBuffer<HistorySample, HISTORY_CAPACITY>,
    stats: ZoneStats,
    tick_count: u64,
}

impl SimulationCore {
    /// Build the core from a validated configuration.
    ///
    /// Logs "system started"; no tick has run yet.
    pub fn new(config: SimConfig) -> Result<Self> {
        let physics = PhysicsEngine::new(config.noise_std_dev_c, config.rng_seed)?;
        Self::with_physics(config, physics)
    }

    /// Build with an explicit physics engine (e.g. [`PhysicsEngine::noiseless`]).
    ///
    /// `config` is validated the same way as in [`new`](Self::new); its
    /// noise settings are ignored.
    pub fn with_physics(config: SimConfig, physics: PhysicsEngine) -> Result<Self> {
        config.validate()?;
        let mut core = Self {
            state: ThermalState::from_config(&config),
            actuators: Actuators::Off,
            faults: FaultState::default(),
            physics,
            control: ControlUnit::new(),
            injector: FaultInjector::new(config.fault_recovery_ticks),
            log: EventLog::new(),
            history: HistoryBuffer::new(),
            stats: ZoneStats::default(),
            tick_count: 0,
            config,
        };
        core.record_started();
        Ok(core)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Append "system started" at the current clock.
    pub fn record_started(&mut self) {
        info!(
            "Simulation started at tick {} ({} ms/tick)",
            self.tick_count, self.config.tick_interval_ms
        );
        self.log.emit(&AppEvent::Started);
    }

    /// Append "system stopped" at the current clock.
    pub fn record_stopped(&mut self) {
        info!("Simulation stopped after {} ticks", self.tick_count);
        self.log.emit(&AppEvent::Stopped);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick, applying `commands` after fault countdowns advance and
    /// before control runs.
    pub fn tick(&mut self, commands: impl IntoIterator<Item = AppCommand>) {
        self.tick_count += 1;
        self.log.set_clock(self.tick_count, self.elapsed_ms());

        // 1. Recovery countdowns
        self.injector.advance(&mut self.faults, &mut self.log);

        // 2. Operator commands queued since the last tick
        for cmd in commands {
            if let Err(e) = self.handle_command(cmd) {
                warn!("Command {cmd:?} rejected: {e}");
            }
        }

        // 3. Control (suspended while anything is unhealthy)
        self.actuators =
            self.control
                .decide(&self.state, &self.faults, self.actuators, &mut self.log);

        // 4. Physics
        self.state = self.physics.step(&self.state, self.actuators);

        // 5. History and statistics
        self.history.write(HistorySample {
            tick: self.tick_count,
            elapsed_ms: self.elapsed_ms(),
            compartment_temp: self.state.compartment_temp,
            freezer_temp: self.state.freezer_temp,
        });
        self.stats.record(&self.state);
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one command immediately.
    ///
    /// A fault forces the actuators off before this returns.  A target is
    /// clamped into its zone's range; only a change of the applied value is
    /// logged.
    pub fn handle_command(&mut self, cmd: AppCommand) -> Result<()> {
        match cmd {
            AppCommand::TriggerFault(kind) => {
                self.injector
                    .trigger(kind, &mut self.faults, &mut self.actuators, &mut self.log);
            }
            AppCommand::SetTarget(zone, celsius) => {
                let applied = zone.clamp_target(celsius)?;
                if applied != celsius {
                    warn!("Target {celsius:.1}°C for {zone} clamped to {applied:.1}°C");
                }
                if applied != self.state.target(zone) {
                    self.state.set_target(zone, applied);
                    info!("Target: {zone} = {applied:.1}°C");
                    self.log.emit(&AppEvent::TargetChanged {
                        zone,
                        celsius: applied,
                    });
                }
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Copy the current state into a publishable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let mut history = heapless::Vec::new();
        for sample in self.history.oldest_ordered() {
            // capacities match, never full
            let _ = history.push(*sample);
        }
        let mut log = heapless::Vec::new();
        for entry in self.log.tail(self.log.len()) {
            let _ = log.push(entry.clone());
        }

        Snapshot {
            tick: self.tick_count,
            elapsed_ms: self.elapsed_ms(),
            tick_interval_ms: self.config.tick_interval_ms,
            thermal: self.state,
            actuators: self.actuators,
            faults: self.faults,
            history,
            log,
            total_events: self.log.total_written(),
            stats: self.stats,
        }
    }

    pub fn state(&self) -> &ThermalState {
        &self.state
    }

    pub fn actuators(&self) -> Actuators {
        self.actuators
    }

    pub fn faults(&self) -> &FaultState {
        &self.faults
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated milliseconds since construction.
    pub fn elapsed_ms(&self) -> u64 {
        self.tick_count * u64::from(self.config.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{FaultKind, Zone};

    fn core() -> SimulationCore {
        SimulationCore::with_physics(SimConfig::default(), PhysicsEngine::noiseless()).unwrap()
    }

    fn messages(core: &SimulationCore) -> Vec<String> {
        core.log().tail(usize::MAX).map(|e| e.message.to_string()).collect()
    }

    #[test]
    fn construction_logs_start_and_runs_no_tick() {
        let c = core();
        assert_eq!(c.tick_count(), 0);
        assert_eq!(c.actuators(), Actuators::Off);
        assert_eq!(messages(&c), vec!["system started"]);
        let snap = c.snapshot();
        assert!(snap.history.is_empty());
        assert_eq!(snap.total_events, 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SimConfig {
            tick_interval_ms: 0,
            ..SimConfig::default()
        };
        assert!(SimulationCore::new(config).is_err());
    }

    #[test]
    fn explicit_physics_still_validates_config() {
        let zero_window = SimConfig {
            fault_recovery_ticks: 0,
            ..SimConfig::default()
        };
        assert_eq!(
            SimulationCore::with_physics(zero_window, PhysicsEngine::noiseless()).err(),
            Some(Error::Config("fault_recovery_ticks must be > 0"))
        );

        let zero_tick = SimConfig {
            tick_interval_ms: 0,
            ..SimConfig::default()
        };
        assert!(SimulationCore::with_physics(zero_tick, PhysicsEngine::noiseless()).is_err());
    }

    #[test]
    fn snapshot_reflects_last_tick() {
        let mut c = core();
        for _ in 0..3 {
            c.tick([]);
        }
        let snap = c.snapshot();
        assert_eq!(snap.tick, 3);
        assert_eq!(snap.elapsed_ms, 300);
        assert_eq!(snap.history.len(), 3);
        assert_eq!(snap.latest_sample().unwrap().tick, 3);
        assert_eq!(snap.thermal, *c.state());
        assert_eq!(snap.stats.compartment.samples(), 3);
    }

    #[test]
    fn history_window_is_bounded() {
        let mut c = core();
        for _ in 0..250 {
            c.tick([]);
        }
        let snap = c.snapshot();
        assert_eq!(snap.history.len(), HISTORY_CAPACITY);
        assert_eq!(snap.history.first().unwrap().tick, 151);
        assert_eq!(snap.stats.freezer.samples(), 250);
    }

    #[test]
    fn commands_apply_before_control() {
        let mut c = core();
        // the fault lands before decide(), so tick 1 never switches anything on
        c.tick([AppCommand::TriggerFault(FaultKind::Controller)]);
        assert_eq!(c.actuators(), Actuators::Off);
        assert!(!c.faults().controller_connected());
        assert_eq!(c.faults().countdown(FaultKind::Controller), 50);
    }

    #[test]
    fn target_change_is_logged_once() {
        let mut c = core();
        c.handle_command(AppCommand::SetTarget(Zone::Freezer, -20.0)).unwrap();
        c.handle_command(AppCommand::SetTarget(Zone::Freezer, -20.0)).unwrap();
        assert_eq!(c.state().freezer_target, -20.0);
        let msgs = messages(&c);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1], "freezer target changed to -20.0°C");
    }

    #[test]
    fn non_finite_target_leaves_state_untouched() {
        let mut c = core();
        assert!(
            c.handle_command(AppCommand::SetTarget(Zone::Compartment, f32::NAN))
                .is_err()
        );
        assert_eq!(c.state().compartment_target, 3.0);
        assert_eq!(c.log().len(), 1);
    }

    #[test]
    fn stop_is_logged_at_current_clock() {
        let mut c = core();
        c.tick([]);
        c.tick([]);
        c.record_stopped();
        let last = c.log().last().unwrap();
        assert_eq!(last.message.as_str(), "system stopped");
        assert_eq!(last.tick, 2);
    }
}
