//! Threaded driver around [`SimulationCore`].
//!
//! The core is moved onto a dedicated loop thread while the engine runs and
//! handed back when it stops, so all mutable state has exactly one owner at
//! any time.  Callers on other threads interact through two shared slots:
//!
//! ```text
//! ┌──────────────┐  AppCommand (bounded)  ┌──────────────────┐
//! │ presentation │───────────────────────▶│   loop thread    │
//! │  (any task)  │◀───────────────────────│ SimulationCore   │
//! └──────────────┘   Arc<Snapshot> slot   └──────────────────┘
//! ```
//!
//! Commands are drained at the start of each tick and never interrupt one
//! in progress.  A stop request is honoured between ticks.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{error, info, warn};

use crate::app::commands::AppCommand;
use crate::app::service::SimulationCore;
use crate::app::snapshot::Snapshot;
use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::event_log::LogEntry;
use crate::model::{FaultKind, Zone};

/// Commands that may wait for the next tick before senders see
/// [`Error::CommandQueueFull`].
pub const CMD_DEPTH: usize = 16;

/// Name of the loop thread.
const LOOP_THREAD_NAME: &str = "fridgesim-loop";

// ───────────────────────────────────────────────────────────────
// Shared slots
// ───────────────────────────────────────────────────────────────

struct Shared {
    /// Presentation → loop.
    commands: Channel<CriticalSectionRawMutex, AppCommand, CMD_DEPTH>,
    /// Loop → presentation; replaced whole once per tick.
    snapshot: Mutex<CriticalSectionRawMutex, RefCell<Arc<Snapshot>>>,
    stop: AtomicBool,
}

impl Shared {
    fn new(initial: Snapshot) -> Self {
        Self {
            commands: Channel::new(),
            snapshot: Mutex::new(RefCell::new(Arc::new(initial))),
            stop: AtomicBool::new(false),
        }
    }

    fn publish(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        // the previous snapshot is released outside the critical section
        let prev = self.snapshot.lock(|slot| slot.replace(next));
        drop(prev);
    }

    fn latest(&self) -> Arc<Snapshot> {
        self.snapshot.lock(|slot| slot.borrow().clone())
    }
}

// ───────────────────────────────────────────────────────────────
// Engine
// ───────────────────────────────────────────────────────────────

/// Runs a [`SimulationCore`] at its configured tick period.
pub struct Engine {
    shared: Arc<Shared>,
    /// Present while stopped.
    core: Option<SimulationCore>,
    /// Present while running; yields the core back on join.
    worker: Option<JoinHandle<SimulationCore>>,
    started_once: bool,
}

impl Engine {
    /// Validate `config` and build a stopped engine.
    ///
    /// The initial snapshot (tick 0, "system started") is readable at once.
    pub fn new(config: SimConfig) -> Result<Self> {
        Ok(Self::from_core(SimulationCore::new(config)?))
    }

    /// Wrap an already-built core.
    pub fn from_core(core: SimulationCore) -> Self {
        let shared = Arc::new(Shared::new(core.snapshot()));
        Self {
            shared,
            core: Some(core),
            worker: None,
            started_once: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Spawn the loop thread.  Does nothing if already running.
    ///
    /// After a [`stop`](Self::stop) the simulation resumes from the state
    /// it stopped in.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let Some(mut core) = self.core.take() else {
            error!("Engine: no simulation state to run (loop thread lost)");
            return Err(Error::Spawn);
        };
        if self.started_once {
            core.record_started();
            self.shared.publish(core.snapshot());
        }

        self.shared.stop.store(false, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(LOOP_THREAD_NAME.into())
            .spawn(move || run_loop(core, &shared))
            .map_err(|e| {
                error!("Engine: failed to spawn {LOOP_THREAD_NAME}: {e}");
                Error::Spawn
            })?;

        self.worker = Some(handle);
        self.started_once = true;
        info!("Engine: started");
        Ok(())
    }

    /// Ask the loop to halt at the next tick boundary and wait for it.
    /// Does nothing if not running.
    pub fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        self.shared.stop.store(true, Ordering::Release);
        match handle.join() {
            Ok(core) => {
                self.core = Some(core);
                info!("Engine: stopped");
            }
            Err(_) => error!("Engine: loop thread panicked; simulation state lost"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    // ── Commands ──────────────────────────────────────────────

    /// Queue a target change for `zone`.  Out-of-range values are clamped
    /// when applied; non-finite values are rejected here.
    pub fn set_target(&self, zone: Zone, celsius: f32) -> Result<()> {
        if !celsius.is_finite() {
            warn!("Engine: rejected non-finite {zone} target");
            return Err(Error::NonFiniteTarget);
        }
        self.send(AppCommand::SetTarget(zone, celsius))
    }

    /// Queue a fault.  Ignored when applied if `kind` is already recovering.
    pub fn trigger_fault(&self, kind: FaultKind) -> Result<()> {
        self.send(AppCommand::TriggerFault(kind))
    }

    fn send(&self, cmd: AppCommand) -> Result<()> {
        self.shared.commands.try_send(cmd).map_err(|_| {
            warn!("Engine: command queue full, dropped {cmd:?}");
            Error::CommandQueueFull
        })
    }

    // ── Queries ───────────────────────────────────────────────

    /// Most recently published snapshot.  Never blocks on a tick.
    pub fn read_snapshot(&self) -> Arc<Snapshot> {
        self.shared.latest()
    }

    /// Newest `n` log entries from the latest snapshot, newest last.
    pub fn read_log_tail(&self, n: usize) -> Vec<LogEntry> {
        self.read_snapshot().log_tail(n).to_vec()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

// ───────────────────────────────────────────────────────────────
// Loop thread
// ───────────────────────────────────────────────────────────────

fn run_loop(mut core: SimulationCore, shared: &Shared) -> SimulationCore {
    let period = Duration::from_millis(u64::from(core.config().tick_interval_ms));
    info!("{LOOP_THREAD_NAME}: running at {} ms/tick", period.as_millis());

    loop {
        thread::sleep(period);
        if shared.stop.load(Ordering::Acquire) {
            break;
        }
        core.tick(core::iter::from_fn(|| shared.commands.try_receive().ok()));
        shared.publish(core.snapshot());
    }

    core.record_stopped();
    shared.publish(core.snapshot());
    core
}
