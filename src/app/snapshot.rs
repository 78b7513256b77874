//! Immutable view of the simulation published once per tick.
//!
//! The loop thread builds a [`Snapshot`] at the end of every tick and hands
//! it out behind an `Arc`; readers never see a half-updated tick.

use core::time::Duration;

use heapless::Vec;
use serde::Serialize;

use crate::event_log::{LOG_CAPACITY, LogEntry};
use crate::model::{Actuators, FaultKind, FaultState, ThermalState};
use crate::stats::ZoneStats;

/// Temperature samples retained for charting.
pub const HISTORY_CAPACITY: usize = 100;

/// One point of the temperature history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySample {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub compartment_temp: f32,
    pub freezer_temp: f32,
}

/// Everything a presentation layer needs, frozen at one tick.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Ticks completed (0 before the first tick).
    pub tick: u64,
    /// Simulated time since start (`tick * tick_interval_ms`).
    pub elapsed_ms: u64,
    pub tick_interval_ms: u32,
    pub thermal: ThermalState,
    pub actuators: Actuators,
    pub faults: FaultState,
    /// Newest samples, oldest first.
    pub history: Vec<HistorySample, HISTORY_CAPACITY>,
    /// Newest log entries, oldest first.
    pub log: Vec<LogEntry, LOG_CAPACITY>,
    /// Log entries ever written, including evicted ones.
    pub total_events: u64,
    pub stats: ZoneStats,
}

impl Snapshot {
    pub fn compressor_on(&self) -> bool {
        self.actuators.compressor_on()
    }

    pub fn damper_open(&self) -> bool {
        self.actuators.damper_open()
    }

    pub fn uptime(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Whole seconds until `kind` recovers (0 when healthy).
    pub fn seconds_remaining(&self, kind: FaultKind) -> u32 {
        self.faults.seconds_remaining(kind, self.tick_interval_ms)
    }

    /// Newest `n` log entries, newest last.
    pub fn log_tail(&self, n: usize) -> &[LogEntry] {
        let skip = self.log.len().saturating_sub(n);
        &self.log[skip..]
    }

    pub fn latest_sample(&self) -> Option<&HistorySample> {
        self.history.last()
    }
}
