//! Bounded, timestamped event log.
//!
//! Every [`AppEvent`] becomes one [`LogEntry`] stamped with the tick it
//! happened on and the simulated time since start.  Only the newest
//! [`LOG_CAPACITY`] entries are kept in a fixed-size ring; a
//! running total counts everything ever written.

use std::fmt;

use heapless::HistoryBuffer;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Entries retained for presentation.
pub const LOG_CAPACITY: usize = 100;

/// Longest message kept per entry (bytes); longer text is truncated.
pub const LOG_MESSAGE_LEN: usize = 64;

/// One timestamped line of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Tick during which the event happened (0 = before the first tick).
    pub tick: u64,
    /// Simulated milliseconds since start (`tick * tick_interval_ms`).
    pub elapsed_ms: u64,
    pub message: heapless::String<LOG_MESSAGE_LEN>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed_ms / 1000;
        write!(
            f,
            "[{:02}:{:02}:{:02}] {}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            self.message
        )
    }
}

/// Ring buffer of the newest [`LOG_CAPACITY`] entries.
pub struct EventLog {
    entries: HistoryBuffer<LogEntry, LOG_CAPACITY>,
    total: u64,
    now_tick: u64,
    now_ms: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: HistoryBuffer::new(),
            total: 0,
            now_tick: 0,
            now_ms: 0,
        }
    }

    /// Set the timestamp applied to subsequent entries.
    pub fn set_clock(&mut self, tick: u64, elapsed_ms: u64) {
        self.now_tick = tick;
        self.now_ms = elapsed_ms;
    }

    /// Append a free-form message at the current clock.
    pub fn push(&mut self, message: fmt::Arguments<'_>) {
        let mut text = heapless::String::new();
        for ch in fmt::format(message).chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        debug!("[t={}] {}", self.now_tick, text);
        self.entries.write(LogEntry {
            tick: self.now_tick,
            elapsed_ms: self.now_ms,
            message: text,
        });
        self.total += 1;
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Entries ever written, including those evicted from the ring.
    pub fn total_written(&self) -> u64 {
        self.total
    }

    /// Newest `n` entries, oldest first (newest last).
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.oldest_ordered().skip(skip)
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.recent()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.push(format_args!("{event}"));
    }
}
