//! Console display adapter.
//!
//! Renders [`Snapshot`]s to the `log` facade for the headless runner:
//! a periodic `TELEM` line plus every log entry that appeared since the
//! previous render.  A graphical front end would read the same snapshots.

use log::{info, warn};

use crate::app::snapshot::Snapshot;
use crate::model::FaultKind;

/// Presentation-side state: which log entries were already printed.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    events_seen: u64,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print new log entries, then one telemetry line.
    pub fn render(&mut self, snap: &Snapshot) {
        let fresh = snap.total_events.saturating_sub(self.events_seen);
        let fresh = usize::try_from(fresh).unwrap_or(usize::MAX);
        for entry in snap.log_tail(fresh) {
            info!("EVENT | {entry}");
        }
        self.events_seen = snap.total_events;

        info!("{}", telemetry_line(snap));
        for kind in snap.faults.active_faults() {
            warn!("WARN  | {kind} fault, recovering in {}s", snap.seconds_remaining(kind));
        }
    }
}

/// One-line summary of a snapshot.
pub fn telemetry_line(snap: &Snapshot) -> String {
    let t = &snap.thermal;
    format!(
        "TELEM | t={:.1}s | fridge={:.1}/{:.1}\u{00b0}C | freezer={:.1}/{:.1}\u{00b0}C | \
         compressor={} damper={} | {}",
        snap.elapsed_ms as f64 / 1000.0,
        t.compartment_temp,
        t.compartment_target,
        t.freezer_temp,
        t.freezer_target,
        if snap.compressor_on() { "ON" } else { "OFF" },
        if snap.damper_open() { "OPEN" } else { "CLOSED" },
        health(snap),
    )
}

fn health(snap: &Snapshot) -> &'static str {
    if snap.faults.all_healthy() {
        "healthy"
    } else if !snap.faults.is_healthy(FaultKind::Controller) {
        "controller lost"
    } else {
        "sensor fault"
    }
}
