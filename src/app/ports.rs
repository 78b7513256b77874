//! Port traits: the boundary between the pure pipeline stages and whatever
//! records their output.
//!
//! ```text
//!   ControlUnit ─┐
//!   FaultInjector┼──▶ EventSink ──▶ EventLog (bounded, timestamped)
//!   SimulationCore┘                 RecordingSink (tests)
//! ```
//!
//! Pipeline stages take `&mut impl EventSink` at call sites, so they never
//! own a log and stay testable in isolation.

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → log / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Discards every event. Useful when only the resulting state matters.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}
