//! Outbound application events.
//!
//! The control unit, fault injector and simulation core emit these through
//! the [`EventSink`](super::ports::EventSink) port.  The
//! [`EventLog`](crate::event_log::EventLog) turns each one into a
//! timestamped line; tests record them directly.

use core::fmt;

use crate::model::{FaultKind, Zone};

/// Structured events emitted by the simulation core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The engine has been created.
    Started,

    /// The loop thread halted at a tick boundary.
    Stopped,

    /// The compressor switched on or off.
    CompressorChanged { on: bool },

    /// The damper opened or closed.
    /// `compressor_stopped` marks a forced close because the compressor is off.
    DamperChanged { open: bool, compressor_stopped: bool },

    /// A subsystem fault was injected.
    FaultTriggered(FaultKind),

    /// Both actuators were forced off because a fault began.
    EmergencyStop,

    /// A subsystem recovered after its countdown expired.
    FaultRecovered(FaultKind),

    /// An operator target change was applied (value after clamping).
    TargetChanged { zone: Zone, celsius: f32 },
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "system started"),
            Self::Stopped => write!(f, "system stopped"),
            Self::CompressorChanged { on: true } => write!(f, "compressor ON"),
            Self::CompressorChanged { on: false } => write!(f, "compressor OFF"),
            Self::DamperChanged { open: true, .. } => write!(f, "damper open"),
            Self::DamperChanged {
                open: false,
                compressor_stopped: true,
            } => write!(f, "damper closed (compressor stopped)"),
            Self::DamperChanged { open: false, .. } => write!(f, "damper closed"),
            Self::FaultTriggered(FaultKind::Controller) => {
                write!(f, "controller fault: communication lost")
            }
            Self::FaultTriggered(kind) => write!(f, "{kind} fault"),
            Self::EmergencyStop => write!(f, "emergency stop"),
            Self::FaultRecovered(FaultKind::Controller) => write!(f, "controller reconnected"),
            Self::FaultRecovered(kind) => write!(f, "{kind} recovered"),
            Self::TargetChanged { zone, celsius } => {
                write!(f, "{zone} target changed to {celsius:.1}\u{00b0}C")
            }
        }
    }
}
