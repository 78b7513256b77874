//! Unified error types for the simulation engine.
//!
//! The tick itself never fails: sensor loss and controller disconnects are
//! simulated states carried as data in [`FaultState`](crate::model::FaultState).
//! The variants here are caller-contract violations, rejected at the public
//! boundary before any shared state is touched.

use core::fmt;

/// Every fallible public entry point funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A fault kind identifier did not name a known subsystem.
    UnknownFaultKind,
    /// A zone identifier was neither `compartment` nor `freezer`.
    UnknownZone,
    /// A target temperature was NaN or infinite.
    NonFiniteTarget,
    /// The command channel to the loop thread is full; the command was dropped.
    CommandQueueFull,
    /// Configuration is invalid.
    Config(&'static str),
    /// The loop thread could not be spawned.
    Spawn,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFaultKind => write!(
                f,
                "unknown fault kind (expected compartment_sensor, freezer_sensor or controller)"
            ),
            Self::UnknownZone => write!(f, "unknown zone (expected compartment or freezer)"),
            Self::NonFiniteTarget => write!(f, "target temperature must be finite"),
            Self::CommandQueueFull => write!(f, "command queue full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Spawn => write!(f, "failed to spawn simulation loop thread"),
        }
    }
}

impl std::error::Error for Error {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
