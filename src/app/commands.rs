//! Inbound commands to the simulation core.
//!
//! These are the only mutations the presentation side may request.  The
//! [`Engine`](crate::engine::Engine) queues them; the loop thread applies
//! them at the start of its next tick through
//! [`SimulationCore::handle_command`](super::service::SimulationCore::handle_command).

use crate::model::{FaultKind, Zone};

/// Commands that external adapters can send into the simulation core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Fail a subsystem; ignored while that subsystem is already recovering.
    TriggerFault(FaultKind),

    /// Change a zone's target temperature (°C, already checked finite).
    SetTarget(Zone, f32),
}
