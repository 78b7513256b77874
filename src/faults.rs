//! Fault injector.
//!
//! Owns the recovery countdowns in [`FaultState`] and the emergency stop.
//!
//! ## Fault lifecycle
//!
//! 1. An operator triggers a fault on a subsystem.
//! 2. The injector marks it unhealthy, arms its countdown, and forces every
//!    actuator off in the same call.
//! 3. While any subsystem is unhealthy the control unit is suspended, so the
//!    actuators stay off.
//! 4. [`FaultInjector::advance`] runs once per tick before control and
//!    decrements every armed countdown.  The tick on which a countdown hits
//!    zero marks the subsystem healthy again.
//! 5. The next control decision re-derives the actuators from the current
//!    temperatures; recovery itself switches nothing on.
//!
//! Faults are independent: three subsystems may be recovering at once, and
//! control resumes only when *every* countdown has expired.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::model::{Actuators, FaultKind, FaultState};

/// Fault injector.
#[derive(Debug, Clone)]
pub struct FaultInjector {
    /// Countdown armed by each trigger (ticks).
    recovery_ticks: u16,
}

impl FaultInjector {
    pub fn new(recovery_ticks: u16) -> Self {
        Self { recovery_ticks }
    }

    /// Ticks a fault stays active.
    pub fn recovery_ticks(&self) -> u16 {
        self.recovery_ticks
    }

    /// Fail `kind` and emergency-stop the actuators.
    ///
    /// Does nothing while that subsystem's countdown is already running;
    /// re-triggering never extends the window.  Returns whether the fault
    /// was armed.
    pub fn trigger(
        &self,
        kind: FaultKind,
        faults: &mut FaultState,
        actuators: &mut Actuators,
        sink: &mut impl EventSink,
    ) -> bool {
        if faults.countdown(kind) > 0 {
            info!("Fault: {kind} already active, {} ticks left", faults.countdown(kind));
            return false;
        }

        *faults.countdown_mut(kind) = self.recovery_ticks;
        faults.set_healthy(kind, false);
        error!("FAULT SET: {kind} (recovers in {} ticks)", self.recovery_ticks);
        sink.emit(&AppEvent::FaultTriggered(kind));

        *actuators = Actuators::Off;
        warn!("Emergency stop: compressor and damper forced off");
        sink.emit(&AppEvent::EmergencyStop);
        true
    }

    /// Count every armed countdown down by one tick.
    pub fn advance(&self, faults: &mut FaultState, sink: &mut impl EventSink) {
        for kind in FaultKind::ALL {
            let remaining = faults.countdown_mut(kind);
            if *remaining == 0 {
                continue;
            }
            *remaining -= 1;
            if *remaining == 0 {
                faults.set_healthy(kind, true);
                info!("FAULT CLEARED: {kind}");
                sink.emit(&AppEvent::FaultRecovered(kind));
            }
        }
    }
}
