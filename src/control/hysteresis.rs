//! Hysteresis controller for the compressor and the damper
//!
//! Two on/off decisions with dead bands around each target, so a zone
//! hovering near a threshold never makes an actuator chatter:
//!
//! ```text
//!  compressor ON   freezer > target + 2   OR  compartment > target + 3
//!  compressor OFF  freezer < target - 2   AND compartment < target - 1
//!  damper OPEN     compartment > target + 1     (compressor ON only)
//!  damper CLOSE    compartment < target - 1     (forced while compressor OFF)
//! ```
//!
//! Anything between the ON and OFF conditions holds the previous value.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::model::{Actuators, FaultState, ThermalState};

/// Freezer dead band (°C either side of target).
const FREEZER_BAND: f32 = 2.0;
/// Compartment overshoot that forces the compressor on regardless of the freezer.
const COMPARTMENT_OVERRIDE: f32 = 3.0;
/// Compartment undershoot required before the compressor may stop.
const COMPARTMENT_OFF_MARGIN: f32 = 1.0;
/// Compartment dead band for the damper (°C either side of target).
const DAMPER_BAND: f32 = 1.0;

/// Stateless on/off controller; all history arrives as `prev`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlUnit;

impl ControlUnit {
    pub fn new() -> Self {
        Self
    }

    /// Derive the next actuator state.
    ///
    /// While any subsystem is unhealthy control is suspended: `prev` is
    /// returned untouched and nothing is emitted.  The emergency stop that
    /// turned everything off happened when the fault was injected.
    pub fn decide(
        &self,
        state: &ThermalState,
        faults: &FaultState,
        prev: Actuators,
        sink: &mut impl EventSink,
    ) -> Actuators {
        if !faults.all_healthy() {
            return prev;
        }

        let compressor_on = Self::decide_compressor(state, prev.compressor_on());
        let damper_open = if compressor_on {
            Self::decide_damper(state, prev.damper_open())
        } else {
            false
        };
        let next = Actuators::from_flags(compressor_on, damper_open);

        if next.compressor_on() != prev.compressor_on() {
            info!("Control: compressor {}", if compressor_on { "ON" } else { "OFF" });
            sink.emit(&AppEvent::CompressorChanged { on: compressor_on });
        }
        if next.damper_open() != prev.damper_open() {
            info!("Control: damper {}", if damper_open { "open" } else { "closed" });
            sink.emit(&AppEvent::DamperChanged {
                open: damper_open,
                compressor_stopped: !compressor_on,
            });
        }

        next
    }

    fn decide_compressor(s: &ThermalState, was_on: bool) -> bool {
        if s.freezer_temp > s.freezer_target + FREEZER_BAND
            || s.compartment_temp > s.compartment_target + COMPARTMENT_OVERRIDE
        {
            true
        } else if s.freezer_temp < s.freezer_target - FREEZER_BAND
            && s.compartment_temp < s.compartment_target - COMPARTMENT_OFF_MARGIN
        {
            false
        } else {
            was_on
        }
    }

    fn decide_damper(s: &ThermalState, was_open: bool) -> bool {
        if s.compartment_temp > s.compartment_target + DAMPER_BAND {
            true
        } else if s.compartment_temp < s.compartment_target - DAMPER_BAND {
            false
        } else {
            was_open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FaultKind;

    /// Test sink that records every event.
    struct RecordingSink {
        events: Vec<AppEvent>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { events: Vec::new() }
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &AppEvent) {
            self.events.push(*event);
        }
    }

    fn state(compartment: f32, freezer: f32) -> ThermalState {
        ThermalState {
            compartment_temp: compartment,
            freezer_temp: freezer,
            compartment_target: 3.0,
            freezer_target: -18.0,
        }
    }

    #[test]
    fn compartment_override_starts_compressor_and_opens_damper() {
        let mut sink = RecordingSink::new();
        let next = ControlUnit::new().decide(
            &state(7.0, -10.0),
            &FaultState::default(),
            Actuators::Off,
            &mut sink,
        );
        assert_eq!(next, Actuators::CompressorAndDamper);
        assert_eq!(
            sink.events,
            vec![
                AppEvent::CompressorChanged { on: true },
                AppEvent::DamperChanged {
                    open: true,
                    compressor_stopped: false
                },
            ]
        );
    }

    #[test]
    fn warm_freezer_starts_compressor_with_damper_closed() {
        let mut sink = RecordingSink::new();
        // compartment within its damper band
        let next = ControlUnit::new().decide(
            &state(3.5, -15.5),
            &FaultState::default(),
            Actuators::Off,
            &mut sink,
        );
        assert_eq!(next, Actuators::CompressorOnly);
        assert_eq!(sink.events, vec![AppEvent::CompressorChanged { on: true }]);
    }

    #[test]
    fn holds_inside_dead_band_without_events() {
        let cu = ControlUnit::new();
        let mut sink = RecordingSink::new();
        let s = state(3.0, -18.0);
        for prev in [
            Actuators::Off,
            Actuators::CompressorOnly,
            Actuators::CompressorAndDamper,
        ] {
            assert_eq!(cu.decide(&s, &FaultState::default(), prev, &mut sink), prev);
        }
        assert!(sink.events.is_empty());
    }

    #[test]
    fn exact_threshold_is_not_a_crossing() {
        let cu = ControlUnit::new();
        let mut sink = RecordingSink::new();
        // freezer exactly target + 2, compartment exactly target + 3
        let next = cu.decide(
            &state(6.0, -16.0),
            &FaultState::default(),
            Actuators::Off,
            &mut sink,
        );
        assert_eq!(next, Actuators::Off);
    }

    #[test]
    fn stops_only_when_both_zones_are_cold() {
        let cu = ControlUnit::new();
        let mut sink = RecordingSink::new();

        // freezer cold, compartment not cold enough: keep running
        let next = cu.decide(
            &state(2.5, -20.5),
            &FaultState::default(),
            Actuators::CompressorOnly,
            &mut sink,
        );
        assert_eq!(next, Actuators::CompressorOnly);

        let next = cu.decide(
            &state(1.5, -20.5),
            &FaultState::default(),
            Actuators::CompressorAndDamper,
            &mut sink,
        );
        assert_eq!(next, Actuators::Off);
        assert_eq!(
            sink.events,
            vec![
                AppEvent::CompressorChanged { on: false },
                AppEvent::DamperChanged {
                    open: false,
                    compressor_stopped: true
                },
            ]
        );
    }

    #[test]
    fn damper_closes_when_compartment_is_cold_but_compressor_runs() {
        let cu = ControlUnit::new();
        let mut sink = RecordingSink::new();
        // freezer warm keeps compressor on, compartment below target - 1
        let next = cu.decide(
            &state(1.5, -15.0),
            &FaultState::default(),
            Actuators::CompressorAndDamper,
            &mut sink,
        );
        assert_eq!(next, Actuators::CompressorOnly);
        assert_eq!(
            sink.events,
            vec![AppEvent::DamperChanged {
                open: false,
                compressor_stopped: false
            }]
        );
    }

    #[test]
    fn suspended_while_any_subsystem_unhealthy() {
        let cu = ControlUnit::new();
        for kind in FaultKind::ALL {
            let mut faults = FaultState::default();
            faults.set_healthy(kind, false);
            let mut sink = RecordingSink::new();
            // would switch on if control ran
            let next = cu.decide(&state(12.0, -6.0), &faults, Actuators::Off, &mut sink);
            assert_eq!(next, Actuators::Off, "{kind} fault must suspend control");
            assert!(sink.events.is_empty());
        }
    }

    #[test]
    fn dead_band_rules_depend_only_on_state() {
        // in band: previous output is kept
        assert!(ControlUnit::decide_compressor(&state(3.0, -18.0), true));
        assert!(!ControlUnit::decide_compressor(&state(3.0, -18.0), false));
        assert!(ControlUnit::decide_compressor(&state(6.5, -18.0), false));
        assert!(!ControlUnit::decide_compressor(&state(1.5, -20.5), true));

        assert!(ControlUnit::decide_damper(&state(3.0, -18.0), true));
        assert!(ControlUnit::decide_damper(&state(4.5, -18.0), false));
        assert!(!ControlUnit::decide_damper(&state(1.5, -18.0), true));
    }
}
