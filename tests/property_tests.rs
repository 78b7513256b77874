//! Property tests for the physics, control and fault invariants.

use fridgesim::app::commands::AppCommand;
use fridgesim::app::ports::NullSink;
use fridgesim::app::service::SimulationCore;
use fridgesim::config::SimConfig;
use fridgesim::control::ControlUnit;
use fridgesim::model::{
    Actuators, COMPARTMENT_TARGET_RANGE, COMPARTMENT_TEMP_RANGE, FREEZER_TARGET_RANGE,
    FREEZER_TEMP_RANGE, FaultKind, FaultState, ThermalState, Zone,
};
use fridgesim::physics::PhysicsEngine;
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────

fn arb_actuators() -> impl Strategy<Value = Actuators> {
    prop_oneof![
        Just(Actuators::Off),
        Just(Actuators::CompressorOnly),
        Just(Actuators::CompressorAndDamper),
    ]
}

fn arb_fault_kind() -> impl Strategy<Value = FaultKind> {
    prop_oneof![
        Just(FaultKind::CompartmentSensor),
        Just(FaultKind::FreezerSensor),
        Just(FaultKind::Controller),
    ]
}

fn arb_zone() -> impl Strategy<Value = Zone> {
    prop_oneof![Just(Zone::Compartment), Just(Zone::Freezer)]
}

/// Temperatures well outside the physical limits, and legal targets.
fn arb_state() -> impl Strategy<Value = ThermalState> {
    (
        -50.0f32..50.0,
        -60.0f32..20.0,
        COMPARTMENT_TARGET_RANGE,
        FREEZER_TARGET_RANGE,
    )
        .prop_map(|(c, f, ct, ft)| ThermalState {
            compartment_temp: c,
            freezer_temp: f,
            compartment_target: ct,
            freezer_target: ft,
        })
}

#[derive(Debug, Clone)]
enum Op {
    Tick,
    Fault(FaultKind),
    Target(Zone, f32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => Just(Op::Tick),
        1 => arb_fault_kind().prop_map(Op::Fault),
        1 => (arb_zone(), -100.0f32..100.0).prop_map(|(z, c)| Op::Target(z, c)),
    ]
}

// ── Physics ───────────────────────────────────────────────────

proptest! {
    /// After any step, from any state, under any actuators and noise level,
    /// both temperatures are inside their physical limits.
    #[test]
    fn step_always_clamps(
        state in arb_state(),
        act in arb_actuators(),
        noise in 0.0f32..5.0,
        seed in any::<u64>(),
    ) {
        let mut physics = PhysicsEngine::new(noise, Some(seed)).unwrap();
        let next = physics.step(&state, act);
        prop_assert!(COMPARTMENT_TEMP_RANGE.contains(&next.compartment_temp));
        prop_assert!(FREEZER_TEMP_RANGE.contains(&next.freezer_temp));
        prop_assert_eq!(next.compartment_target, state.compartment_target);
        prop_assert_eq!(next.freezer_target, state.freezer_target);
    }
}

// ── Control ───────────────────────────────────────────────────

proptest! {
    /// A running compressor stops only when both zones are below their
    /// lower thresholds at the same time.
    #[test]
    fn running_compressor_stops_only_when_both_zones_cold(
        state in arb_state(),
        prev in prop_oneof![Just(Actuators::CompressorOnly), Just(Actuators::CompressorAndDamper)],
    ) {
        let next = ControlUnit::new().decide(&state, &FaultState::default(), prev, &mut NullSink);
        let both_cold = state.freezer_temp < state.freezer_target - 2.0
            && state.compartment_temp < state.compartment_target - 1.0;
        prop_assert_eq!(next.compressor_on(), !both_cold);
    }

    /// An idle compressor starts only when a zone is above its upper threshold.
    #[test]
    fn idle_compressor_starts_only_when_a_zone_is_warm(state in arb_state()) {
        let next = ControlUnit::new().decide(
            &state,
            &FaultState::default(),
            Actuators::Off,
            &mut NullSink,
        );
        let warm = state.freezer_temp > state.freezer_target + 2.0
            || state.compartment_temp > state.compartment_target + 3.0;
        prop_assert_eq!(next.compressor_on(), warm);
    }
}

// ── Whole pipeline ────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Arbitrary interleavings of ticks, faults and target changes keep every
    /// invariant the presentation layer relies on.
    #[test]
    fn pipeline_invariants_hold(
        ops in proptest::collection::vec(arb_op(), 1..400),
        seed in any::<u64>(),
    ) {
        let config = SimConfig { rng_seed: Some(seed), ..SimConfig::default() };
        let mut core = SimulationCore::new(config).unwrap();

        for op in ops {
            match op {
                Op::Tick => core.tick([]),
                Op::Fault(kind) => core.handle_command(AppCommand::TriggerFault(kind)).unwrap(),
                Op::Target(zone, c) => core.handle_command(AppCommand::SetTarget(zone, c)).unwrap(),
            }

            let snap = core.snapshot();
            let s = snap.thermal;
            prop_assert!(COMPARTMENT_TEMP_RANGE.contains(&s.compartment_temp));
            prop_assert!(FREEZER_TEMP_RANGE.contains(&s.freezer_temp));
            prop_assert!(COMPARTMENT_TARGET_RANGE.contains(&s.compartment_target));
            prop_assert!(FREEZER_TARGET_RANGE.contains(&s.freezer_target));
            prop_assert!(!snap.damper_open() || snap.compressor_on());
            if !snap.faults.all_healthy() {
                prop_assert_eq!(snap.actuators, Actuators::Off);
            }
            for kind in FaultKind::ALL {
                prop_assert_eq!(
                    snap.faults.is_healthy(kind),
                    snap.faults.countdown(kind) == 0
                );
            }
        }
    }

    /// Re-triggering an active fault never changes its countdown.
    #[test]
    fn retrigger_leaves_countdown_unchanged(
        kind in arb_fault_kind(),
        ticks_before in 0u16..49,
        retriggers in 1usize..10,
    ) {
        let mut core =
            SimulationCore::with_physics(SimConfig::default(), PhysicsEngine::noiseless()).unwrap();
        core.handle_command(AppCommand::TriggerFault(kind)).unwrap();
        for _ in 0..ticks_before {
            core.tick([]);
        }
        let expected = 50 - ticks_before;
        for _ in 0..retriggers {
            core.handle_command(AppCommand::TriggerFault(kind)).unwrap();
            prop_assert_eq!(core.faults().countdown(kind), expected);
        }
    }
}
