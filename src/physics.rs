//! First-order thermal model of the two zones.
//!
//! Each tick both zones gain heat from the room, the compressor pulls heat
//! out of the freezer, and an open damper lets freezer air cool the
//! compartment at a cost to the freezer.  Gaussian sensor noise is added on
//! top, then both temperatures are hard-clamped to their physical limits.
//!
//! The coefficients are per tick, not per second: changing the tick period
//! changes the simulated time scale, not the per-step deltas.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::model::{Actuators, COMPARTMENT_TEMP_RANGE, FREEZER_TEMP_RANGE, ThermalState};

const AMBIENT_GAIN_COMPARTMENT: f32 = 0.02;
const AMBIENT_GAIN_FREEZER: f32 = 0.01;
const COMPRESSOR_COOLING_FREEZER: f32 = 0.15;
const DAMPER_COOLING_COMPARTMENT: f32 = 0.08;
/// Cold air lost from the freezer while the damper is open.
const DAMPER_LEAK_FREEZER: f32 = 0.05;
/// Wall conduction into the compartment with the damper closed.
const WALL_COOLING_COMPARTMENT: f32 = 0.01;

/// Steps [`ThermalState`] forward one tick.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    rng: StdRng,
    /// `None` when the configured standard deviation is zero.
    noise: Option<Normal<f32>>,
}

impl PhysicsEngine {
    /// Build with the given noise standard deviation (°C) and optional seed.
    pub fn new(noise_std_dev_c: f32, seed: Option<u64>) -> Result<Self> {
        // Normal::new only rejects a non-finite deviation
        if !noise_std_dev_c.is_finite() || noise_std_dev_c < 0.0 {
            return Err(Error::Config("noise_std_dev_c must be finite and >= 0"));
        }
        let noise = if noise_std_dev_c == 0.0 {
            None
        } else {
            let normal = Normal::new(0.0, noise_std_dev_c)
                .map_err(|_| Error::Config("noise_std_dev_c must be finite and >= 0"))?;
            Some(normal)
        };
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self { rng, noise })
    }

    /// Noise-free engine; every step is fully deterministic.
    pub fn noiseless() -> Self {
        Self {
            rng: StdRng::seed_from_u64(0),
            noise: None,
        }
    }

    /// Advance `state` by one tick under `actuators`. Targets pass through.
    pub fn step(&mut self, state: &ThermalState, actuators: Actuators) -> ThermalState {
        let mut next = *state;

        // 1. Heat ingress from the room
        next.compartment_temp += AMBIENT_GAIN_COMPARTMENT;
        next.freezer_temp += AMBIENT_GAIN_FREEZER;

        // 2. Refrigeration
        match actuators {
            Actuators::Off => {}
            Actuators::CompressorOnly => {
                next.freezer_temp -= COMPRESSOR_COOLING_FREEZER;
                next.compartment_temp -= WALL_COOLING_COMPARTMENT;
            }
            Actuators::CompressorAndDamper => {
                next.freezer_temp -= COMPRESSOR_COOLING_FREEZER;
                next.compartment_temp -= DAMPER_COOLING_COMPARTMENT;
                next.freezer_temp += DAMPER_LEAK_FREEZER;
            }
        }

        // 3. Sensor noise, independent per zone
        if let Some(noise) = &self.noise {
            next.compartment_temp += noise.sample(&mut self.rng);
            next.freezer_temp += noise.sample(&mut self.rng);
        }

        // 4. Physical limits
        next.compartment_temp = next
            .compartment_temp
            .clamp(*COMPARTMENT_TEMP_RANGE.start(), *COMPARTMENT_TEMP_RANGE.end());
        next.freezer_temp = next
            .freezer_temp
            .clamp(*FREEZER_TEMP_RANGE.start(), *FREEZER_TEMP_RANGE.end());

        next
    }
}
