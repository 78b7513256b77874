//! Simulation configuration parameters
//!
//! All tunable parameters for the simulated appliance. Defaults reproduce
//! the reference behaviour: a 100 ms tick, 5 s fault recovery, and a fridge
//! that starts warm (7 °C / -10 °C) against 3 °C / -18 °C targets.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{COMPARTMENT_TARGET_RANGE, FREEZER_TARGET_RANGE};

/// Core simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Timing ---
    /// Nominal tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// Ticks a triggered fault stays active before auto-recovery
    pub fault_recovery_ticks: u16,

    // --- Physics ---
    /// Standard deviation of the Gaussian sensor noise (°C per tick)
    pub noise_std_dev_c: f32,
    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy
    pub rng_seed: Option<u64>,

    // --- Initial state ---
    /// Compartment (fridge) temperature at start (°C)
    pub initial_compartment_temp_c: f32,
    /// Freezer temperature at start (°C)
    pub initial_freezer_temp_c: f32,
    /// Compartment target at start (°C, 0..=10)
    pub compartment_target_c: f32,
    /// Freezer target at start (°C, -25..=-10)
    pub freezer_target_c: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 100,    // 10 Hz
            fault_recovery_ticks: 50, // 5 s at 10 Hz

            // Physics
            noise_std_dev_c: 0.05,
            rng_seed: None,

            // Initial state
            initial_compartment_temp_c: 7.0,
            initial_freezer_temp_c: -10.0,
            compartment_target_c: 3.0,
            freezer_target_c: -18.0,
        }
    }
}

impl SimConfig {
    /// Reject values the engine cannot run with.
    ///
    /// Targets outside their documented range are rejected here rather than
    /// clamped: a config file is not operator input.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be > 0"));
        }
        if self.fault_recovery_ticks == 0 {
            return Err(Error::Config("fault_recovery_ticks must be > 0"));
        }
        if !self.noise_std_dev_c.is_finite() || self.noise_std_dev_c < 0.0 {
            return Err(Error::Config("noise_std_dev_c must be finite and >= 0"));
        }
        if !self.initial_compartment_temp_c.is_finite() || !self.initial_freezer_temp_c.is_finite()
        {
            return Err(Error::Config("initial temperatures must be finite"));
        }
        if !COMPARTMENT_TARGET_RANGE.contains(&self.compartment_target_c) {
            return Err(Error::Config("compartment_target_c must be within 0..=10"));
        }
        if !FREEZER_TARGET_RANGE.contains(&self.freezer_target_c) {
            return Err(Error::Config("freezer_target_c must be within -25..=-10"));
        }
        Ok(())
    }

    /// Duration of one tick in seconds.
    pub fn tick_secs(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }
}
