//! Plain data records shared by every stage of the tick pipeline.
//!
//! [`ThermalState`], [`Actuators`] and [`FaultState`] carry no behaviour of
//! their own beyond accessors; the simulation core owns the canonical copies
//! and hands read-only copies to observers inside a
//! [`Snapshot`](crate::app::snapshot::Snapshot).

use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{Error, Result};

/// Physical limits of the compartment (fridge) temperature (°C).
pub const COMPARTMENT_TEMP_RANGE: RangeInclusive<f32> = -5.0..=15.0;
/// Physical limits of the freezer temperature (°C).
pub const FREEZER_TEMP_RANGE: RangeInclusive<f32> = -30.0..=-5.0;
/// Settable range of the compartment target (°C).
pub const COMPARTMENT_TARGET_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Settable range of the freezer target (°C).
pub const FREEZER_TARGET_RANGE: RangeInclusive<f32> = -25.0..=-10.0;

// ---------------------------------------------------------------------------
// Thermal state
// ---------------------------------------------------------------------------

/// Temperatures and targets of both zones (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalState {
    pub compartment_temp: f32,
    pub freezer_temp: f32,
    pub compartment_target: f32,
    pub freezer_target: f32,
}

impl ThermalState {
    /// Start-of-run state taken from configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            compartment_temp: config.initial_compartment_temp_c,
            freezer_temp: config.initial_freezer_temp_c,
            compartment_target: config.compartment_target_c,
            freezer_target: config.freezer_target_c,
        }
    }

    /// Current target of `zone`.
    pub fn target(&self, zone: Zone) -> f32 {
        match zone {
            Zone::Compartment => self.compartment_target,
            Zone::Freezer => self.freezer_target,
        }
    }

    /// Current temperature of `zone`.
    pub fn temperature(&self, zone: Zone) -> f32 {
        match zone {
            Zone::Compartment => self.compartment_temp,
            Zone::Freezer => self.freezer_temp,
        }
    }

    pub(crate) fn set_target(&mut self, zone: Zone, celsius: f32) {
        match zone {
            Zone::Compartment => self.compartment_target = celsius,
            Zone::Freezer => self.freezer_target = celsius,
        }
    }
}

impl Default for ThermalState {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// One of the two temperature-controlled spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Compartment,
    Freezer,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::Compartment, Zone::Freezer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compartment => "compartment",
            Self::Freezer => "freezer",
        }
    }

    /// Range the target of this zone is clamped into.
    pub fn target_range(self) -> RangeInclusive<f32> {
        match self {
            Self::Compartment => COMPARTMENT_TARGET_RANGE,
            Self::Freezer => FREEZER_TARGET_RANGE,
        }
    }

    /// Clamp an operator-supplied target into range.
    ///
    /// Non-finite values are a caller error, not something to clamp.
    pub fn clamp_target(self, celsius: f32) -> Result<f32> {
        if !celsius.is_finite() {
            return Err(Error::NonFiniteTarget);
        }
        let range = self.target_range();
        Ok(celsius.clamp(*range.start(), *range.end()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compartment" | "fridge" => Ok(Self::Compartment),
            "freezer" => Ok(Self::Freezer),
            _ => Err(Error::UnknownZone),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Compressor/damper state.
///
/// The damper only moves cold air while the compressor runs, so there is no
/// "damper open, compressor off" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuators {
    #[default]
    Off,
    CompressorOnly,
    CompressorAndDamper,
}

impl Actuators {
    /// Build from the two policy decisions. `damper_open` is ignored while
    /// the compressor is off.
    pub fn from_flags(compressor_on: bool, damper_open: bool) -> Self {
        match (compressor_on, damper_open) {
            (false, _) => Self::Off,
            (true, false) => Self::CompressorOnly,
            (true, true) => Self::CompressorAndDamper,
        }
    }

    pub fn compressor_on(self) -> bool {
        !matches!(self, Self::Off)
    }

    pub fn damper_open(self) -> bool {
        matches!(self, Self::CompressorAndDamper)
    }
}

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

/// Subsystems that can be failed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FaultKind {
    CompartmentSensor = 0,
    FreezerSensor = 1,
    Controller = 2,
}

impl FaultKind {
    /// Number of fault kinds; sizes the countdown array.
    pub const COUNT: usize = 3;
    pub const ALL: [FaultKind; Self::COUNT] = [
        FaultKind::CompartmentSensor,
        FaultKind::FreezerSensor,
        FaultKind::Controller,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompartmentSensor => "compartment_sensor",
            Self::FreezerSensor => "freezer_sensor",
            Self::Controller => "controller",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompartmentSensor => write!(f, "compartment sensor"),
            Self::FreezerSensor => write!(f, "freezer sensor"),
            Self::Controller => write!(f, "controller"),
        }
    }
}

impl FromStr for FaultKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_lowercase().replace('-', "_");
        FaultKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalised)
            .ok_or(Error::UnknownFaultKind)
    }
}

/// Health flags and recovery countdowns of every subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultState {
    compartment_sensor_ok: bool,
    freezer_sensor_ok: bool,
    controller_connected: bool,
    /// Ticks remaining until auto-recovery, indexed by [`FaultKind::index`].
    countdowns: [u16; FaultKind::COUNT],
}

impl Default for FaultState {
    fn default() -> Self {
        Self {
            compartment_sensor_ok: true,
            freezer_sensor_ok: true,
            controller_connected: true,
            countdowns: [0; FaultKind::COUNT],
        }
    }
}

impl FaultState {
    pub fn compartment_sensor_ok(&self) -> bool {
        self.compartment_sensor_ok
    }

    pub fn freezer_sensor_ok(&self) -> bool {
        self.freezer_sensor_ok
    }

    pub fn controller_connected(&self) -> bool {
        self.controller_connected
    }

    /// Health flag of one subsystem.
    pub fn is_healthy(&self, kind: FaultKind) -> bool {
        match kind {
            FaultKind::CompartmentSensor => self.compartment_sensor_ok,
            FaultKind::FreezerSensor => self.freezer_sensor_ok,
            FaultKind::Controller => self.controller_connected,
        }
    }

    /// True when control may run.
    pub fn all_healthy(&self) -> bool {
        self.compartment_sensor_ok && self.freezer_sensor_ok && self.controller_connected
    }

    /// Ticks remaining until `kind` recovers (0 = not running).
    pub fn countdown(&self, kind: FaultKind) -> u16 {
        self.countdowns[kind.index()]
    }

    /// Whole seconds left on the recovery countdown at the given tick period.
    pub fn seconds_remaining(&self, kind: FaultKind, tick_interval_ms: u32) -> u32 {
        let ms = u64::from(self.countdown(kind)) * u64::from(tick_interval_ms);
        u32::try_from(ms / 1000).unwrap_or(u32::MAX)
    }

    /// Subsystems currently unhealthy, in [`FaultKind::ALL`] order.
    pub fn active_faults(&self) -> impl Iterator<Item = FaultKind> + '_ {
        FaultKind::ALL
            .into_iter()
            .filter(move |kind| !self.is_healthy(*kind))
    }

    pub(crate) fn set_healthy(&mut self, kind: FaultKind, healthy: bool) {
        match kind {
            FaultKind::CompartmentSensor => self.compartment_sensor_ok = healthy,
            FaultKind::FreezerSensor => self.freezer_sensor_ok = healthy,
            FaultKind::Controller => self.controller_connected = healthy,
        }
    }

    pub(crate) fn countdown_mut(&mut self, kind: FaultKind) -> &mut u16 {
        &mut self.countdowns[kind.index()]
    }
}
