//! Actuator control.

pub mod hysteresis;

pub use hysteresis::ControlUnit;
