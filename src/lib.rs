//! fridgesim: two-compartment refrigerator simulation engine.
//!
//! A fixed-period tick loop steps a thermal model of a fridge compartment
//! and a freezer, drives a compressor and a damper with hysteresis control,
//! and lets an operator inject subsystem faults that auto-recover.
//!
//! ```text
//!  Engine (thread, command channel, snapshot slot)
//!    └─ SimulationCore
//!         FaultInjector ─▶ ControlUnit ─▶ PhysicsEngine
//!                   └──── EventLog ◀────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod event_log;
pub mod faults;
pub mod model;
pub mod physics;
pub mod stats;

pub use app::snapshot::Snapshot;
pub use config::SimConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use model::{Actuators, FaultKind, Zone};
