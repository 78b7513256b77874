//! Application core: pure simulation logic, zero I/O.
//!
//! The tick pipeline lives in [`service`]; everything crossing its boundary
//! is a [`commands::AppCommand`] in, an [`events::AppEvent`] through the
//! [`ports::EventSink`] port, or a [`snapshot::Snapshot`] out.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod snapshot;
