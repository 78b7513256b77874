//! Adapters: presentation-side consumers of the engine's snapshots.
//!
//! | Adapter   | Consumes   | Connects to          |
//! |-----------|------------|----------------------|
//! | `console` | `Snapshot` | `log` facade / stdout |

pub mod console;
