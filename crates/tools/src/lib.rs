//! Developer tooling: simulation inspector and frame timing.
//!
//! # Invariants
//! - Tools only read simulation state.

mod inspector;
mod timer;

pub use inspector::{EnemyInfo, SimulationInspector, SimulationSummary};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "labyrinth-tools v0.1.0"
}
