//! Rendering adapter: renderer-agnostic interface over simulation poses.
//!
//! # Invariants
//! - Renderers read `RenderablePoses`; they never touch the simulation.
//! - Static scenery is submitted once, dynamic draws every frame.

mod renderer;

pub use renderer::{DebugTextRenderer, DrawStats, DrawTarget, RenderView, Renderer, submit};

pub fn crate_info() -> &'static str {
    "labyrinth-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
