//! Input: the per-frame snapshot the simulation consumes, and the mapping
//! from logical keys to it.
//!
//! # Invariants
//! - The simulation consumes `FrameInput` only, never raw key events.
//! - Thrust components are bounded to [-1, 1].
//! - One-shot actions fire on the frame their key goes down, once.

pub mod action;
mod mapper;

pub use action::{Action, FrameInput};
pub use mapper::{InputError, InputMapper, Key, KeyScript, MAX_SCRIPT_FRAMES};

pub fn crate_info() -> &'static str {
    "labyrinth-input v0.1.0"
}
