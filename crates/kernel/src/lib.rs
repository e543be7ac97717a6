//! Simulation kernel: the authoritative session state and its per-frame
//! step. Player locomotion, enemy AI, bullets, grenades and particles all
//! advance inside [`SimulationWorld::advance`].
//!
//! # Invariants
//! - Only post-collision positions are exposed to rendering.
//! - A rejected move restores the camera bit-for-bit.
//! - All randomness comes from one seeded RNG; equal seeds and inputs give
//!   equal runs.
//! - The session ends at most once.

pub mod camera;
pub mod config;
pub mod enemy;
pub mod grenade;
pub mod particles;
pub mod player;
pub mod poses;
pub mod projectile;
pub mod world;

pub use camera::{CameraState, LocomotionController, MoveOutcome};
pub use config::{Capabilities, ConfigError, SimulationConfig};
pub use enemy::{Enemy, MoveState};
pub use grenade::{ExplosionEffect, Grenade, GrenadeKind};
pub use particles::{Particle, ParticleSystem};
pub use player::{DeathCause, PlayerState, SessionEnd, SessionStatus};
pub use poses::{CameraView, DrawCall, Material, RenderablePoses, Shape};
pub use projectile::{Owner, Projectile};
pub use world::{EVENT_LOG_CAPACITY, SimEvent, SimulationWorld};

pub fn crate_info() -> &'static str {
    "labyrinth-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("labyrinth-kernel"));
    }
}
