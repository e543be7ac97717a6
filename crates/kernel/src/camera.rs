use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use labyrinth_common::{OnceFlag, UnitVector};
use labyrinth_maze::{Footprint, MazeGrid, footprint_corners};
use serde::{Deserialize, Serialize};

use crate::config::PlayerTunables;

/// Eye position and the point it looks at. The player's body is the
/// camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Full 3D look vector (not normalized).
    pub fn facing(&self) -> Vec3 {
        self.look_at - self.position
    }

    /// Normalized look direction, pitch included.
    pub fn aim(&self) -> Result<UnitVector, labyrinth_common::DegenerateVectorError> {
        UnitVector::new(self.facing())
    }

    fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.look_at += offset;
    }
}

/// An in-progress jump: elapsed time and the heights it lands back on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    pub elapsed: f32,
    pub base_height: f32,
    pub base_look_height: f32,
}

/// Result of one locomotion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Candidate position accepted.
    Moved,
    /// Candidate touched a wall; camera restored.
    Blocked,
    /// Accepted and first to overlap the goal.
    ReachedGoal,
}

/// What a teleport toggle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleportOutcome {
    Marked(Vec3),
    Returned { from: Vec3, to: Vec3 },
}

/// Turns thrust and mouse look into camera motion, validated against the
/// maze. Owns the camera.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    camera: CameraState,
    jump: Option<JumpState>,
    teleport_marker: Option<Vec3>,
    tunables: PlayerTunables,
}

impl LocomotionController {
    pub fn new(tunables: PlayerTunables) -> Self {
        Self {
            camera: CameraState::new(tunables.start_position, tunables.start_look_at),
            jump: None,
            teleport_marker: None,
            tunables,
        }
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn jump(&self) -> Option<JumpState> {
        self.jump
    }

    pub fn teleport_marker(&self) -> Option<Vec3> {
        self.teleport_marker
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// Begin a jump from the current height. Ignored mid-air.
    pub fn start_jump(&mut self) -> bool {
        if self.jump.is_some() {
            return false;
        }
        self.jump = Some(JumpState {
            elapsed: 0.0,
            base_height: self.camera.position.y,
            base_look_height: self.camera.look_at.y,
        });
        true
    }

    /// First call drops a marker under the player; the second returns the
    /// camera there, keeping its facing, and clears the marker.
    pub fn toggle_teleport(&mut self) -> TeleportOutcome {
        match self.teleport_marker.take() {
            Some(marker) => {
                let from = self.camera.position;
                let to = Vec3::new(marker.x, self.tunables.teleport_height, marker.z);
                self.camera.translate(to - from);
                self.jump = None;
                tracing::debug!(?from, ?to, "teleported to marker");
                TeleportOutcome::Returned { from, to }
            }
            None => {
                let p = self.camera.position;
                let marker = Vec3::new(p.x, 0.0, p.z);
                self.teleport_marker = Some(marker);
                tracing::debug!(?marker, "teleport marker dropped");
                TeleportOutcome::Marked(marker)
            }
        }
    }

    /// One frame of locomotion. `thrust` must already be clamped.
    ///
    /// Jump and look always apply; the horizontal displacement is applied
    /// only if the player footprint stays clear, otherwise the camera is
    /// restored exactly.
    pub fn step(
        &mut self,
        dt: f32,
        thrust: Vec3,
        look_delta: Vec2,
        grid: &MazeGrid,
        won: &mut OnceFlag,
    ) -> MoveOutcome {
        let displacement = self.displacement(thrust);
        self.advance_jump(dt);
        self.apply_look(look_delta);

        let before = self.camera;
        self.camera.translate(displacement);
        let corners = footprint_corners(Footprint::Player, self.camera.position);
        if !grid.is_position_clear(&corners) {
            self.camera = before;
            return MoveOutcome::Blocked;
        }
        if grid.is_at_goal(&corners, won) {
            return MoveOutcome::ReachedGoal;
        }
        MoveOutcome::Moved
    }

    fn displacement(&self, thrust: Vec3) -> Vec3 {
        let forward = match UnitVector::horizontal(self.camera.facing()) {
            Ok(f) => f.get(),
            Err(err) => {
                tracing::debug!(%err, "no horizontal facing, movement skipped");
                return Vec3::ZERO;
            }
        };
        let step = self.tunables.thrust_step;
        let perpendicular = Vec3::new(-forward.z, 0.0, forward.x);
        forward * (thrust.z * step)
            - perpendicular * (thrust.x * step * self.tunables.strafe_factor)
    }

    fn advance_jump(&mut self, dt: f32) {
        let Some(jump) = self.jump.as_mut() else {
            return;
        };
        jump.elapsed += dt;
        let t = jump.elapsed;
        let rise = self.tunables.jump_velocity * t + 0.5 * self.tunables.jump_gravity * t * t;
        if t > 0.0 && rise <= 0.0 {
            self.camera.position.y = jump.base_height;
            self.camera.look_at.y = jump.base_look_height;
            self.jump = None;
        } else {
            self.camera.position.y = jump.base_height + rise;
            self.camera.look_at.y = jump.base_look_height + rise;
        }
    }

    fn apply_look(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return;
        }
        let dir = self.camera.facing();
        let radius = dir.length();
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let k = self.tunables.look_sensitivity_deg.to_radians();
        let theta = dir.z.atan2(dir.x) + delta.x * k;
        let margin = self.tunables.pitch_margin;
        let phi = ((dir.y / radius).clamp(-1.0, 1.0).acos() + delta.y * k).clamp(margin, PI - margin);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.camera.look_at = self.camera.position
            + radius * Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_at(position: Vec3, look_at: Vec3) -> LocomotionController {
        LocomotionController::new(PlayerTunables {
            start_position: position,
            start_look_at: look_at,
            ..PlayerTunables::default()
        })
    }

    fn open_grid() -> MazeGrid {
        MazeGrid::new([], Vec3::new(1000.0, 0.0, 1000.0))
    }

    #[test]
    fn forward_thrust_moves_along_facing() {
        let mut c = controller_at(Vec3::new(2.0, 0.8, -2.0), Vec3::new(10.0, 0.8, -2.0));
        let mut won = OnceFlag::new();
        let out = c.step(0.016, Vec3::Z, Vec2::ZERO, &open_grid(), &mut won);
        assert_eq!(out, MoveOutcome::Moved);
        assert!((c.camera().position.x - 2.1).abs() < 1e-6);
        assert!((c.camera().look_at.x - 10.1).abs() < 1e-6);
    }

    #[test]
    fn strafe_is_scaled() {
        let mut c = controller_at(Vec3::ZERO, Vec3::X);
        let mut won = OnceFlag::new();
        c.step(0.016, Vec3::X, Vec2::ZERO, &open_grid(), &mut won);
        // Facing +x, strafing left moves toward -z.
        let p = c.camera().position;
        assert!(p.x.abs() < 1e-6);
        assert!((p.z + 0.15).abs() < 1e-6);
    }

    #[test]
    fn blocked_move_restores_camera_exactly() {
        let grid = MazeGrid::standard();
        // Wall cell (0, 1) spans x in [-1, 1] around z = -2.
        let mut c = controller_at(Vec3::new(1.2, 0.8, -2.0), Vec3::new(-6.0, 0.8, -2.0));
        let before = c.camera();
        let mut won = OnceFlag::new();
        let out = c.step(0.016, Vec3::Z, Vec2::ZERO, &grid, &mut won);
        assert_eq!(out, MoveOutcome::Blocked);
        assert_eq!(c.camera(), before);
        assert!(!won.is_set());
    }

    #[test]
    fn reaching_goal_wins_once() {
        let grid = MazeGrid::new([], Vec3::new(5.0, 0.0, -2.0));
        let mut c = controller_at(Vec3::new(3.8, 0.8, -2.0), Vec3::new(10.0, 0.8, -2.0));
        let mut won = OnceFlag::new();
        assert_eq!(
            c.step(0.016, Vec3::Z, Vec2::ZERO, &grid, &mut won),
            MoveOutcome::ReachedGoal
        );
        assert!(won.is_set());
        assert_eq!(
            c.step(0.016, Vec3::Z, Vec2::ZERO, &grid, &mut won),
            MoveOutcome::Moved
        );
    }

    #[test]
    fn jump_rises_and_lands_on_base() {
        let mut c = controller_at(Vec3::new(0.0, 0.8, 0.0), Vec3::new(1.0, 0.8, 0.0));
        let grid = open_grid();
        let mut won = OnceFlag::new();
        assert!(c.start_jump());
        assert!(!c.start_jump());
        let mut peak = 0.8f32;
        for _ in 0..100 {
            c.step(0.02, Vec3::ZERO, Vec2::ZERO, &grid, &mut won);
            peak = peak.max(c.camera().position.y);
            if !c.is_jumping() {
                break;
            }
        }
        assert!(!c.is_jumping());
        assert!(peak > 1.5);
        assert_eq!(c.camera().position.y, 0.8);
        assert_eq!(c.camera().look_at.y, 0.8);
    }

    #[test]
    fn mouse_yaw_turns_facing() {
        let mut c = controller_at(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0));
        let mut won = OnceFlag::new();
        // 900 units * 0.1 degrees = 90 degrees of yaw.
        c.step(0.016, Vec3::ZERO, Vec2::new(900.0, 0.0), &open_grid(), &mut won);
        let f = c.camera().facing();
        assert!(f.x.abs() < 1e-4);
        assert!((f.z - 8.0).abs() < 1e-4);
        assert!((f.length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut c = controller_at(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let mut won = OnceFlag::new();
        c.step(0.016, Vec3::ZERO, Vec2::new(0.0, -10_000.0), &open_grid(), &mut won);
        let f = c.camera().facing();
        assert!(f.y > 0.99);
        assert!(UnitVector::horizontal(f).is_ok());
    }

    #[test]
    fn teleport_marks_then_returns() {
        let mut c = controller_at(Vec3::new(2.0, 0.8, -2.0), Vec3::new(10.0, 0.8, -2.0));
        let mut won = OnceFlag::new();
        assert!(matches!(c.toggle_teleport(), TeleportOutcome::Marked(_)));
        for _ in 0..5 {
            c.step(0.016, Vec3::Z, Vec2::ZERO, &open_grid(), &mut won);
        }
        let facing = c.camera().facing();
        let out = c.toggle_teleport();
        assert!(matches!(out, TeleportOutcome::Returned { .. }));
        let cam = c.camera();
        assert_eq!(cam.position, Vec3::new(2.0, 0.8, -2.0));
        assert!((cam.facing() - facing).length() < 1e-5);
        assert!(c.teleport_marker().is_none());
    }
}
