use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A discrete one-shot trigger.
///
/// The simulation consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Start a jump if none is in progress.
    Jump,
    /// Drop a teleport marker, or return to the one already dropped.
    ToggleTeleport,
    /// Toggle the global time freeze.
    ToggleFreeze,
    /// Toggle invulnerability.
    ToggleNoDeath,
    /// Toggle forced flash-grenade behaviour for enemies.
    ToggleFlashDemo,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

/// Everything the simulation reads from the player in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// x: strafe (+1 left), y: vertical, z: forward (+1 ahead).
    pub thrust: Vec3,
    /// Mouse movement this frame (x: yaw, y: pitch), in raw units.
    pub look_delta: Vec2,
    pub fire: bool,
    pub throw_grenade: bool,
    pub actions: Vec<Action>,
}

impl FrameInput {
    /// No input at all.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_thrust(mut self, thrust: Vec3) -> Self {
        self.thrust = thrust;
        self
    }

    pub fn with_look(mut self, delta: Vec2) -> Self {
        self.look_delta = delta;
        self
    }

    pub fn with_fire(mut self) -> Self {
        self.fire = true;
        self
    }

    pub fn with_grenade(mut self) -> Self {
        self.throw_grenade = true;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Thrust with every component clamped to [-1, 1]; non-finite becomes 0.
    pub fn clamped_thrust(&self) -> Vec3 {
        let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Vec3::new(clamp(self.thrust.x), clamp(self.thrust.y), clamp(self.thrust.z))
    }

    /// Whether the player is supplying any movement this frame.
    pub fn has_movement(&self) -> bool {
        self.clamped_thrust() != Vec3::ZERO
    }

    pub fn has_action(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_no_movement() {
        let input = FrameInput::idle();
        assert!(!input.has_movement());
        assert!(!input.fire);
        assert!(input.actions.is_empty());
    }

    #[test]
    fn vertical_thrust_counts_as_movement() {
        let input = FrameInput::idle().with_thrust(Vec3::new(0.0, 1.0, 0.0));
        assert!(input.has_movement());
    }

    #[test]
    fn thrust_is_clamped() {
        let input = FrameInput::idle().with_thrust(Vec3::new(5.0, f32::NAN, -3.0));
        assert_eq!(input.clamped_thrust(), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn builder_collects_actions() {
        let input = FrameInput::idle()
            .with_action(Action::Jump)
            .with_action(Action::ToggleFreeze)
            .with_fire();
        assert!(input.has_action(Action::Jump));
        assert!(input.has_action(Action::ToggleFreeze));
        assert!(!input.has_action(Action::ToggleTeleport));
        assert!(input.fire);
    }
}
