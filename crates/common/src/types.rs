use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a simulated entity (enemies, grenades).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(Vec3::splat(s))
    }

    /// Rotate about the vertical axis.
    pub fn with_yaw(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_y(radians);
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A terminal boolean that can be raised exactly once.
///
/// Used for session-ending flags (won, dead): the first `raise` reports the
/// transition, every later call is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnceFlag(bool);

impl OnceFlag {
    pub fn new() -> Self {
        Self(false)
    }

    /// Raise the flag. Returns true only for the call that changed it.
    pub fn raise(&mut self) -> bool {
        if self.0 {
            return false;
        }
        self.0 = true;
        true
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_builders() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(0.2);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::splat(0.2));
    }

    #[test]
    fn once_flag_raises_once() {
        let mut flag = OnceFlag::new();
        assert!(!flag.is_set());
        assert!(flag.raise());
        assert!(flag.is_set());
        assert!(!flag.raise());
        assert!(flag.is_set());
    }
}
