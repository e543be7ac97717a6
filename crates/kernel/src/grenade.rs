use glam::Vec3;
use labyrinth_common::{EntityId, UnitVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrenadeKind {
    /// Thrown by the player; leaves a smoke cloud.
    Smoke,
    /// Thrown by enemies; whites out the player's view.
    Flash,
}

/// What an explosion does to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ExplosionEffect {
    Smoke { origin: Vec3 },
    Flash { duration_frames: u32 },
}

/// Whiteout length for a flash seen at `cos` between the player's facing and
/// the direction to the grenade. Looking straight at it is worst.
pub fn flash_duration_frames(cos: f32) -> u32 {
    let cos = if cos.is_finite() { cos.clamp(-1.0, 1.0) } else { 1.0 };
    ((50.0 * (cos + 1.0)).round() + 60.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grenade {
    pub id: EntityId,
    pub kind: GrenadeKind,
    pub position: Vec3,
    /// Position before the latest integration step.
    pub previous_position: Vec3,
    pub velocity: Vec3,
    pub gravity: Vec3,
    pub fuse_elapsed: f32,
    pub fuse_duration: f32,
    exploded: bool,
}

impl Grenade {
    pub fn new(
        kind: GrenadeKind,
        origin: Vec3,
        velocity: Vec3,
        gravity: f32,
        fuse_duration: f32,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            position: origin,
            previous_position: origin,
            velocity,
            gravity: Vec3::new(0.0, gravity, 0.0),
            fuse_elapsed: 0.0,
            fuse_duration,
            exploded: false,
        }
    }

    /// Launch from `origin` toward `target` at `speed`.
    pub fn throw(
        kind: GrenadeKind,
        origin: Vec3,
        target: Vec3,
        speed: f32,
        gravity: f32,
        fuse_duration: f32,
    ) -> Result<Self, labyrinth_common::DegenerateVectorError> {
        let aim = UnitVector::new(target - origin)?;
        Ok(Self::new(kind, origin, aim * speed, gravity, fuse_duration))
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn fuse_expired(&self) -> bool {
        self.fuse_elapsed >= self.fuse_duration
    }

    /// Semi-implicit Euler step with a floor at y = 0.
    pub fn integrate(&mut self, dt: f32) {
        if self.exploded {
            return;
        }
        self.fuse_elapsed += dt;
        self.previous_position = self.position;
        self.position += self.velocity * dt + 0.5 * self.gravity * dt * dt;
        self.velocity += self.gravity * dt;
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
        }
    }

    /// Detonate. Only the first call yields an effect.
    pub fn explode(&mut self, camera: Vec3, facing: Vec3) -> Option<ExplosionEffect> {
        if self.exploded {
            return None;
        }
        self.exploded = true;
        let effect = match self.kind {
            GrenadeKind::Smoke => ExplosionEffect::Smoke {
                origin: self.previous_position,
            },
            GrenadeKind::Flash => {
                let cos = match (UnitVector::new(self.position - camera), UnitVector::new(facing)) {
                    (Ok(incoming), Ok(facing)) => incoming.dot(facing),
                    // Going off in the player's face.
                    _ => 1.0,
                };
                ExplosionEffect::Flash {
                    duration_frames: flash_duration_frames(cos),
                }
            }
        };
        tracing::debug!(grenade = %self.id.short(), kind = ?self.kind, ?effect, "grenade exploded");
        Some(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_grenade_settles_on_the_floor() {
        let mut g = Grenade::new(GrenadeKind::Smoke, Vec3::new(1.0, 3.0, -1.0), Vec3::ZERO, -9.8, 0.7);
        for _ in 0..200 {
            g.integrate(1.0 / 60.0);
        }
        assert_eq!(g.position, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(g.velocity.y, 0.0);
        g.integrate(1.0 / 60.0);
        assert_eq!(g.position.y, 0.0);
        assert_eq!(g.velocity.y, 0.0);
    }

    #[test]
    fn fuse_counts_up() {
        let mut g = Grenade::new(GrenadeKind::Flash, Vec3::Y, Vec3::X, -9.8, 0.7);
        g.integrate(0.5);
        assert!(!g.fuse_expired());
        g.integrate(0.25);
        assert!(g.fuse_expired());
    }

    #[test]
    fn throw_rejects_zero_aim() {
        assert!(Grenade::throw(GrenadeKind::Smoke, Vec3::ONE, Vec3::ONE, 10.0, -9.8, 0.7).is_err());
        let g = Grenade::throw(GrenadeKind::Smoke, Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 10.0, -9.8, 0.7)
            .unwrap();
        assert_eq!(g.velocity, Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn explodes_once() {
        let mut g = Grenade::new(GrenadeKind::Smoke, Vec3::new(0.0, 1.0, 0.0), Vec3::X, -9.8, 0.7);
        g.integrate(0.1);
        let before = g.previous_position;
        assert_eq!(
            g.explode(Vec3::ZERO, Vec3::X),
            Some(ExplosionEffect::Smoke { origin: before })
        );
        assert!(g.is_exploded());
        assert_eq!(g.explode(Vec3::ZERO, Vec3::X), None);
        let at = g.position;
        g.integrate(0.1);
        assert_eq!(g.position, at);
    }

    #[test]
    fn flash_duration_depends_on_facing() {
        assert_eq!(flash_duration_frames(1.0), 160);
        assert_eq!(flash_duration_frames(0.0), 110);
        assert_eq!(flash_duration_frames(-1.0), 60);
        assert_eq!(flash_duration_frames(f32::NAN), 160);

        let mut ahead = Grenade::new(GrenadeKind::Flash, Vec3::new(5.0, 0.8, 0.0), Vec3::ZERO, -9.8, 0.7);
        assert_eq!(
            ahead.explode(Vec3::new(0.0, 0.8, 0.0), Vec3::X),
            Some(ExplosionEffect::Flash { duration_frames: 160 })
        );
        let mut behind = Grenade::new(GrenadeKind::Flash, Vec3::new(-5.0, 0.8, 0.0), Vec3::ZERO, -9.8, 0.7);
        assert_eq!(
            behind.explode(Vec3::new(0.0, 0.8, 0.0), Vec3::X),
            Some(ExplosionEffect::Flash { duration_frames: 60 })
        );
    }
}
