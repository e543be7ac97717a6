use glam::Vec3;
use labyrinth_common::UnitVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A straight-flying bullet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projectile {
    pub position: Vec3,
    pub direction: UnitVector,
    /// World units per second.
    pub speed: f32,
    pub owner: Owner,
    pub remaining_lifetime: f32,
    alive: bool,
}

impl Projectile {
    pub fn new(owner: Owner, origin: Vec3, direction: UnitVector, speed: f32, lifetime: f32) -> Self {
        Self {
            position: origin,
            direction,
            speed,
            owner,
            remaining_lifetime: lifetime,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Wall impact or a consumed hit.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// An update that finds the lifetime spent kills the projectile instead
    /// of moving it.
    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        if self.remaining_lifetime <= 0.0 {
            self.alive = false;
            return;
        }
        self.remaining_lifetime -= dt;
        self.position += self.direction * (self.speed * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_along_direction() {
        let mut p = Projectile::new(Owner::Player, Vec3::ZERO, UnitVector::X, 24.0, 10.0);
        p.update(0.5);
        assert_eq!(p.position, Vec3::new(12.0, 0.0, 0.0));
        assert!(p.is_alive());
    }

    #[test]
    fn outlives_its_lifetime_by_one_update() {
        let mut p = Projectile::new(Owner::Enemy, Vec3::ZERO, UnitVector::X, 1.0, 1.0);
        let mut elapsed = 0.0;
        for _ in 0..4 {
            p.update(0.25);
            elapsed += 0.25;
            assert!(p.is_alive());
        }
        assert_eq!(elapsed, 1.0);
        assert_eq!(p.remaining_lifetime, 0.0);
        p.update(0.25);
        assert!(!p.is_alive());
        // Dead projectiles stay put.
        let at = p.position;
        p.update(0.25);
        assert_eq!(p.position, at);
    }

    #[test]
    fn kill_is_terminal() {
        let mut p = Projectile::new(Owner::Player, Vec3::ZERO, UnitVector::NEG_Z, 24.0, 10.0);
        p.kill();
        p.update(0.1);
        assert!(!p.is_alive());
        assert_eq!(p.position, Vec3::ZERO);
    }
}
