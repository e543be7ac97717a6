use glam::Vec3;
use rand::Rng;
use serde::Serialize;

/// A single rising puff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub age: f32,
    pub lifespan: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.position.y += dt * self.vertical_velocity;
        self.age += dt;
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifespan
    }

    /// Shrinks from 1 to 0 over the particle's life.
    pub fn size_factor(&self) -> f32 {
        (1.0 - self.age / self.lifespan).clamp(0.0, 1.0)
    }
}

/// Emits one particle per update until its emission window closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSystem {
    pub origin: Vec3,
    pub emission_window: f32,
    pub age: f32,
    active: bool,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(origin: Vec3, emission_window: f32) -> Self {
        Self {
            origin,
            emission_window,
            age: 0.0,
            active: true,
            particles: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Window closed and every particle gone.
    pub fn is_exhausted(&self) -> bool {
        !self.active && self.particles.is_empty()
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.active {
            self.emit(rng);
        }
        for p in &mut self.particles {
            p.update(dt);
        }
        self.particles.retain(Particle::is_alive);
        self.age += dt;
        if self.age > self.emission_window {
            self.active = false;
        }
    }

    fn emit(&mut self, rng: &mut impl Rng) {
        let offset = Vec3::new(
            rng.random::<f32>() * 2.0 - 1.0,
            0.0,
            rng.random::<f32>() * 2.0 - 2.0,
        );
        self.particles.push(Particle {
            position: self.origin + offset,
            vertical_velocity: rng.random::<f32>() * 2.0 + 0.5,
            age: 0.0,
            lifespan: rng.random::<f32>() * 10.0 + 1.0,
        });
    }
}
