use std::f32::consts::TAU;

use glam::Vec3;
use labyrinth_common::{EntityId, UnitVector, rotate_about_y};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DecisionWeights, EnemyTunables};

/// Enemy behaviour state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveState {
    /// Wanders slowly in a random direction.
    Idle,
    /// Walks toward the player.
    Seeking,
    /// Stands still and shoots.
    Attacking,
    /// Runs at the player.
    Charging,
    /// Stands still and throws flash grenades.
    Bomb,
}

impl MoveState {
    /// Whether this state translates the enemy each frame.
    pub fn moves(self) -> bool {
        matches!(self, Self::Idle | Self::Seeking | Self::Charging)
    }

    /// Whether this state re-aims at the player each frame.
    pub fn tracks_player(self) -> bool {
        matches!(self, Self::Seeking | Self::Charging)
    }

    pub fn speed(self, t: &EnemyTunables) -> f32 {
        match self {
            Self::Idle => t.idle_speed,
            Self::Seeking => t.seek_speed,
            Self::Charging => t.charge_speed,
            Self::Attacking | Self::Bomb => 0.0,
        }
    }
}

impl DecisionWeights {
    /// Map a uniform roll in [0, 1) onto the table. Bomb is skipped when
    /// `bombs` is false.
    pub fn choose(&self, roll: f32, bombs: bool) -> (MoveState, u32) {
        let bomb = if bombs { self.bomb } else { 0.0 };
        let total = self.attack + self.charge + bomb + self.seek;
        if total.is_nan() || total <= 0.0 {
            return (MoveState::Seeking, self.seek_frames);
        }
        let x = roll * total;
        if x < self.attack {
            (MoveState::Attacking, self.attack_frames)
        } else if x < self.attack + self.charge {
            (MoveState::Charging, self.charge_frames)
        } else if x < self.attack + self.charge + bomb {
            (MoveState::Bomb, self.bomb_frames)
        } else {
            (MoveState::Seeking, self.seek_frames)
        }
    }
}

/// Frame countdowns. All saturate at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTimers {
    pub decision: u32,
    pub knockback: u32,
    pub shoot_cooldown: u32,
    pub damage_flash: u32,
    pub hit_cooldown: u32,
}

impl EnemyTimers {
    fn tick(&mut self) {
        for t in [
            &mut self.decision,
            &mut self.knockback,
            &mut self.shoot_cooldown,
            &mut self.damage_flash,
            &mut self.hit_cooldown,
        ] {
            *t = t.saturating_sub(1);
        }
    }
}

/// What the enemy sees this frame.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    pub player_position: Vec3,
    /// The enemy footprint currently touches a wall.
    pub blocked: bool,
    /// Flash-demo toggle: every decision rolls Bomb.
    pub force_bomb: bool,
    pub bombs_enabled: bool,
    pub tunables: &'a EnemyTunables,
}

/// A projectile the enemy wants spawned this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAttack {
    Shoot { origin: Vec3, direction: UnitVector },
    Throw { origin: Vec3, target: Vec3 },
}

/// One maze guard and its AI state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec3,
    /// Horizontal heading; movement and shots follow it.
    pub direction: UnitVector,
    pub state: MoveState,
    pub health: u8,
    pub speed: f32,
    pub timers: EnemyTimers,
}

impl Enemy {
    /// A fresh enemy: Idle, full health, facing +x, first shot delayed.
    pub fn spawn(position: Vec3, t: &EnemyTunables) -> Self {
        Self {
            id: EntityId::new(),
            position,
            direction: UnitVector::X,
            state: MoveState::Idle,
            health: t.max_health,
            speed: t.idle_speed,
            timers: EnemyTimers {
                shoot_cooldown: t.initial_shoot_cooldown,
                ..EnemyTimers::default()
            },
        }
    }

    /// Out of health; removed from the roster at the end of the frame.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Still showing the damage tint.
    pub fn is_flashing(&self) -> bool {
        self.timers.damage_flash > 0
    }

    /// Apply a hit unless the enemy is still in its hit cooldown.
    /// Returns whether the hit registered.
    pub fn register_hit(&mut self, t: &EnemyTunables) -> bool {
        if self.timers.hit_cooldown > 0 || self.is_dead() {
            return false;
        }
        self.health -= 1;
        self.timers.damage_flash = t.damage_flash_frames;
        self.timers.hit_cooldown = t.hit_cooldown_frames;
        tracing::debug!(enemy = %self.id.short(), health = self.health, "enemy hit");
        true
    }

    /// One simulated frame: attack from the current state, then bounce,
    /// decide, promote/demote, re-aim, move and count down.
    pub fn tick(&mut self, ctx: &EnemyContext<'_>, rng: &mut impl Rng) -> Option<EnemyAttack> {
        let attack = self.attack(ctx, rng);
        let t = ctx.tunables;

        if ctx.blocked {
            self.bounce(rng, t.bounce_min_deg, t.bounce_max_deg);
            self.timers.knockback = if self.speed == t.idle_speed {
                t.knockback_slow_frames
            } else {
                t.knockback_fast_frames
            };
        }

        if self.timers.decision == 0 && self.timers.knockback == 0 {
            self.decide(ctx, rng);
        }

        let distance = self.position.distance(ctx.player_position);
        match self.state {
            MoveState::Idle if distance < t.detection_radius || self.health < t.max_health => {
                self.enter(MoveState::Seeking, t.decision.seek_frames, t);
            }
            MoveState::Seeking if distance > t.out_of_range => {
                self.enter(MoveState::Idle, 0, t);
            }
            _ => {}
        }

        if self.state.tracks_player() && self.timers.knockback == 0 {
            // Directly under the player there is no heading to take.
            if let Ok(dir) = UnitVector::horizontal(ctx.player_position - self.position) {
                self.direction = dir;
            }
        }

        if self.state.moves() {
            self.position += self.direction * (self.speed * t.stride);
        }

        self.timers.tick();
        attack
    }

    fn attack(&mut self, ctx: &EnemyContext<'_>, rng: &mut impl Rng) -> Option<EnemyAttack> {
        if self.timers.shoot_cooldown > 0 {
            return None;
        }
        let t = ctx.tunables;
        match self.state {
            MoveState::Attacking => {
                self.timers.shoot_cooldown = t.attack_cooldown_frames;
                let spread = t.aim_spread_deg.to_radians();
                let deviation = (rng.random::<f32>() * 2.0 - 1.0) * spread;
                let aim = rotate_about_y(ctx.player_position - self.position, deviation);
                match UnitVector::horizontal(aim) {
                    Ok(direction) => Some(EnemyAttack::Shoot {
                        origin: self.position,
                        direction,
                    }),
                    Err(err) => {
                        tracing::debug!(enemy = %self.id.short(), %err, "shot skipped");
                        None
                    }
                }
            }
            MoveState::Bomb if ctx.bombs_enabled => {
                self.timers.shoot_cooldown = t.bomb_cooldown_frames;
                Some(EnemyAttack::Throw {
                    origin: self.position,
                    target: ctx.player_position,
                })
            }
            _ => None,
        }
    }

    fn decide(&mut self, ctx: &EnemyContext<'_>, rng: &mut impl Rng) {
        let t = ctx.tunables;
        if self.state == MoveState::Idle {
            let heading = rng.random::<f32>() * TAU;
            self.turn(heading);
            self.timers.decision = t.idle_decision_frames;
            return;
        }
        let (next, frames) = if ctx.force_bomb && ctx.bombs_enabled {
            (MoveState::Bomb, t.decision.forced_bomb_frames)
        } else {
            t.decision.choose(rng.random::<f32>(), ctx.bombs_enabled)
        };
        self.enter(next, frames, t);
    }

    fn enter(&mut self, next: MoveState, frames: u32, t: &EnemyTunables) {
        if next != self.state {
            tracing::debug!(
                enemy = %self.id.short(),
                from = ?self.state,
                to = ?next,
                "enemy state change"
            );
        }
        self.state = next;
        self.speed = next.speed(t);
        self.timers.decision = frames;
    }

    /// Turn around by a random angle in [min, max] degrees, either way.
    fn bounce(&mut self, rng: &mut impl Rng, min_deg: f32, max_deg: f32) {
        let angle = (min_deg + rng.random::<f32>() * (max_deg - min_deg)).to_radians();
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.turn(angle * sign);
    }

    fn turn(&mut self, radians: f32) {
        if let Ok(dir) = UnitVector::horizontal(rotate_about_y(self.direction.get(), radians)) {
            self.direction = dir;
        }
    }
}
