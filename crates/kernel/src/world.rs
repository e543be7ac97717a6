use glam::Vec3;
use labyrinth_common::{EntityId, Transform, UnitVector, collide_2d};
use labyrinth_input::{Action, FrameInput};
use labyrinth_maze::{CELL_SIZE, CellCoord, Footprint, MazeGrid, footprint_corners, layout};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::camera::{CameraState, LocomotionController, MoveOutcome, TeleportOutcome};
use crate::config::SimulationConfig;
use crate::enemy::{Enemy, EnemyAttack, EnemyContext, MoveState};
use crate::grenade::{ExplosionEffect, Grenade, GrenadeKind};
use crate::particles::ParticleSystem;
use crate::player::{DeathCause, PlayerState, SessionEnd, SessionSignal, SessionStatus};
use crate::poses::{CameraView, DrawCall, Material, RenderablePoses, Shape};
use crate::projectile::{Owner, Projectile};

/// A record of something that happened during `advance`.
///
/// The log is append-only; the shell drains it for display or analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    EnemySpawned { id: EntityId, position: Vec3 },
    ProjectileFired { owner: Owner, origin: Vec3 },
    GrenadeThrown { id: EntityId, kind: GrenadeKind, origin: Vec3 },
    EnemyDamaged { id: EntityId, health: u8 },
    EnemyKilled { id: EntityId, position: Vec3 },
    GrenadeExploded {
        id: EntityId,
        kind: GrenadeKind,
        effect: ExplosionEffect,
    },
    Toggled { action: Action, enabled: bool },
    Teleported { from: Vec3, to: Vec3 },
    PlayerDied { cause: DeathCause },
    PlayerWon,
}

/// Events kept before the oldest are discarded.
pub const EVENT_LOG_CAPACITY: usize = 4096;

/// Bounded append-only event log. When full, the oldest half is dropped;
/// shells that want every event drain it each frame.
#[derive(Debug, Clone, Default)]
struct EventLog {
    events: Vec<SimEvent>,
    dropped: u64,
}

impl EventLog {
    fn push(&mut self, event: SimEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            let overflow = EVENT_LOG_CAPACITY / 2;
            self.events.drain(..overflow);
            self.dropped += overflow as u64;
            tracing::warn!(dropped = self.dropped, "event log full, oldest events discarded");
        }
        self.events.push(event);
    }
}

/// The authoritative session state.
///
/// Owns every roster and the seeded RNG. Given the same config and the same
/// sequence of `advance` calls, two worlds evolve identically.
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    config: SimulationConfig,
    grid: MazeGrid,
    rng: StdRng,
    tick: u64,
    player: PlayerState,
    locomotion: LocomotionController,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    grenades: Vec<Grenade>,
    particle_systems: Vec<ParticleSystem>,
    frozen: bool,
    flash_demo: bool,
    flash_frames: u32,
    session: SessionSignal,
    event_log: EventLog,
}

impl SimulationWorld {
    /// Build a session from `config` and spawn its enemy table.
    pub fn new(config: SimulationConfig) -> Self {
        let grid = MazeGrid::new(
            layout::WALL_CELLS.iter().map(|&(x, z)| CellCoord::new(x, z)),
            config.goal,
        );
        let mut world = Self {
            grid,
            rng: StdRng::seed_from_u64(config.seed),
            tick: 0,
            player: PlayerState::new(),
            locomotion: LocomotionController::new(config.player.clone()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            grenades: Vec::new(),
            particle_systems: Vec::new(),
            frozen: false,
            flash_demo: false,
            flash_frames: 0,
            session: SessionSignal::default(),
            event_log: EventLog::default(),
            config,
        };
        for position in world.config.spawns.clone() {
            world.spawn_enemy(position);
        }
        tracing::info!(
            seed = world.config.seed,
            enemies = world.enemies.len(),
            "simulation world created"
        );
        world
    }

    /// Rebuild everything from the config, seed included.
    pub fn restart(&mut self) {
        tracing::info!(tick = self.tick, "session restart");
        *self = Self::new(self.config.clone());
    }

    /// The configuration this session was built from.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The static maze.
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Player eye and look target after the latest frame.
    pub fn camera(&self) -> CameraState {
        self.locomotion.camera()
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Live enemies in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Bullets still in flight, both owners.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn grenades(&self) -> &[Grenade] {
        &self.grenades
    }

    /// Smoke clouds and death bursts that still have particles.
    pub fn particle_systems(&self) -> &[ParticleSystem] {
        &self.particle_systems
    }

    /// Whether the freeze toggle is on.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether every enemy decision is forced to Bomb.
    pub fn flash_demo(&self) -> bool {
        self.flash_demo
    }

    /// Frames of flash whiteout left.
    pub fn flash_frames(&self) -> u32 {
        self.flash_frames
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.status()
    }

    /// The end-of-session signal. Yields once, then `None`.
    pub fn take_session_end(&mut self) -> Option<SessionEnd> {
        self.session.take()
    }

    /// Events recorded since the last drain, oldest first. Holds at most
    /// [`EVENT_LOG_CAPACITY`] entries.
    pub fn events(&self) -> &[SimEvent] {
        &self.event_log.events
    }

    /// Events discarded because the log filled up before being drained.
    pub fn dropped_events(&self) -> u64 {
        self.event_log.dropped
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log.events)
    }

    /// Add an enemy at full health and log it.
    pub fn spawn_enemy(&mut self, position: Vec3) -> EntityId {
        let enemy = Enemy::spawn(position, &self.config.enemy);
        let id = enemy.id;
        tracing::debug!(enemy = %id.short(), ?position, "enemy spawned");
        self.enemies.push(enemy);
        self.event_log.push(SimEvent::EnemySpawned { id, position });
        id
    }

    /// Fire a bullet at the owner's speed with the configured lifetime.
    pub fn spawn_projectile(&mut self, owner: Owner, origin: Vec3, direction: UnitVector) {
        let w = &self.config.weapons;
        let speed = match owner {
            Owner::Player => w.player_bullet_speed,
            Owner::Enemy => w.enemy_bullet_speed,
        };
        self.projectiles
            .push(Projectile::new(owner, origin, direction, speed, w.bullet_lifetime));
        self.event_log
            .push(SimEvent::ProjectileFired { owner, origin });
    }

    /// Throw a grenade from `origin` toward `target` at its kind's launch
    /// speed.
    pub fn spawn_grenade(
        &mut self,
        kind: GrenadeKind,
        origin: Vec3,
        target: Vec3,
    ) -> Result<EntityId, labyrinth_common::DegenerateVectorError> {
        let w = &self.config.weapons;
        let speed = match kind {
            GrenadeKind::Smoke => w.smoke_launch_speed,
            GrenadeKind::Flash => w.flash_launch_speed,
        };
        let grenade = Grenade::throw(kind, origin, target, speed, w.grenade_gravity, w.fuse_seconds)?;
        let id = grenade.id;
        self.grenades.push(grenade);
        self.event_log
            .push(SimEvent::GrenadeThrown { id, kind, origin });
        Ok(id)
    }

    /// Advance one frame and return what to draw.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]`. Once the session has ended
    /// the world no longer changes.
    pub fn advance(&mut self, dt: f32, input: &FrameInput) -> RenderablePoses {
        let _span = tracing::info_span!("advance", tick = self.tick).entered();
        if self.session.has_ended() {
            return self.poses();
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };

        self.apply_actions(&input.actions);

        let thrust = input.clamped_thrust();
        self.player.thrust = thrust;
        let outcome = self.locomotion.step(
            dt,
            thrust,
            input.look_delta,
            &self.grid,
            &mut self.player.won,
        );
        if outcome == MoveOutcome::ReachedGoal {
            tracing::info!(tick = self.tick, "goal reached");
            self.event_log.push(SimEvent::PlayerWon);
            self.session.raise(SessionEnd::Won);
        }

        if input.fire {
            self.fire();
        }
        if input.throw_grenade {
            self.throw_smoke();
        }

        // Frozen time still runs while the player is moving.
        let gate = !self.frozen || input.has_movement();
        if gate {
            self.tick_enemies();
        }
        self.resolve_hits();
        self.resolve_wall_impacts();
        self.remove_dead_enemies();
        self.check_hazards();
        if gate {
            for p in &mut self.projectiles {
                p.update(dt);
            }
            for s in &mut self.particle_systems {
                s.update(dt, &mut self.rng);
            }
            self.update_grenades(dt);
        }
        self.projectiles.retain(Projectile::is_alive);
        self.particle_systems.retain(|s| !s.is_exhausted());
        self.grenades.retain(|g| !g.is_exploded());

        self.player.fire_cooldown = self.player.fire_cooldown.saturating_sub(1);
        self.flash_frames = self.flash_frames.saturating_sub(1);
        self.tick += 1;
        tracing::trace!(
            enemies = self.enemies.len(),
            projectiles = self.projectiles.len(),
            grenades = self.grenades.len(),
            particle_systems = self.particle_systems.len(),
            gate,
            "frame done"
        );
        self.poses()
    }

    fn apply_actions(&mut self, actions: &[Action]) {
        for &action in actions {
            match action {
                Action::Jump => {
                    self.locomotion.start_jump();
                }
                Action::ToggleTeleport => {
                    if let TeleportOutcome::Returned { from, to } = self.locomotion.toggle_teleport() {
                        self.event_log.push(SimEvent::Teleported { from, to });
                    }
                }
                Action::ToggleFreeze => {
                    self.frozen = !self.frozen;
                    self.log_toggle(action, self.frozen);
                }
                Action::ToggleNoDeath => {
                    self.player.can_die = !self.player.can_die;
                    self.log_toggle(action, !self.player.can_die);
                }
                Action::ToggleFlashDemo => {
                    self.flash_demo = !self.flash_demo;
                    self.log_toggle(action, self.flash_demo);
                }
                Action::Noop => {}
            }
        }
    }

    fn log_toggle(&mut self, action: Action, enabled: bool) {
        tracing::info!(?action, enabled, "toggle");
        self.event_log.push(SimEvent::Toggled { action, enabled });
    }

    fn fire(&mut self) {
        if !self.player.can_fire() {
            return;
        }
        let camera = self.locomotion.camera();
        let direction = match camera.aim() {
            Ok(d) => d,
            Err(err) => {
                tracing::debug!(%err, "shot skipped");
                return;
            }
        };
        self.spawn_projectile(Owner::Player, camera.position, direction);
        self.player.fire_cooldown = self.config.player.fire_cooldown_frames;
    }

    fn throw_smoke(&mut self) {
        if !self.config.capabilities.has_grenades {
            return;
        }
        let camera = self.locomotion.camera();
        if let Err(err) = self.spawn_grenade(GrenadeKind::Smoke, camera.position, camera.look_at) {
            tracing::debug!(%err, "grenade throw skipped");
        }
    }

    fn tick_enemies(&mut self) {
        let player_position = self.locomotion.camera().position;
        let caps = self.config.capabilities;
        let bombs_enabled = caps.has_grenades && caps.has_enemy_grenades;
        let mut attacks = Vec::new();
        for enemy in &mut self.enemies {
            let corners = footprint_corners(Footprint::Enemy, enemy.position);
            let ctx = EnemyContext {
                player_position,
                blocked: !self.grid.is_position_clear(&corners),
                force_bomb: self.flash_demo,
                bombs_enabled,
                tunables: &self.config.enemy,
            };
            if let Some(attack) = enemy.tick(&ctx, &mut self.rng) {
                attacks.push((enemy.id, attack));
            }
        }
        for (id, attack) in attacks {
            match attack {
                EnemyAttack::Shoot { origin, direction } => {
                    tracing::debug!(enemy = %id.short(), "enemy shoots");
                    self.spawn_projectile(Owner::Enemy, origin, direction);
                }
                EnemyAttack::Throw { origin, target } => {
                    tracing::debug!(enemy = %id.short(), "enemy throws flash grenade");
                    if let Err(err) = self.spawn_grenade(GrenadeKind::Flash, origin, target) {
                        tracing::debug!(%err, "grenade throw skipped");
                    }
                }
            }
        }
    }

    fn resolve_hits(&mut self) {
        let player_hit = self.config.weapons.player_hit;
        for enemy in &mut self.enemies {
            for p in &mut self.projectiles {
                if !p.is_alive() || p.owner != Owner::Player || !player_hit.hits(p.position, enemy.position) {
                    continue;
                }
                if enemy.register_hit(&self.config.enemy) {
                    p.kill();
                    self.event_log.push(SimEvent::EnemyDamaged {
                        id: enemy.id,
                        health: enemy.health,
                    });
                }
            }
        }

        let camera = self.locomotion.camera().position;
        let enemy_hit = self.config.weapons.enemy_hit;
        let mut struck = false;
        for p in &mut self.projectiles {
            if p.is_alive() && p.owner == Owner::Enemy && enemy_hit.hits(p.position, camera) {
                p.kill();
                struck = true;
            }
        }
        if struck {
            self.kill_player(DeathCause::EnemyBullet);
        }
    }

    fn resolve_wall_impacts(&mut self) {
        for p in &mut self.projectiles {
            if !p.is_alive() {
                continue;
            }
            let corners = footprint_corners(Footprint::Projectile, p.position);
            if !self.grid.is_position_clear(&corners) {
                p.kill();
                if p.owner == Owner::Player {
                    self.player.fire_cooldown = 0;
                }
            }
        }
    }

    fn remove_dead_enemies(&mut self) {
        let w = &self.config.weapons;
        for enemy in self.enemies.iter().filter(|e| e.is_dead()) {
            let origin = enemy.position - Vec3::Y * w.death_burst_drop;
            self.particle_systems
                .push(ParticleSystem::new(origin, w.death_burst_seconds));
            tracing::info!(enemy = %enemy.id.short(), position = ?enemy.position, "enemy killed");
            self.event_log.push(SimEvent::EnemyKilled {
                id: enemy.id,
                position: enemy.position,
            });
        }
        self.enemies.retain(|e| !e.is_dead());
    }

    fn check_hazards(&mut self) {
        let camera = self.locomotion.camera().position;
        let player_box = footprint_corners(Footprint::Player, camera);
        let touching = self
            .enemies
            .iter()
            .any(|e| collide_2d(&player_box, &footprint_corners(Footprint::Enemy, e.position)));
        if touching {
            self.kill_player(DeathCause::EnemyContact);
        }
        if self.config.capabilities.has_lava && self.on_lava(camera) {
            self.kill_player(DeathCause::Lava);
        }
    }

    fn on_lava(&self, camera: Vec3) -> bool {
        let p = &self.config.player;
        camera.y <= p.lava_height
            && self.config.lava_tiles.iter().any(|tile| {
                let dx = camera.x - tile.x;
                let dz = camera.z - tile.y;
                dx * dx + dz * dz < p.lava_radius_sq
            })
    }

    fn kill_player(&mut self, cause: DeathCause) {
        if self.session.has_ended() {
            return;
        }
        if !self.player.can_die {
            tracing::debug!(?cause, "death suppressed");
            return;
        }
        if self.player.dead.raise() {
            tracing::info!(tick = self.tick, ?cause, "player died");
            self.event_log.push(SimEvent::PlayerDied { cause });
            self.session.raise(SessionEnd::Died(cause));
        }
    }

    fn update_grenades(&mut self, dt: f32) {
        let camera = self.locomotion.camera();
        let mut effects = Vec::new();
        for g in &mut self.grenades {
            g.integrate(dt);
            let corners = footprint_corners(Footprint::Projectile, g.position);
            let hit_wall = !self.grid.is_position_clear(&corners);
            if hit_wall || g.fuse_expired() {
                if let Some(effect) = g.explode(camera.position, camera.facing()) {
                    effects.push((g.id, g.kind, effect));
                }
            }
        }
        for (id, kind, effect) in effects {
            match effect {
                ExplosionEffect::Smoke { origin } => {
                    self.particle_systems.push(ParticleSystem::new(
                        origin,
                        self.config.weapons.smoke_emission_seconds,
                    ));
                }
                ExplosionEffect::Flash { duration_frames } => {
                    self.flash_frames = duration_frames;
                }
            }
            self.event_log
                .push(SimEvent::GrenadeExploded { id, kind, effect });
        }
    }

    /// Dynamic draws for the current state.
    pub fn poses(&self) -> RenderablePoses {
        let camera = self.locomotion.camera();
        let mut draws = Vec::with_capacity(self.enemies.len() + self.projectiles.len() + self.grenades.len());
        let max_health = self.config.enemy.max_health;
        for e in &self.enemies {
            let material = if e.is_flashing() {
                Material::EnemyDamaged
            } else {
                Material::Enemy {
                    wear: max_health.saturating_sub(e.health),
                }
            };
            let transform = Transform::from_position(e.position).with_yaw(e.direction.yaw());
            draws.push(DrawCall::new(Shape::Enemy(e.state), transform, material));
        }
        for p in self.projectiles.iter().filter(|p| p.is_alive()) {
            draws.push(DrawCall::new(
                Shape::Bullet,
                Transform::from_position(p.position).with_uniform_scale(0.1),
                Material::Bullet(p.owner),
            ));
        }
        for g in &self.grenades {
            draws.push(DrawCall::new(
                Shape::Grenade,
                Transform::from_position(g.position).with_uniform_scale(0.15),
                Material::Grenade,
            ));
        }
        for p in self.particle_systems.iter().flat_map(|s| s.particles()) {
            draws.push(DrawCall::new(
                Shape::Particle,
                Transform::from_position(p.position).with_uniform_scale(0.3 * p.size_factor()),
                Material::Smoke,
            ));
        }
        if let Some(marker) = self.locomotion.teleport_marker() {
            draws.push(DrawCall::new(
                Shape::TeleportMarker,
                Transform::from_position(marker),
                Material::Marker,
            ));
        }
        RenderablePoses {
            tick: self.tick,
            camera: CameraView {
                eye: camera.position,
                target: camera.look_at,
                up: Vec3::Y,
            },
            draws,
            flash_frames: self.flash_frames,
            frozen: self.frozen,
            status: self.session.status(),
        }
    }

    /// Walls, the goal chest and (if enabled) lava. Never changes during a
    /// session.
    pub fn static_scene(&self) -> Vec<DrawCall> {
        let mut draws: Vec<DrawCall> = self
            .grid
            .wall_cells()
            .map(|cell| {
                let centre = MazeGrid::cell_center(cell) + Vec3::Y * (CELL_SIZE * 0.5);
                DrawCall::new(
                    Shape::Wall,
                    Transform::from_position(centre).with_uniform_scale(CELL_SIZE),
                    Material::Wall,
                )
            })
            .collect();
        draws.push(DrawCall::new(
            Shape::Chest,
            Transform::from_position(self.grid.goal()).with_uniform_scale(0.5),
            Material::Chest,
        ));
        if self.config.capabilities.has_lava {
            for tile in &self.config.lava_tiles {
                draws.push(DrawCall::new(
                    Shape::Lava,
                    Transform::from_position(Vec3::new(tile.x, 0.0, tile.y))
                        .with_scale(Vec3::new(1.4, 0.05, 1.4)),
                    Material::Lava,
                ));
            }
        }
        draws
    }

    /// FNV-1a over the simulated state. Entity ids are excluded, so two
    /// runs with the same seed and inputs hash equal.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            for c in v.to_array() {
                mix(h, &c.to_le_bytes());
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        let camera = self.locomotion.camera();
        mix_vec(&mut h, camera.position);
        mix_vec(&mut h, camera.look_at);
        mix(
            &mut h,
            &[
                self.player.won.is_set() as u8,
                self.player.dead.is_set() as u8,
                self.frozen as u8,
            ],
        );
        mix(&mut h, &self.flash_frames.to_le_bytes());
        for e in &self.enemies {
            mix_vec(&mut h, e.position);
            mix_vec(&mut h, e.direction.get());
            mix(&mut h, &[e.health, state_tag(e.state)]);
        }
        for p in &self.projectiles {
            mix_vec(&mut h, p.position);
        }
        for g in &self.grenades {
            mix_vec(&mut h, g.position);
        }
        mix(&mut h, &(self.particle_systems.len() as u64).to_le_bytes());
        h
    }
}

fn state_tag(state: MoveState) -> u8 {
    match state {
        MoveState::Idle => 0,
        MoveState::Seeking => 1,
        MoveState::Attacking => 2,
        MoveState::Charging => 3,
        MoveState::Bomb => 4,
    }
}
