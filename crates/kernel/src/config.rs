use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`SimulationConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which scene features are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub has_lava: bool,
    /// Player smoke grenades. Enemy grenades additionally need
    /// `has_enemy_grenades`.
    pub has_grenades: bool,
    pub has_enemy_grenades: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            has_lava: true,
            has_grenades: true,
            has_enemy_grenades: true,
        }
    }
}

/// Player movement, look and hazard tunables. Distances are world units,
/// cooldowns are frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    pub start_position: Vec3,
    pub start_look_at: Vec3,
    /// Distance covered per frame at full thrust.
    pub thrust_step: f32,
    pub strafe_factor: f32,
    /// Degrees of rotation per unit of mouse movement.
    pub look_sensitivity_deg: f32,
    /// Keeps the polar look angle away from straight up/down (radians).
    pub pitch_margin: f32,
    pub jump_velocity: f32,
    pub jump_gravity: f32,
    pub fire_cooldown_frames: u32,
    /// Camera height after returning to a teleport marker.
    pub teleport_height: f32,
    pub lava_radius_sq: f32,
    /// Lava only kills at or below this camera height.
    pub lava_height: f32,
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(2.0, 0.8, -2.0),
            start_look_at: Vec3::new(10.0, 0.8, -2.0),
            thrust_step: 0.1,
            strafe_factor: 1.5,
            look_sensitivity_deg: 0.1,
            pitch_margin: 0.01,
            jump_velocity: 7.0,
            jump_gravity: -19.8,
            fire_cooldown_frames: 20,
            teleport_height: 0.8,
            lava_radius_sq: 1.0,
            lava_height: 0.83,
        }
    }
}

/// Weighted table rolled when a non-idle enemy's decision timer expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionWeights {
    pub attack: f32,
    pub charge: f32,
    pub bomb: f32,
    pub seek: f32,
    pub attack_frames: u32,
    pub charge_frames: u32,
    pub bomb_frames: u32,
    pub seek_frames: u32,
    /// Timer used when the flash-demo toggle forces Bomb.
    pub forced_bomb_frames: u32,
}

impl Default for DecisionWeights {
    fn default() -> Self {
        Self {
            attack: 0.35,
            charge: 0.30,
            bomb: 0.10,
            seek: 0.25,
            attack_frames: 95,
            charge_frames: 40,
            bomb_frames: 100,
            seek_frames: 100,
            forced_bomb_frames: 200,
        }
    }
}

/// Enemy AI tunables. Speeds are world units per frame before the stride
/// factor is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTunables {
    pub max_health: u8,
    pub detection_radius: f32,
    pub out_of_range: f32,
    pub idle_speed: f32,
    pub seek_speed: f32,
    pub charge_speed: f32,
    pub stride: f32,
    pub idle_decision_frames: u32,
    pub initial_shoot_cooldown: u32,
    pub attack_cooldown_frames: u32,
    pub bomb_cooldown_frames: u32,
    pub damage_flash_frames: u32,
    pub hit_cooldown_frames: u32,
    pub knockback_slow_frames: u32,
    pub knockback_fast_frames: u32,
    pub bounce_min_deg: f32,
    pub bounce_max_deg: f32,
    pub aim_spread_deg: f32,
    pub decision: DecisionWeights,
}

impl Default for EnemyTunables {
    fn default() -> Self {
        Self {
            max_health: 5,
            detection_radius: 8.0,
            out_of_range: 20.0,
            idle_speed: 0.02,
            seek_speed: 0.04,
            charge_speed: 0.16,
            stride: 0.5,
            idle_decision_frames: 200,
            initial_shoot_cooldown: 80,
            attack_cooldown_frames: 80,
            bomb_cooldown_frames: 100,
            damage_flash_frames: 5,
            hit_cooldown_frames: 20,
            knockback_slow_frames: 28,
            knockback_fast_frames: 15,
            bounce_min_deg: 150.0,
            bounce_max_deg: 200.0,
            aim_spread_deg: 5.0,
            decision: DecisionWeights::default(),
        }
    }
}

/// Hit test between a projectile and a target: both squared distances
/// must be under their thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitThresholds {
    pub horizontal_sq: f32,
    pub vertical_sq: f32,
}

impl HitThresholds {
    pub fn hits(&self, projectile: Vec3, target: Vec3) -> bool {
        let d = projectile - target;
        d.x * d.x + d.z * d.z < self.horizontal_sq && d.y * d.y < self.vertical_sq
    }
}

/// Bullet and grenade tunables. Speeds are world units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTunables {
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub player_hit: HitThresholds,
    pub enemy_hit: HitThresholds,
    pub smoke_launch_speed: f32,
    pub flash_launch_speed: f32,
    pub grenade_gravity: f32,
    pub fuse_seconds: f32,
    pub smoke_emission_seconds: f32,
    pub death_burst_seconds: f32,
    /// How far below the enemy the death burst starts.
    pub death_burst_drop: f32,
}

impl Default for WeaponTunables {
    fn default() -> Self {
        Self {
            player_bullet_speed: 24.0,
            enemy_bullet_speed: 12.0,
            bullet_lifetime: 10.0,
            player_hit: HitThresholds {
                horizontal_sq: 0.7,
                vertical_sq: 3.4,
            },
            enemy_hit: HitThresholds {
                horizontal_sq: 0.3,
                vertical_sq: 3.4,
            },
            smoke_launch_speed: 10.0,
            flash_launch_speed: 5.0,
            grenade_gravity: -9.8,
            fuse_seconds: 0.7,
            smoke_emission_seconds: 10.0,
            death_burst_seconds: 2.0,
            death_burst_drop: 1.5,
        }
    }
}

/// Everything needed to build a session. Missing YAML fields fall back to
/// the shipped scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Upper bound on the seconds a single `advance` may integrate.
    pub max_frame_dt: f32,
    pub capabilities: Capabilities,
    pub player: PlayerTunables,
    pub enemy: EnemyTunables,
    pub weapons: WeaponTunables,
    pub goal: Vec3,
    pub spawns: Vec<Vec3>,
    /// Lava tile centres as world (x, z).
    pub lava_tiles: Vec<Vec2>,
}

const DEFAULT_SPAWNS: [[f32; 3]; 6] = [
    [17.0, 1.0, -2.0],
    [11.1, 0.8, -13.4],
    [12.1, 0.8, -12.4],
    [12.1, 0.8, -19.4],
    [22.0, 0.8, -13.4],
    [20.0, 0.8, -19.4],
];

const DEFAULT_LAVA: [[f32; 2]; 23] = [
    [20.5, -6.0],
    [12.0, -12.0],
    [10.6, -12.0],
    [6.8, -22.0],
    [12.0, -19.0],
    [12.0, -21.0],
    [10.6, -21.0],
    [10.6, -19.0],
    [12.0, -2.0],
    [10.6, -2.0],
    [5.2, -7.0],
    [6.6, -7.0],
    [34.0, -2.0],
    [34.0, -6.0],
    [34.0, -26.0],
    [24.0, -14.0],
    [30.0, -14.0],
    [28.0, -9.5],
    [20.0, -20.0],
    [21.4, -20.0],
    [1.15, -19.0],
    [2.2, -19.0],
    [38.0, -16.0],
];

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_frame_dt: 0.1,
            capabilities: Capabilities::default(),
            player: PlayerTunables::default(),
            enemy: EnemyTunables::default(),
            weapons: WeaponTunables::default(),
            goal: labyrinth_maze::layout::GOAL,
            spawns: DEFAULT_SPAWNS.iter().map(|p| Vec3::from_array(*p)).collect(),
            lava_tiles: DEFAULT_LAVA.iter().map(|p| Vec2::from_array(*p)).collect(),
        }
    }
}

impl SimulationConfig {
    /// The shipped scene with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// A scene with no enemies and no hazards, for driving single systems.
    pub fn empty() -> Self {
        Self {
            capabilities: Capabilities {
                has_lava: false,
                has_grenades: true,
                has_enemy_grenades: false,
            },
            spawns: Vec::new(),
            lava_tiles: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&src)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_frame_dt", self.max_frame_dt)?;
        self.player.validate()?;
        self.enemy.validate()?;
        self.weapons.validate()?;
        finite_vec("goal", self.goal)?;
        if self.spawns.iter().any(|s| !s.is_finite()) {
            return Err(invalid("spawns", "positions must be finite"));
        }
        if self.lava_tiles.iter().any(|t| !t.is_finite()) {
            return Err(invalid("lava_tiles", "positions must be finite"));
        }
        Ok(())
    }
}

impl PlayerTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        finite_vec("player.start_position", self.start_position)?;
        finite_vec("player.start_look_at", self.start_look_at)?;
        positive("player.thrust_step", self.thrust_step)?;
        finite("player.strafe_factor", self.strafe_factor)?;
        finite("player.look_sensitivity_deg", self.look_sensitivity_deg)?;
        finite("player.pitch_margin", self.pitch_margin)?;
        finite("player.jump_velocity", self.jump_velocity)?;
        finite("player.jump_gravity", self.jump_gravity)?;
        finite("player.teleport_height", self.teleport_height)?;
        finite("player.lava_radius_sq", self.lava_radius_sq)?;
        finite("player.lava_height", self.lava_height)?;
        if (self.start_look_at - self.start_position)
            .with_y(0.0)
            .length_squared()
            == 0.0
        {
            return Err(invalid(
                "player.start_look_at",
                "must differ horizontally from start_position",
            ));
        }
        Ok(())
    }
}

impl EnemyTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(invalid("enemy.max_health", "must be at least 1"));
        }
        finite("enemy.detection_radius", self.detection_radius)?;
        finite("enemy.out_of_range", self.out_of_range)?;
        finite("enemy.idle_speed", self.idle_speed)?;
        finite("enemy.seek_speed", self.seek_speed)?;
        finite("enemy.charge_speed", self.charge_speed)?;
        finite("enemy.stride", self.stride)?;
        finite("enemy.aim_spread_deg", self.aim_spread_deg)?;
        finite("enemy.bounce_min_deg", self.bounce_min_deg)?;
        finite("enemy.bounce_max_deg", self.bounce_max_deg)?;
        if self.bounce_min_deg > self.bounce_max_deg {
            return Err(invalid(
                "enemy.bounce_min_deg",
                "must not exceed bounce_max_deg",
            ));
        }
        let d = &self.decision;
        let weights = [d.attack, d.charge, d.bomb, d.seek];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("enemy.decision", "weights must be finite and >= 0"));
        }
        Ok(())
    }
}

impl WeaponTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        finite("weapons.player_bullet_speed", self.player_bullet_speed)?;
        finite("weapons.enemy_bullet_speed", self.enemy_bullet_speed)?;
        positive("weapons.bullet_lifetime", self.bullet_lifetime)?;
        for (field, h) in [
            ("weapons.player_hit", self.player_hit),
            ("weapons.enemy_hit", self.enemy_hit),
        ] {
            if !h.horizontal_sq.is_finite() || !h.vertical_sq.is_finite() {
                return Err(invalid(field, "thresholds must be finite"));
            }
        }
        finite("weapons.smoke_launch_speed", self.smoke_launch_speed)?;
        finite("weapons.flash_launch_speed", self.flash_launch_speed)?;
        finite("weapons.grenade_gravity", self.grenade_gravity)?;
        positive("weapons.fuse_seconds", self.fuse_seconds)?;
        finite("weapons.smoke_emission_seconds", self.smoke_emission_seconds)?;
        finite("weapons.death_burst_seconds", self.death_burst_seconds)?;
        finite("weapons.death_burst_drop", self.death_burst_drop)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn finite_vec(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "components must be finite"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and > 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_scene() {
        let c = SimulationConfig::default();
        assert_eq!(c.spawns.len(), 6);
        assert_eq!(c.lava_tiles.len(), 23);
        assert_eq!(c.goal, Vec3::new(34.0, 0.0, -10.0));
        assert!(c.capabilities.has_lava);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let c = SimulationConfig::from_yaml_str(
            "seed: 9\ncapabilities:\n  has_lava: false\nenemy:\n  detection_radius: 3.0\n",
        )
        .unwrap();
        assert_eq!(c.seed, 9);
        assert!(!c.capabilities.has_lava);
        assert!(c.capabilities.has_grenades);
        assert_eq!(c.enemy.detection_radius, 3.0);
        assert_eq!(c.enemy.max_health, 5);
        assert_eq!(c.spawns.len(), 6);
    }

    #[test]
    fn yaml_roundtrip_preserves_config() {
        let c = SimulationConfig::with_seed(77);
        let yaml = c.to_yaml().unwrap();
        assert_eq!(SimulationConfig::from_yaml_str(&yaml).unwrap(), c);
    }

    #[test]
    fn rejects_non_positive_frame_cap() {
        let err = SimulationConfig::from_yaml_str("max_frame_dt: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_frame_dt",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_yaml() {
        let err = SimulationConfig::from_yaml_str("seed: [not a number").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn rejects_vertical_start_facing() {
        let mut c = SimulationConfig::default();
        c.player.start_look_at = c.player.start_position + Vec3::Y;
        assert!(c.validate().is_err());
    }

    fn rejected_field(yaml: &str) -> &'static str {
        match SimulationConfig::from_yaml_str(yaml) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected a validation error for {yaml:?}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_player_tunables() {
        assert_eq!(
            rejected_field("player:\n  start_position: [.nan, 0.8, -2.0]\n"),
            "player.start_position"
        );
        assert_eq!(
            rejected_field("player:\n  look_sensitivity_deg: .inf\n"),
            "player.look_sensitivity_deg"
        );
        assert_eq!(
            rejected_field("player:\n  jump_gravity: .nan\n"),
            "player.jump_gravity"
        );
    }

    #[test]
    fn rejects_non_finite_enemy_tunables() {
        assert_eq!(rejected_field("enemy:\n  seek_speed: .nan\n"), "enemy.seek_speed");
        assert_eq!(rejected_field("enemy:\n  stride: -.inf\n"), "enemy.stride");
        assert_eq!(
            rejected_field("enemy:\n  detection_radius: .nan\n"),
            "enemy.detection_radius"
        );
    }

    #[test]
    fn rejects_non_finite_weapon_tunables() {
        assert_eq!(
            rejected_field("weapons:\n  player_bullet_speed: .nan\n"),
            "weapons.player_bullet_speed"
        );
        assert_eq!(
            rejected_field("weapons:\n  enemy_hit:\n    horizontal_sq: .nan\n    vertical_sq: 3.4\n"),
            "weapons.enemy_hit"
        );
        assert_eq!(
            rejected_field("weapons:\n  grenade_gravity: .inf\n"),
            "weapons.grenade_gravity"
        );
    }

    #[test]
    fn rejects_non_finite_scene_positions() {
        assert_eq!(rejected_field("lava_tiles:\n  - [.nan, -2.0]\n"), "lava_tiles");
        assert_eq!(rejected_field("spawns:\n  - [1.0, .inf, -2.0]\n"), "spawns");
        assert_eq!(rejected_field("goal: [34.0, 0.0, .nan]\n"), "goal");
    }

    #[test]
    fn hit_thresholds_are_strict() {
        let t = HitThresholds {
            horizontal_sq: 1.0,
            vertical_sq: 1.0,
        };
        assert!(t.hits(Vec3::new(0.5, 0.0, 0.5), Vec3::ZERO));
        assert!(!t.hits(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));
        assert!(!t.hits(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO));
    }
}
