use glam::Vec3;
use labyrinth_common::Transform;
use serde::Serialize;

use crate::enemy::MoveState;
use crate::player::SessionStatus;
use crate::projectile::Owner;

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// Enemy body; the state picks the limb pose.
    Enemy(MoveState),
    Bullet,
    Grenade,
    Particle,
    Wall,
    Chest,
    Lava,
    TeleportMarker,
}

/// How to shade it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Material {
    /// Wear grows from 0 (fresh) as the enemy loses health.
    Enemy { wear: u8 },
    EnemyDamaged,
    Bullet(Owner),
    Grenade,
    Smoke,
    Wall,
    Chest,
    Lava,
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCall {
    pub shape: Shape,
    pub transform: Transform,
    pub material: Material,
}

impl DrawCall {
    pub fn new(shape: Shape, transform: Transform, material: Material) -> Self {
        Self {
            shape,
            transform,
            material,
        }
    }
}

/// Where the eye is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Everything a renderer needs for one frame. Only final, post-collision
/// positions appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderablePoses {
    pub tick: u64,
    pub camera: CameraView,
    pub draws: Vec<DrawCall>,
    /// Frames of flash whiteout still to show.
    pub flash_frames: u32,
    pub frozen: bool,
    pub status: SessionStatus,
}

impl RenderablePoses {
    pub fn count(&self, pred: impl Fn(&Shape) -> bool) -> usize {
        self.draws.iter().filter(|d| pred(&d.shape)).count()
    }
}
