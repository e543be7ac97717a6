use std::collections::BTreeMap;
use std::fmt::Write as _;

use glam::Vec3;
use labyrinth_common::Transform;
use labyrinth_kernel::{CameraView, DrawCall, Material, RenderablePoses, SessionStatus, Shape};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.0, 0.8, -2.0),
            target: Vec3::new(10.0, 0.8, -2.0),
            up: Vec3::Y,
            fov_degrees: 72.0,
        }
    }
}

impl From<&CameraView> for RenderView {
    fn from(camera: &CameraView) -> Self {
        Self {
            eye: camera.eye,
            target: camera.target,
            up: camera.up,
            ..Self::default()
        }
    }
}

/// Receives individual draw requests. A GPU backend implements this.
pub trait DrawTarget {
    fn draw(&mut self, shape: &Shape, transform: &Transform, material: &Material);
}

/// Feed every draw call to a target, in order.
pub fn submit<'a>(draws: impl IntoIterator<Item = &'a DrawCall>, target: &mut impl DrawTarget) {
    for call in draws {
        target.draw(&call.shape, &call.transform, &call.material);
    }
}

/// Counts draws per shape kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawStats {
    pub by_kind: BTreeMap<&'static str, usize>,
}

impl DrawStats {
    pub fn total(&self) -> usize {
        self.by_kind.values().sum()
    }

    pub fn get(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

impl DrawTarget for DrawStats {
    fn draw(&mut self, shape: &Shape, _transform: &Transform, _material: &Material) {
        *self.by_kind.entry(shape_name(shape)).or_default() += 1;
    }
}

fn shape_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Enemy(_) => "enemy",
        Shape::Bullet => "bullet",
        Shape::Grenade => "grenade",
        Shape::Particle => "particle",
        Shape::Wall => "wall",
        Shape::Chest => "chest",
        Shape::Lava => "lava",
        Shape::TeleportMarker => "marker",
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    type Output;

    /// Render one frame of poses from the given view.
    fn render(&self, poses: &RenderablePoses, view: &RenderView) -> Self::Output;
}

/// Human-readable frame dump for the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, poses: &RenderablePoses, view: &RenderView) -> String {
        let mut stats = DrawStats::default();
        submit(&poses.draws, &mut stats);

        let mut out = String::new();
        let status = match poses.status {
            SessionStatus::Playing => "playing".to_string(),
            SessionStatus::Ended(end) => format!("ended ({end:?})"),
        };
        let _ = writeln!(out, "=== Frame tick={} status={} ===", poses.tick, status);
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        );
        if poses.flash_frames > 0 {
            let _ = writeln!(out, "Flash: {} frames", poses.flash_frames);
        }
        if poses.frozen {
            out.push_str("Time frozen\n");
        }
        let _ = writeln!(out, "Draws: {}", stats.total());
        for (kind, n) in &stats.by_kind {
            let _ = writeln!(out, "  {kind}: {n}");
        }
        for call in &poses.draws {
            if let Shape::Enemy(state) = call.shape {
                let p = call.transform.position;
                let _ = writeln!(
                    out,
                    "  enemy {:?} pos=({:.2}, {:.2}, {:.2}) {:?}",
                    state, p.x, p.y, p.z, call.material
                );
            }
        }
        out
    }
}
