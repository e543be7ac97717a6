use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in the projected collision plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    /// Bounding box of a point set. A single point yields a zero-width box.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Square box with the given half-width around `center`.
    pub fn around(center: Vec2, half: f32) -> Self {
        let h = Vec2::splat(half.abs());
        Self {
            min: center - h,
            max: center + h,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Closed-interval overlap on both axes; touching edges count.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        overlap_1d(self.min.x, self.max.x, other.min.x, other.max.x)
            && overlap_1d(self.min.y, self.max.y, other.min.y, other.max.y)
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
            self.min,
        ]
    }
}

fn overlap_1d(min1: f32, max1: f32, min2: f32, max2: f32) -> bool {
    max1 >= min2 && max2 >= min1
}

/// Drop the vertical coordinate: world (x, y, z) maps to plane (x, -z).
pub fn project_to_plane(p: Vec3) -> Vec2 {
    Vec2::new(p.x, -p.z)
}

/// The four corners of a square footprint centred at `center`.
pub fn square_corners(center: Vec2, half: f32) -> [Vec2; 4] {
    [
        center + Vec2::new(half, -half),
        center + Vec2::new(half, half),
        center + Vec2::new(-half, half),
        center + Vec2::new(-half, -half),
    ]
}

/// Whether the bounding boxes of two corner sets overlap.
///
/// Empty sets never collide.
pub fn collide_2d(a: &[Vec2], b: &[Vec2]) -> bool {
    match (Aabb2::from_points(a), Aabb2::from_points(b)) {
        (Some(a), Some(b)) => a.intersects(&b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f32, cy: f32, half: f32) -> [Vec2; 4] {
        square_corners(Vec2::new(cx, cy), half)
    }

    #[test]
    fn disjoint_boxes_do_not_collide() {
        assert!(!collide_2d(&square(0.0, 0.0, 1.0), &square(3.0, 0.0, 1.0)));
        assert!(!collide_2d(&square(0.0, 0.0, 1.0), &square(0.0, -2.5, 1.0)));
        // Overlapping on one axis only is not a collision.
        assert!(!collide_2d(&square(0.0, 0.0, 1.0), &square(0.5, 5.0, 1.0)));
    }

    #[test]
    fn overlapping_boxes_collide() {
        assert!(collide_2d(&square(0.0, 0.0, 1.0), &square(1.5, 1.5, 1.0)));
        assert!(collide_2d(&square(0.0, 0.0, 2.0), &square(0.0, 0.0, 0.5)));
    }

    #[test]
    fn edge_touching_boxes_collide() {
        assert!(collide_2d(&square(0.0, 0.0, 1.0), &square(2.0, 0.0, 1.0)));
        assert!(collide_2d(&square(0.0, 0.0, 1.0), &square(2.0, 2.0, 1.0)));
    }

    #[test]
    fn single_point_is_zero_width_box() {
        let point = [Vec2::new(1.0, 0.0)];
        assert!(collide_2d(&point, &square(0.0, 0.0, 1.0)));
        assert!(!collide_2d(&point, &square(3.0, 0.0, 1.0)));
        let b = Aabb2::from_points(&point).unwrap();
        assert_eq!(b.min, b.max);
    }

    #[test]
    fn empty_set_never_collides() {
        assert!(!collide_2d(&[], &square(0.0, 0.0, 1.0)));
        assert!(Aabb2::from_points(&[]).is_none());
    }

    #[test]
    fn corners_roundtrip_through_bounds() {
        let b = Aabb2::around(Vec2::new(4.0, -2.0), 0.5);
        let rebuilt = Aabb2::from_points(&b.corners()).unwrap();
        assert_eq!(b, rebuilt);
        assert_eq!(b.center(), Vec2::new(4.0, -2.0));
    }

    #[test]
    fn projection_flips_z() {
        assert_eq!(
            project_to_plane(Vec3::new(2.0, 0.8, -2.0)),
            Vec2::new(2.0, 2.0)
        );
    }
}
