use glam::Vec3;
use serde::Serialize;

/// Attempted to normalize a vector with no usable direction.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("cannot normalize degenerate vector ({x}, {y}, {z})")]
pub struct DegenerateVectorError {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for DegenerateVectorError {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// A 3D direction of length one.
///
/// Only constructible through [`UnitVector::new`], so a heading can never
/// carry NaN into later frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitVector(Vec3);

impl UnitVector {
    pub const X: Self = Self(Vec3::X);
    pub const NEG_Z: Self = Self(Vec3::NEG_Z);

    pub fn new(v: Vec3) -> Result<Self, DegenerateVectorError> {
        v.try_normalize()
            .map(Self)
            .ok_or_else(|| DegenerateVectorError::from(v))
    }

    /// Normalize the horizontal (x, z) part of `v`, dropping the vertical.
    pub fn horizontal(v: Vec3) -> Result<Self, DegenerateVectorError> {
        Self::new(Vec3::new(v.x, 0.0, v.z))
    }

    pub fn get(self) -> Vec3 {
        self.0
    }

    /// Heading angle about the vertical axis, as used for model yaw.
    pub fn yaw(self) -> f32 {
        self.0.x.atan2(self.0.z)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.0.dot(other.0)
    }
}

impl std::ops::Mul<f32> for UnitVector {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        self.0 * rhs
    }
}

/// Rotate `v` about the vertical axis by `radians`, keeping its y component.
pub fn rotate_about_y(v: Vec3, radians: f32) -> Vec3 {
    let (sin, cos) = radians.sin_cos();
    Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_nonzero_vector() {
        let u = UnitVector::new(Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((u.get().length() - 1.0).abs() < 1e-6);
        assert!((u.get().x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_is_an_error() {
        let err = UnitVector::new(Vec3::ZERO).unwrap_err();
        assert_eq!(err, DegenerateVectorError::from(Vec3::ZERO));
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn nan_vector_is_an_error() {
        assert!(UnitVector::new(Vec3::new(f32::NAN, 0.0, 1.0)).is_err());
    }

    #[test]
    fn horizontal_drops_vertical_component() {
        let u = UnitVector::horizontal(Vec3::new(0.0, 5.0, -2.0)).unwrap();
        assert_eq!(u.get(), Vec3::NEG_Z);
        assert!(UnitVector::horizontal(Vec3::new(0.0, 5.0, 0.0)).is_err());
    }

    #[test]
    fn rotation_about_y_keeps_length_and_height() {
        let v = Vec3::new(1.0, 0.5, 0.0);
        let r = rotate_about_y(v, std::f32::consts::FRAC_PI_2);
        assert!((r.x).abs() < 1e-6);
        assert!((r.z - 1.0).abs() < 1e-6);
        assert_eq!(r.y, 0.5);
    }

    #[test]
    fn scaling_a_unit_vector() {
        let v = UnitVector::X * 3.0;
        assert_eq!(v, Vec3::new(3.0, 0.0, 0.0));
    }
}
