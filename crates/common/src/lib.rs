//! Shared types for the labyrinth core: entity ids, transforms, unit vectors
//! and the 2D box collision used by every collision query.
//!
//! # Invariants
//! - Collision is evaluated in the projected (x, -z) plane only.
//! - A `UnitVector` is never built from a zero-length or non-finite vector.

mod geometry;
mod types;
mod vector;

pub use geometry::{Aabb2, collide_2d, project_to_plane, square_corners};
pub use types::{EntityId, OnceFlag, Transform};
pub use vector::{DegenerateVectorError, UnitVector, rotate_about_y};
