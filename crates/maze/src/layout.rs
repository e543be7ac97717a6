//! The shipped maze layout.
//!
//! Coordinates are lattice `(x, z)` pairs. The list is kept as authored,
//! including the border cells that repeat interior ones; `MazeGrid::new`
//! deduplicates.

use glam::Vec3;

/// World position of the goal chest.
pub const GOAL: Vec3 = Vec3::new(34.0, 0.0, -10.0);

#[rustfmt::skip]
pub const WALL_CELLS: &[(i32, i32)] = &[
    (0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0),
    (6, 0), (7, 0), (8, 0), (9, 0), (10, 0), (11, 0),
    (12, 0), (13, 0), (14, 0), (15, 0), (16, 0), (17, 0),
    (18, 0), (19, 0), (20, 0), (10, 1), (14, 1), (2, 2),
    (10, 2), (12, 2), (13, 2), (14, 2), (16, 2), (17, 2),
    (18, 2), (2, 3), (4, 3), (8, 3), (16, 3), (2, 4),
    (4, 4), (6, 4), (7, 4), (8, 4), (9, 4), (10, 4),
    (11, 4), (12, 4), (13, 4), (14, 4), (16, 4), (18, 4),
    (19, 4), (4, 5), (8, 5), (16, 5), (18, 5), (1, 6),
    (10, 6), (12, 6), (14, 6), (15, 6), (16, 6), (17, 6),
    (3, 8), (4, 8), (5, 8), (6, 8), (7, 8), (8, 8),
    (9, 8), (10, 8), (12, 8), (14, 8), (15, 8), (16, 8),
    (17, 8), (18, 8), (2, 9), (8, 9), (12, 9), (2, 10),
    (12, 10), (13, 10), (14, 10), (15, 10), (16, 10), (17, 10),
    (18, 10), (19, 10), (4, 11), (14, 11), (16, 11), (2, 12),
    (3, 12), (4, 12), (6, 12), (7, 12), (8, 12), (10, 12),
    (11, 12), (12, 12), (14, 12), (16, 12), (17, 12), (18, 12),
    (2, 13), (4, 13), (8, 13), (12, 13), (1, 14), (2, 14),
    (4, 14), (5, 14), (6, 14), (7, 14), (8, 14), (9, 14),
    // border
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    (0, 7), (0, 8), (0, 9), (0, 10), (0, 11), (0, 12), (0, 13), (0, 14),
    (1, 14), (2, 14), (3, 14), (4, 14), (5, 14), (6, 14), (7, 14),
    (8, 14), (9, 14), (10, 14), (11, 14), (12, 14), (13, 14), (14, 14), (15, 14),
    (16, 14), (17, 14), (18, 14), (19, 14), (20, 14),
    (20, 12), (20, 11), (20, 10), (20, 9), (20, 8), (20, 5), (20, 6), (20, 7),
    (20, 8), (20, 9), (20, 4), (20, 3), (20, 2), (20, 1), (20, 13),
];
