//! Maze Grid: the fixed wall layout and its projected collision boxes.
//!
//! # Invariants
//! - Every wall cell maps to exactly one projected box.
//! - The grid is built once and never mutated afterwards.
//!
//! Lattice cell `(cx, cz)` sits at world `(2cx, 0, -2cz)`; its wall box is
//! the square of half-width 1 around `(2cx, 2cz)` in the projected plane.

mod grid;
pub mod layout;

pub use grid::{CELL_SIZE, CellCoord, Footprint, MazeGrid, footprint_corners};

pub fn crate_info() -> &'static str {
    "labyrinth-maze v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("maze"));
    }
}
