use std::collections::BTreeSet;

use glam::{Vec2, Vec3};
use labyrinth_common::{Aabb2, OnceFlag, project_to_plane, square_corners};
use serde::{Deserialize, Serialize};

use crate::layout;

/// World-space edge length of one lattice cell.
pub const CELL_SIZE: f32 = 2.0;

/// A 2D lattice coordinate in the maze (the vertical lattice axis is always 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Collision footprint sizes. Callers pick the one matching their entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footprint {
    Player,
    Enemy,
    /// Bullets and grenades.
    Projectile,
    /// Wall bricks and the goal chest.
    Cell,
}

impl Footprint {
    pub fn half_width(self) -> f32 {
        match self {
            Footprint::Player => 0.15,
            Footprint::Enemy => 0.3,
            Footprint::Projectile => 0.1,
            Footprint::Cell => 1.0,
        }
    }
}

/// Projected corners of an entity footprint at a world position.
pub fn footprint_corners(kind: Footprint, position: Vec3) -> [Vec2; 4] {
    square_corners(project_to_plane(position), kind.half_width())
}

/// The static maze: wall cells, their projected boxes, and the goal.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    cells: BTreeSet<CellCoord>,
    projections: Vec<Aabb2>,
    goal: Vec3,
    goal_box: Aabb2,
}

impl MazeGrid {
    /// Build a grid from wall cells (duplicates are collapsed) and a goal
    /// world position.
    pub fn new(cells: impl IntoIterator<Item = CellCoord>, goal: Vec3) -> Self {
        let cells: BTreeSet<CellCoord> = cells.into_iter().collect();
        let half = Footprint::Cell.half_width();
        let projections = cells
            .iter()
            .map(|c| Aabb2::around(project_to_plane(Self::cell_center(*c)), half))
            .collect();
        let goal_box = Aabb2::around(project_to_plane(goal), half);
        tracing::debug!(walls = cells.len(), ?goal, "maze grid built");
        Self {
            cells,
            projections,
            goal,
            goal_box,
        }
    }

    /// The shipped layout.
    pub fn standard() -> Self {
        Self::new(
            layout::WALL_CELLS
                .iter()
                .map(|&(x, z)| CellCoord::new(x, z)),
            layout::GOAL,
        )
    }

    /// World position of a cell's centre at floor height.
    pub fn cell_center(cell: CellCoord) -> Vec3 {
        Vec3::new(
            CELL_SIZE * cell.x as f32,
            0.0,
            -CELL_SIZE * cell.z as f32,
        )
    }

    /// The lattice cell whose centre is nearest to a world position.
    pub fn cell_at(position: Vec3) -> CellCoord {
        CellCoord {
            x: (position.x / CELL_SIZE).round() as i32,
            z: (-position.z / CELL_SIZE).round() as i32,
        }
    }

    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    pub fn wall_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.len()
    }

    /// Projected wall boxes, one per wall cell in cell order.
    pub fn wall_projections(&self) -> &[Aabb2] {
        &self.projections
    }

    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    pub fn goal_projection(&self) -> Aabb2 {
        self.goal_box
    }

    /// False iff the candidate box touches any wall box.
    pub fn is_position_clear(&self, corners: &[Vec2]) -> bool {
        let Some(candidate) = Aabb2::from_points(corners) else {
            return true;
        };
        !self.projections.iter().any(|wall| wall.intersects(&candidate))
    }

    /// Whether the candidate box touches the goal box. Pure query.
    pub fn overlaps_goal(&self, corners: &[Vec2]) -> bool {
        Aabb2::from_points(corners).is_some_and(|c| c.intersects(&self.goal_box))
    }

    /// Goal check with the one-time win transition.
    ///
    /// Returns true only for the call that first overlaps the goal while
    /// `won` is unset; that call raises `won`.
    pub fn is_at_goal(&self, corners: &[Vec2], won: &mut OnceFlag) -> bool {
        if won.is_set() || !self.overlaps_goal(corners) {
            return false;
        }
        won.raise()
    }

    /// Inclusive lattice bounds of the wall layout.
    pub fn bounds(&self) -> Option<(CellCoord, CellCoord)> {
        let min_x = self.cells.iter().map(|c| c.x).min()?;
        let max_x = self.cells.iter().map(|c| c.x).max()?;
        let min_z = self.cells.iter().map(|c| c.z).min()?;
        let max_z = self.cells.iter().map(|c| c.z).max()?;
        Some((CellCoord::new(min_x, min_z), CellCoord::new(max_x, max_z)))
    }

    /// Top-down text map: `#` walls, `G` goal, `.` floor. `marks` overlay
    /// single characters at world positions.
    pub fn render_ascii(&self, marks: &[(Vec3, char)]) -> String {
        let Some((min, max)) = self.bounds() else {
            return String::new();
        };
        let goal_cell = Self::cell_at(self.goal);
        let mut out = String::new();
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let cell = CellCoord::new(x, z);
                let mark = marks
                    .iter()
                    .rev()
                    .find(|(p, _)| Self::cell_at(*p) == cell)
                    .map(|(_, c)| *c);
                let ch = match mark {
                    Some(c) => c,
                    None if self.is_wall(cell) => '#',
                    None if cell == goal_cell => 'G',
                    None => '.',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for MazeGrid {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_box(p: Vec3) -> [Vec2; 4] {
        footprint_corners(Footprint::Player, p)
    }

    #[test]
    fn standard_layout_deduplicates_cells() {
        let grid = MazeGrid::standard();
        assert_eq!(grid.wall_count(), 153);
        assert_eq!(grid.wall_projections().len(), grid.wall_count());
    }

    #[test]
    fn every_wall_cell_blocks_a_player_at_its_centre() {
        let grid = MazeGrid::standard();
        for cell in grid.wall_cells() {
            let centre = MazeGrid::cell_center(cell);
            assert!(
                !grid.is_position_clear(&player_box(centre)),
                "cell {cell:?} should block"
            );
        }
    }

    #[test]
    fn player_start_is_clear() {
        let grid = MazeGrid::standard();
        assert!(grid.is_position_clear(&player_box(Vec3::new(2.0, 0.8, -2.0))));
    }

    #[test]
    fn projection_matches_cell_scaling() {
        let grid = MazeGrid::new([CellCoord::new(3, 4)], Vec3::new(100.0, 0.0, 100.0));
        let b = grid.wall_projections()[0];
        assert_eq!(b.center(), Vec2::new(6.0, 8.0));
        assert_eq!(b.max - b.min, Vec2::splat(2.0));
    }

    #[test]
    fn position_to_cell_basic() {
        assert_eq!(MazeGrid::cell_at(Vec3::new(2.0, 0.8, -2.0)), CellCoord::new(1, 1));
        assert_eq!(MazeGrid::cell_at(Vec3::new(34.0, 0.0, -10.0)), CellCoord::new(17, 5));
        let c = CellCoord::new(7, 9);
        assert_eq!(MazeGrid::cell_at(MazeGrid::cell_center(c)), c);
    }

    #[test]
    fn goal_sets_win_exactly_once() {
        let grid = MazeGrid::standard();
        let mut won = OnceFlag::new();
        let at_goal = player_box(grid.goal());
        assert!(grid.is_at_goal(&at_goal, &mut won));
        assert!(won.is_set());
        assert!(!grid.is_at_goal(&at_goal, &mut won));
        assert!(won.is_set());
    }

    #[test]
    fn away_from_goal_does_not_win() {
        let grid = MazeGrid::standard();
        let mut won = OnceFlag::new();
        assert!(!grid.is_at_goal(&player_box(Vec3::new(2.0, 0.8, -2.0)), &mut won));
        assert!(!won.is_set());
    }

    #[test]
    fn empty_grid_is_always_clear() {
        let grid = MazeGrid::new([], Vec3::ZERO);
        assert!(grid.is_position_clear(&player_box(Vec3::new(5.0, 0.0, 5.0))));
        assert!(grid.bounds().is_none());
        assert!(grid.render_ascii(&[]).is_empty());
    }

    #[test]
    fn ascii_map_marks_walls_goal_and_overlays() {
        let grid = MazeGrid::standard();
        let map = grid.render_ascii(&[(Vec3::new(2.0, 0.8, -2.0), '@')]);
        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len(), 15);
        assert_eq!(rows[0], "#####################");
        assert_eq!(rows[1].chars().nth(1), Some('@'));
        assert_eq!(rows[5].chars().nth(17), Some('G'));
    }
}
