use glam::Vec3;
use grid_util::point::Point;

/// A single lattice entry. Position and coordinates are fixed when the owning
/// [Lattice](crate::lattice::Lattice) is built; only `walkable` is touched by the lattice afterwards.
///
/// The search bookkeeping (`parent`, `g_cost`, `h_cost`) belongs to whatever search runs
/// against the lattice. The lattice never writes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub walkable: bool,
    pub position: Vec3,
    pub grid_x: i32,
    pub grid_z: i32,
    /// Coordinates of the cell this one was reached from. A link, not ownership.
    pub parent: Option<Point>,
    /// Distance from the search start.
    pub g_cost: i32,
    /// Heuristic distance to the goal.
    pub h_cost: i32,
}

impl Cell {
    pub fn new(walkable: bool, position: Vec3, grid_x: i32, grid_z: i32) -> Cell {
        Cell {
            walkable,
            position,
            grid_x,
            grid_z,
            parent: None,
            g_cost: 0,
            h_cost: 0,
        }
    }

    /// Always `g_cost + h_cost` at the time of the call.
    pub fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }

    /// Lattice coordinates as a [Point] with `y` holding the Z index.
    pub fn point(&self) -> Point {
        Point::new(self.grid_x, self.grid_z)
    }

    /// Clears parent link and costs so the cell can take part in a fresh search.
    pub fn reset_search(&mut self) {
        self.parent = None;
        self.g_cost = 0;
        self.h_cost = 0;
    }
}
