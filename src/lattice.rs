use core::fmt;
use glam::Vec3;
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;

use crate::cell::Cell;
use crate::config::LatticeConfig;
use crate::error::{LatticeError, Result};
use crate::obstacle::ObstacleTest;

/// Offsets of the 3x3 neighbourhood without its centre.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// [Lattice] covers a rectangular world-space region with a fixed `size_x` by `size_z` array
/// of [Cell]s laid out on the X and Z axes. Cells are stored row-major by Z. Besides the raw
/// walkability flags it keeps the connected components of walkable cells in a [UnionFind]
/// so reachability can be answered without flood-filling.
#[derive(Clone, Debug)]
pub struct Lattice {
    cells: Vec<Cell>,
    size_x: usize,
    size_z: usize,
    cell_radius: f32,
    origin: Vec3,
    scale: Vec3,
    components: UnionFind<usize>,
}

impl Lattice {
    /// Builds a fresh lattice over the configured region, tagging every cell through
    /// `obstacles`. Dimensions that round to zero give an empty lattice rather than an error.
    pub fn build<O: ObstacleTest + ?Sized>(config: &LatticeConfig, obstacles: &O) -> Result<Lattice> {
        config.validate()?;
        let (size_x, size_z) = config.dimensions();
        let radius = config.cell_radius;
        let diameter = config.cell_diameter();
        let half_scale = config.scale / 2.0;
        let bottom_left = config.origin - Vec3::X * half_scale.x - Vec3::Z * half_scale.z;

        let cells = iproduct!(0..size_z, 0..size_x)
            .map(|(z, x)| {
                let x_offset = x as f32 * diameter + radius;
                let z_offset = z as f32 * diameter + radius;
                let position = bottom_left + Vec3::X * x_offset + Vec3::Z * z_offset;
                let walkable = !obstacles.is_obstacle(position, radius);
                Cell::new(walkable, position, x as i32, z as i32)
            })
            .collect::<Vec<Cell>>();

        if cells.is_empty() {
            warn!(
                "Lattice over scale {} with radius {} has no cells ({}x{})",
                config.scale, radius, size_x, size_z
            );
        } else {
            info!("Built {}x{} lattice around {}", size_x, size_z, config.origin);
        }

        let mut lattice = Lattice {
            cells,
            size_x,
            size_z,
            cell_radius: radius,
            origin: config.origin,
            scale: config.scale,
            components: UnionFind::new(size_x * size_z),
        };
        lattice.generate_components();
        Ok(lattice)
    }

    /// Re-runs the obstacle test for every cell in place. Positions, coordinates and
    /// dimensions are untouched. Returns how many cells changed walkability; components
    /// are regenerated before returning if any did, so reachability is current afterwards.
    pub fn refresh_walkability<O: ObstacleTest + ?Sized>(&mut self, obstacles: &O) -> usize {
        let radius = self.cell_radius;
        let mut changed = 0;
        for cell in self.cells.iter_mut() {
            let walkable = !obstacles.is_obstacle(cell.position, radius);
            if walkable != cell.walkable {
                cell.walkable = walkable;
                changed += 1;
            }
        }
        if changed > 0 {
            debug!("{} cells changed walkability", changed);
            self.generate_components();
        }
        changed
    }

    /// Generates a new [UnionFind] structure and links up walkable neighbours to the same components.
    /// Needed only after writing `walkable` by hand through [get_mut](Self::get_mut).
    pub fn generate_components(&mut self) {
        info!("Generating connected components");
        self.components = UnionFind::new(self.cells.len());
        for z in 0..self.size_z as i32 {
            for x in 0..self.size_x as i32 {
                let point = Point::new(x, z);
                if !self.is_walkable(point) {
                    continue;
                }
                let parent_ix = self.compute_ix(x, z);
                // Only forward links are needed, the backward ones are visited from the other side
                [
                    Point::new(x + 1, z - 1),
                    Point::new(x + 1, z),
                    Point::new(x + 1, z + 1),
                    Point::new(x, z + 1),
                ]
                .into_iter()
                .filter(|p| self.is_walkable(*p))
                .map(|p| self.compute_ix(p.x, p.y))
                .collect::<Vec<usize>>()
                .into_iter()
                .for_each(|ix| {
                    self.components.union(parent_ix, ix);
                });
            }
        }
    }

    /// Maps a world position to the nearest cell. Positions outside the region clamp to the
    /// closest edge cell.
    pub fn cell_at(&self, world: Vec3) -> Result<&Cell> {
        let point = self.point_at(world)?;
        self.get(point).ok_or(LatticeError::Empty)
    }

    /// Lattice coordinates of the cell nearest to `world`.
    pub fn point_at(&self, world: Vec3) -> Result<Point> {
        if self.is_empty() {
            return Err(LatticeError::Empty);
        }
        let half_scale = self.scale / 2.0;
        let percent_x = ((world.x - self.origin.x + half_scale.x) / self.scale.x).clamp(0.0, 1.0);
        let percent_z = ((world.z - self.origin.z + half_scale.z) / self.scale.z).clamp(0.0, 1.0);
        let x = ((self.size_x - 1) as f32 * percent_x).round_ties_even() as i32;
        let z = ((self.size_z - 1) as f32 * percent_z).round_ties_even() as i32;
        Ok(Point::new(x, z))
    }

    /// World-space centre of the cell at `point`, also for points outside the lattice.
    pub fn position_of(&self, point: Point) -> Vec3 {
        let diameter = self.cell_diameter();
        let bottom_left = self.origin - Vec3::X * (self.scale.x / 2.0) - Vec3::Z * (self.scale.z / 2.0);
        bottom_left
            + Vec3::X * (point.x as f32 * diameter + self.cell_radius)
            + Vec3::Z * (point.y as f32 * diameter + self.cell_radius)
    }

    /// In-bounds coordinates around `point` at Chebyshev distance 1.
    pub fn neighbour_points(&self, point: Point) -> Vec<Point> {
        MOORE_OFFSETS
            .iter()
            .map(|(dx, dz)| Point::new(point.x + dx, point.y + dz))
            .filter(|p| self.in_bounds(*p))
            .collect::<Vec<Point>>()
    }

    /// All cells adjacent to `cell`, diagonals included. Corner cells have 3, edge cells 5
    /// and interior cells 8.
    pub fn neighbours(&self, cell: &Cell) -> Vec<&Cell> {
        self.neighbour_points(cell.point())
            .into_iter()
            .filter_map(|p| self.get(p))
            .collect::<Vec<&Cell>>()
    }

    pub fn walkable_neighbours(&self, cell: &Cell) -> Vec<&Cell> {
        self.neighbours(cell)
            .into_iter()
            .filter(|n| n.walkable)
            .collect::<Vec<&Cell>>()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.get_ix(*point).map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are on the same component. Blocked cells are never reachable.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if !self.is_walkable(*start) || !self.is_walkable(*goal) {
            return true;
        }
        match (self.get_ix(*start), self.get_ix(*goal)) {
            (Some(start_ix), Some(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }

    /// Follows `parent` links from `end` and returns the chain from its first cell to `end`.
    /// Links are written by an external search, so a cycle is cut after visiting every cell once.
    pub fn retrace(&self, end: Point) -> Vec<Point> {
        let mut path = Vec::new();
        let mut current = Some(end);
        while let Some(point) = current {
            let Some(cell) = self.get(point) else {
                break;
            };
            if path.len() >= self.cells.len() {
                warn!("Parent links from {:?} form a cycle, path cut short", end);
                break;
            }
            path.push(point);
            current = cell.parent;
        }
        path.reverse();
        path
    }

    pub fn get(&self, point: Point) -> Option<&Cell> {
        self.get_ix(point).map(|ix| &self.cells[ix])
    }

    /// Mutable access for a search writing its bookkeeping into the cells.
    pub fn get_mut(&mut self, point: Point) -> Option<&mut Cell> {
        self.get_ix(point).map(move |ix| &mut self.cells[ix])
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.get(point).is_some_and(|c| c.walkable)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.size_x
            && (point.y as usize) < self.size_z
    }

    fn get_ix(&self, point: Point) -> Option<usize> {
        self.in_bounds(point).then(|| self.compute_ix(point.x, point.y))
    }

    fn compute_ix(&self, x: i32, z: i32) -> usize {
        z as usize * self.size_x + x as usize
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }
    pub fn size_x(&self) -> usize {
        self.size_x
    }
    pub fn size_z(&self) -> usize {
        self.size_z
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn cell_radius(&self) -> f32 {
        self.cell_radius
    }
    pub fn cell_diameter(&self) -> f32 {
        self.cell_radius * 2.0
    }
    pub fn origin(&self) -> Vec3 {
        self.origin
    }
    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for z in (0..self.size_z as i32).rev() {
            let row = (0..self.size_x as i32)
                .map(|x| if self.is_walkable(Point::new(x, z)) { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::{NoObstacles, Sphere, SphereObstacles};
    use std::cell::RefCell;

    fn five_by_five() -> Lattice {
        Lattice::build(&LatticeConfig::default(), &NoObstacles).unwrap()
    }

    #[test]
    fn builds_expected_positions() {
        let lattice = five_by_five();
        assert_eq!((lattice.size_x(), lattice.size_z()), (5, 5));
        assert_eq!(lattice.len(), 25);
        let first = lattice.get(Point::new(0, 0)).unwrap();
        assert_eq!(first.position, Vec3::new(-4.0, 0.0, -4.0));
        let last = lattice.get(Point::new(4, 4)).unwrap();
        assert_eq!(last.position, Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(lattice.position_of(Point::new(2, 3)), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn stored_coordinates_match_index() {
        let lattice = five_by_five();
        for z in 0..5 {
            for x in 0..5 {
                let cell = lattice.get(Point::new(x, z)).unwrap();
                assert_eq!((cell.grid_x, cell.grid_z), (x, z));
            }
        }
    }

    #[test]
    fn corner_has_three_neighbours() {
        let lattice = five_by_five();
        let corner = lattice.get(Point::new(0, 0)).unwrap();
        let mut points = lattice
            .neighbours(corner)
            .iter()
            .map(|c| (c.grid_x, c.grid_z))
            .collect::<Vec<_>>();
        points.sort();
        assert_eq!(points, vec![(0, 1), (1, 0), (1, 1)]);
        let edge = lattice.get(Point::new(2, 0)).unwrap();
        assert_eq!(lattice.neighbours(edge).len(), 5);
        let interior = lattice.get(Point::new(2, 2)).unwrap();
        assert_eq!(lattice.neighbours(interior).len(), 8);
    }

    #[test]
    fn cell_at_clamps_to_edges() {
        let lattice = five_by_five();
        let low = lattice.cell_at(Vec3::new(-100.0, 0.0, -100.0)).unwrap();
        assert_eq!(low.point(), Point::new(0, 0));
        let high = lattice.cell_at(Vec3::new(100.0, 0.0, 100.0)).unwrap();
        assert_eq!(high.point(), Point::new(4, 4));
    }

    #[test]
    fn cell_at_respects_origin() {
        let config = LatticeConfig::default().with_origin(Vec3::new(50.0, 3.0, -20.0));
        let lattice = Lattice::build(&config, &NoObstacles).unwrap();
        for cell in lattice.iter() {
            assert_eq!(lattice.cell_at(cell.position).unwrap().point(), cell.point());
        }
        assert_eq!(lattice.get(Point::new(0, 0)).unwrap().position.y, 3.0);
    }

    #[test]
    fn empty_lattice_reports_error() {
        let config = LatticeConfig::default().with_scale(Vec3::new(1.0, 1.0, 10.0));
        let lattice = Lattice::build(&config, &NoObstacles).unwrap();
        assert!(lattice.is_empty());
        assert_eq!(lattice.cell_at(Vec3::ZERO), Err(LatticeError::Empty));
        assert_eq!((lattice.size_x(), lattice.size_z()), (0, 5));
        assert!(format!("{}", lattice).trim().is_empty());
        assert!(lattice.neighbour_points(Point::new(0, 0)).is_empty());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = LatticeConfig::default().with_cell_radius(-1.0);
        assert!(matches!(
            Lattice::build(&config, &NoObstacles),
            Err(LatticeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn obstacles_block_cells() {
        let obstacles = SphereObstacles::new(vec![Sphere::new(Vec3::ZERO, 0.5)]);
        let lattice = Lattice::build(&LatticeConfig::default(), &obstacles).unwrap();
        assert!(!lattice.is_walkable(Point::new(2, 2)));
        assert_eq!(lattice.iter().filter(|c| !c.walkable).count(), 1);
        let beside = lattice.get(Point::new(1, 1)).unwrap();
        assert_eq!(lattice.neighbours(beside).len(), 8);
        assert_eq!(lattice.walkable_neighbours(beside).len(), 7);
    }

    #[test]
    fn refresh_only_touches_walkability() {
        let mut lattice = five_by_five();
        let before = lattice.clone();
        let obstacles = SphereObstacles::new(vec![Sphere::new(Vec3::new(-4.0, 0.0, -4.0), 0.5)]);
        assert_eq!(lattice.refresh_walkability(&obstacles), 1);
        assert_eq!(lattice.size_x(), before.size_x());
        for (a, b) in lattice.iter().zip(before.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.point(), b.point());
        }
        assert!(!lattice.is_walkable(Point::new(0, 0)));
        // Nothing moved, nothing changes
        assert_eq!(lattice.refresh_walkability(&obstacles), 0);
    }

    /// A wall along x = 2 splits the 5x5 lattice into two components.
    #[test]
    fn wall_splits_components() {
        //  ___
        // |..#..|
        // |..#..|
        //  ___
        let wall = |p: Vec3, _r: f32| p.x.abs() < 0.5;
        let mut lattice = five_by_five();
        lattice.refresh_walkability(&wall);
        assert!(lattice.reachable(&Point::new(0, 0), &Point::new(1, 4)));
        assert!(lattice.unreachable(&Point::new(0, 0), &Point::new(4, 4)));
        assert!(lattice.unreachable(&Point::new(0, 0), &Point::new(2, 2)));
        assert_ne!(
            lattice.get_component(&Point::new(0, 0)),
            lattice.get_component(&Point::new(4, 0))
        );
        assert_eq!(format!("{}", lattice).lines().next(), Some("..#.."));
    }

    /// Reachability must follow walkability straight after a refresh, whether a wall
    /// appears or disappears.
    #[test]
    fn components_current_after_refresh() {
        let wall = |p: Vec3, _r: f32| p.x.abs() < 0.5;
        let start = Point::new(0, 0);
        let goal = Point::new(4, 4);

        let mut lattice = five_by_five();
        assert!(lattice.reachable(&start, &goal));
        lattice.refresh_walkability(&wall);
        assert!(lattice.unreachable(&start, &goal));

        let mut lattice = Lattice::build(&LatticeConfig::default(), &wall).unwrap();
        assert!(lattice.unreachable(&start, &goal));
        lattice.refresh_walkability(&NoObstacles);
        assert!(lattice.reachable(&start, &goal));
    }

    /// The obstacle test runs exactly once per cell with the cell radius, on build and on refresh.
    #[test]
    fn obstacle_test_called_once_per_cell() {
        let config = LatticeConfig::default()
            .with_scale(Vec3::new(10.0, 1.0, 6.0))
            .with_cell_radius(0.5);
        let radii = RefCell::new(Vec::new());
        let recording = |_p: Vec3, r: f32| {
            radii.borrow_mut().push(r);
            false
        };
        let mut lattice = Lattice::build(&config, &recording).unwrap();
        assert_eq!(lattice.len(), 60);
        assert_eq!(radii.borrow().len(), lattice.len());
        assert!(radii.borrow().iter().all(|r| *r == lattice.cell_radius()));

        radii.borrow_mut().clear();
        lattice.refresh_walkability(&recording);
        assert_eq!(radii.borrow().len(), lattice.len());
        assert!(radii.borrow().iter().all(|r| *r == 0.5));
    }

    /// Queries landing exactly between two cells round half to even.
    #[test]
    fn cell_at_ties_round_to_even() {
        // 2 cells per axis: the centre maps to 0.5 and rounds down to 0
        let config = LatticeConfig::default().with_scale(Vec3::new(4.0, 1.0, 4.0));
        let lattice = Lattice::build(&config, &NoObstacles).unwrap();
        assert_eq!(lattice.point_at(Vec3::ZERO), Ok(Point::new(0, 0)));
        // 4 cells per axis: the centre maps to 1.5 and rounds up to 2
        let config = LatticeConfig::default().with_scale(Vec3::new(8.0, 1.0, 8.0));
        let lattice = Lattice::build(&config, &NoObstacles).unwrap();
        assert_eq!(lattice.point_at(Vec3::ZERO), Ok(Point::new(2, 2)));
    }

    #[test]
    fn diagonal_gap_connects() {
        // Blocks (1, 0) and (0, 1); (0, 0) still touches (1, 1) diagonally
        let blocked = |p: Vec3, _r: f32| {
            let corner = Vec3::new(-4.0, 0.0, -4.0);
            p.distance(corner) > 1.5 && p.distance(corner) < 2.5
        };
        let lattice = Lattice::build(&LatticeConfig::default(), &blocked).unwrap();
        assert!(!lattice.is_walkable(Point::new(1, 0)));
        assert!(!lattice.is_walkable(Point::new(0, 1)));
        assert!(lattice.reachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    #[test]
    fn retrace_follows_parents() {
        let mut lattice = five_by_five();
        let chain = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 1)];
        for pair in chain.windows(2) {
            lattice.get_mut(pair[1]).unwrap().parent = Some(pair[0]);
        }
        assert_eq!(lattice.retrace(Point::new(2, 1)), chain.to_vec());
    }

    #[test]
    fn retrace_cuts_cycles() {
        let mut lattice = five_by_five();
        lattice.get_mut(Point::new(0, 0)).unwrap().parent = Some(Point::new(1, 0));
        lattice.get_mut(Point::new(1, 0)).unwrap().parent = Some(Point::new(0, 0));
        assert_eq!(lattice.retrace(Point::new(0, 0)).len(), lattice.len());
    }

    #[test]
    fn lattice_never_writes_search_state() {
        let mut lattice = five_by_five();
        let cell = lattice.get_mut(Point::new(3, 3)).unwrap();
        cell.g_cost = 7;
        cell.h_cost = 2;
        cell.parent = Some(Point::new(2, 2));
        lattice.refresh_walkability(&|_p: Vec3, _r: f32| true);
        let cell = lattice.get(Point::new(3, 3)).unwrap();
        assert_eq!(cell.f_cost(), 9);
        assert_eq!(cell.parent, Some(Point::new(2, 2)));
    }
}
