use glam::Vec3;
use grid_lattice::{Lattice, LatticeConfig, Sphere, SphereObstacles};

// In this example a 5x5 lattice is built over a 10x10 region with a single obstacle
// in the middle:
//  _____
// |.....|
// |.....|
// |..#..|
// |.....|
// |.....|
//  _____
// where
// - # marks a blocked cell
// - . marks a walkable cell

fn main() {
    let config = LatticeConfig::default();
    let obstacles = SphereObstacles::new(vec![Sphere::new(Vec3::ZERO, 0.5)]);
    let lattice = Lattice::build(&config, &obstacles).unwrap();
    println!("{}", lattice);

    let cell = lattice.cell_at(Vec3::new(-3.7, 0.0, -4.2)).unwrap();
    println!("Nearest cell: {:?} at {}", cell.point(), cell.position);
    println!("Neighbours:");
    for n in lattice.neighbours(cell) {
        println!("{:?} walkable: {}", n.point(), n.walkable);
    }
}
