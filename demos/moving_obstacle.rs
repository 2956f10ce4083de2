use glam::Vec3;
use grid_lattice::render::render_with_path;
use grid_lattice::{LatticeConfig, LatticeHost, Sphere, SphereObstacles};
use grid_util::point::Point;

// A sphere sweeps across a 10x4 lattice. Each tick re-tags the cells, and a fixed
// highlighted row is drawn over the result with '*'.

fn main() {
    let config = LatticeConfig::default().with_scale(Vec3::new(20.0, 1.0, 8.0));
    let obstacles = SphereObstacles::new(vec![Sphere::new(Vec3::new(-10.0, 0.0, 0.0), 1.5)]);
    let mut host = LatticeHost::new(config, obstacles);
    host.initialize().unwrap();
    host.set_path((0..10).map(|x| Point::new(x, 0)).collect());

    for frame in 0..5 {
        host.obstacles_mut().spheres[0].centre.x += 4.0;
        let changed = host.tick().unwrap();
        let lattice = host.lattice().unwrap();
        println!("Frame {frame}: {changed} cells changed");
        println!(
            "Corners connected: {}",
            lattice.reachable(&Point::new(0, 3), &Point::new(9, 3))
        );
        println!("{}", render_with_path(lattice, host.path()));
    }
}
