use glam::Vec3;

/// Collision query used to tag cells. Reports whether a sphere of `radius` around `centre`
/// touches anything blocking. Called once per cell on every build and refresh, so it should
/// be free of side effects as far as the lattice is concerned.
pub trait ObstacleTest {
    fn is_obstacle(&self, centre: Vec3, radius: f32) -> bool;
}

impl<F> ObstacleTest for F
where
    F: Fn(Vec3, f32) -> bool,
{
    fn is_obstacle(&self, centre: Vec3, radius: f32) -> bool {
        self(centre, radius)
    }
}

/// Open ground.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl ObstacleTest for NoObstacles {
    fn is_obstacle(&self, _centre: Vec3, _radius: f32) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub centre: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(centre: Vec3, radius: f32) -> Sphere {
        Sphere { centre, radius }
    }
}

/// A plain list of spherical obstacles, standing in for a physics scene.
#[derive(Clone, Debug, Default)]
pub struct SphereObstacles {
    pub spheres: Vec<Sphere>,
}

impl SphereObstacles {
    pub fn new(spheres: Vec<Sphere>) -> SphereObstacles {
        SphereObstacles { spheres }
    }
    pub fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }
}

impl ObstacleTest for SphereObstacles {
    fn is_obstacle(&self, centre: Vec3, radius: f32) -> bool {
        self.spheres.iter().any(|s| {
            let reach = s.radius + radius;
            s.centre.distance_squared(centre) <= reach * reach
        })
    }
}
