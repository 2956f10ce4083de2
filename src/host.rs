use grid_util::point::Point;
use log::info;

use crate::config::LatticeConfig;
use crate::error::{LatticeError, Result};
use crate::lattice::Lattice;
use crate::obstacle::ObstacleTest;

/// Owns a [Lattice] together with the obstacle test that tags it and drives it from an
/// external simulation loop: [initialize](Self::initialize) once, then [tick](Self::tick)
/// every frame so moving obstacles are picked up.
#[derive(Clone, Debug)]
pub struct LatticeHost<O: ObstacleTest> {
    config: LatticeConfig,
    obstacles: O,
    lattice: Option<Lattice>,
    path: Vec<Point>,
}

impl<O: ObstacleTest> LatticeHost<O> {
    pub fn new(config: LatticeConfig, obstacles: O) -> LatticeHost<O> {
        LatticeHost {
            config,
            obstacles,
            lattice: None,
            path: Vec::new(),
        }
    }

    /// Builds the lattice, discarding any previous one.
    pub fn initialize(&mut self) -> Result<&Lattice> {
        let lattice = Lattice::build(&self.config, &self.obstacles)?;
        self.path.clear();
        Ok(self.lattice.insert(lattice))
    }

    /// Re-tags every cell against the current obstacles. Returns the number of cells that flipped.
    pub fn tick(&mut self) -> Result<usize> {
        let lattice = self.lattice.as_mut().ok_or(LatticeError::NotBuilt)?;
        Ok(lattice.refresh_walkability(&self.obstacles))
    }

    /// Replaces the configuration and builds a new lattice from it.
    pub fn rebuild(&mut self, config: LatticeConfig) -> Result<&Lattice> {
        info!("Rebuilding lattice");
        config.validate()?;
        self.config = config;
        self.initialize()
    }

    pub fn is_built(&self) -> bool {
        self.lattice.is_some()
    }

    pub fn lattice(&self) -> Result<&Lattice> {
        self.lattice.as_ref().ok_or(LatticeError::NotBuilt)
    }

    pub fn lattice_mut(&mut self) -> Result<&mut Lattice> {
        self.lattice.as_mut().ok_or(LatticeError::NotBuilt)
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &O {
        &self.obstacles
    }

    /// Obstacles may be moved freely; the lattice sees the change on the next tick.
    pub fn obstacles_mut(&mut self) -> &mut O {
        &mut self.obstacles
    }

    /// Path to highlight when drawing, usually the last search result.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn set_path(&mut self, path: Vec<Point>) {
        self.path = path;
    }
}
