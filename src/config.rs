use glam::Vec3;

use crate::error::{LatticeError, Result};

/// Upper bound on the cell count; lattice coordinates and indices must fit an `i32`.
pub const MAX_CELLS: usize = i32::MAX as usize;

/// World-space region and cell size a [Lattice](crate::lattice::Lattice) is built from.
/// Only the X and Z extents of `scale` are used; Y is carried through untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeConfig {
    /// Centre of the region.
    pub origin: Vec3,
    /// Full extents of the region.
    pub scale: Vec3,
    pub cell_radius: f32,
}

impl Default for LatticeConfig {
    fn default() -> LatticeConfig {
        LatticeConfig {
            origin: Vec3::ZERO,
            scale: Vec3::new(10.0, 1.0, 10.0),
            cell_radius: 1.0,
        }
    }
}

impl LatticeConfig {
    pub fn new(origin: Vec3, scale: Vec3, cell_radius: f32) -> LatticeConfig {
        LatticeConfig {
            origin,
            scale,
            cell_radius,
        }
    }
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
    pub fn with_cell_radius(mut self, cell_radius: f32) -> Self {
        self.cell_radius = cell_radius;
        self
    }

    pub fn cell_diameter(&self) -> f32 {
        self.cell_radius * 2.0
    }

    /// Number of cells along X and Z, rounding half to even like the engine hosts do.
    pub fn dimensions(&self) -> (usize, usize) {
        let d = self.cell_diameter();
        let size_x = (self.scale.x / d).round_ties_even().max(0.0) as usize;
        let size_z = (self.scale.z / d).round_ties_even().max(0.0) as usize;
        (size_x, size_z)
    }

    /// Rejects non-finite values, a non-positive radius and negative extents.
    pub fn validate(&self) -> Result<()> {
        if !self.origin.is_finite() || !self.scale.is_finite() || !self.cell_radius.is_finite() {
            return Err(LatticeError::InvalidConfig(format!(
                "non-finite value in origin {} / scale {} / radius {}",
                self.origin, self.scale, self.cell_radius
            )));
        }
        if self.cell_radius <= 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "cell radius must be positive, got {}",
                self.cell_radius
            )));
        }
        if self.scale.x < 0.0 || self.scale.z < 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "scale extents must not be negative, got {}",
                self.scale
            )));
        }
        let d = self.cell_diameter();
        let (cells_x, cells_z) = (
            (self.scale.x / d).round_ties_even(),
            (self.scale.z / d).round_ties_even(),
        );
        let limit = MAX_CELLS as f32;
        if cells_x > limit || cells_z > limit || cells_x * cells_z > limit {
            return Err(LatticeError::InvalidConfig(format!(
                "{}x{} cells exceeds the limit of {} cells",
                cells_x, cells_z, MAX_CELLS
            )));
        }
        Ok(())
    }
}
