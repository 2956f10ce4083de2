//! # grid_lattice
//!
//! Turns a rectangular world-space region into a fixed 2D lattice of cells on the X/Z plane,
//! each tagged walkable or blocked by an external [obstacle test](obstacle::ObstacleTest).
//! The lattice maps world positions back to cells, enumerates the
//! [Moore neighbourhood](https://en.wikipedia.org/wiki/Moore_neighborhood) of a cell and keeps
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) of walkable
//! cells up to date. Cells carry the bookkeeping a search needs (`parent`, `g_cost`,
//! `h_cost`), but no search is done here: this is the layer a pathfinder consumes.
//!
//! Walkability is re-evaluated with a full sweep on every [tick](host::LatticeHost::tick), so
//! moving obstacles are always reflected by the time a search runs.
pub mod cell;
pub mod config;
pub mod error;
pub mod host;
pub mod lattice;
pub mod obstacle;
pub mod render;

pub use cell::Cell;
pub use config::LatticeConfig;
pub use error::{LatticeError, Result};
pub use host::LatticeHost;
pub use lattice::Lattice;
pub use obstacle::{NoObstacles, ObstacleTest, Sphere, SphereObstacles};
