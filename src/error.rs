use thiserror::Error;

/// Errors reported by lattice construction and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// The configuration would produce degenerate geometry.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A position query was made against a lattice without cells.
    #[error("empty grid: the lattice has no cells in at least one dimension")]
    Empty,
    /// The host was queried before [initialize](crate::host::LatticeHost::initialize).
    #[error("lattice has not been built yet")]
    NotBuilt,
}

pub type Result<T> = std::result::Result<T, LatticeError>;
