use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LbmError {
    #[error("kinematic viscosity must be finite and positive, got {0}")]
    InvalidViscosity(f64),

    #[error("relaxation rate must lie in [0, 2], got {0}")]
    InvalidOmega(f64),

    #[error("lattice dimensions must be non-zero, got {width}x{height}")]
    EmptyLattice { width: usize, height: usize },

    #[error("lattice of {width}x{height} cells is too large to address")]
    LatticeTooLarge { width: usize, height: usize },
}

pub type LbmResult<T> = Result<T, LbmError>;
