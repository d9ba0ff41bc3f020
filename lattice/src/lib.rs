//! D2Q9 lattice Boltzmann engine with BGK collision.
//!
//! A [`Lattice`] owns the cells, a scratch arena for streaming and the cached
//! macroscopic fields. Set it up with [`Lattice::fill`], [`Lattice::set_cell`]
//! and [`Lattice::initialize`], then call [`Lattice::advance`] once per step.
//!
//! ```
//! use lbm::{Bgk, Cell, Lattice, Vector};
//!
//! let model = Bgk::new(0.02).unwrap();
//! let mut lattice = Lattice::new(40, 20, model).unwrap();
//! lattice.fill(1.0, Vector::new(0.1, 0.0));
//! lattice.set_cell(10, 10, Cell::barrier());
//!
//! for _ in 0..10 {
//!     lattice.advance();
//! }
//! assert_eq!(lattice.velocity_at(10, 10), Vector::ZERO);
//! ```

pub mod bgk;
pub mod cell;
pub mod direction;
pub mod error;
pub mod lattice;
pub mod vector;

pub use bgk::Bgk;
pub use cell::{Barrier, Cell, CellKind, Fluid, Inflow, Populations, DENSITY_EPSILON};
pub use direction::{Direction, WeightClass, Q};
pub use error::{LbmError, LbmResult};
pub use lattice::{Edges, Lattice};
pub use vector::Vector;
