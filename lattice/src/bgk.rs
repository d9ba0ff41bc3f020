//! Single-relaxation-time (BGK) collision.

use crate::cell::{Cell, Populations};
use crate::direction::{Direction, Q};
use crate::error::{LbmError, LbmResult};
use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bgk {
    viscosity: f64,
    /// Relaxation rate, `1 / tau`.
    omega: f64,
}

impl Bgk {
    /// Model for kinematic viscosity `nu` in lattice units, `omega = 1 / (3 nu + 0.5)`.
    pub fn new(nu: f64) -> LbmResult<Self> {
        if !nu.is_finite() || nu <= 0.0 {
            return Err(LbmError::InvalidViscosity(nu));
        }
        Ok(Self {
            viscosity: nu,
            omega: 1.0 / (3.0 * nu + 0.5),
        })
    }

    /// Model with a given relaxation rate. `omega = 0` never relaxes, `omega = 1`
    /// jumps straight to equilibrium. The viscosity of `omega = 0` is infinite.
    pub fn from_omega(omega: f64) -> LbmResult<Self> {
        if !(0.0..=2.0).contains(&omega) {
            return Err(LbmError::InvalidOmega(omega));
        }
        Ok(Self {
            viscosity: (1.0 / omega - 0.5) / 3.0,
            omega,
        })
    }

    pub fn viscosity(&self) -> f64 {
        self.viscosity
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn tau(&self) -> f64 {
        1.0 / self.omega
    }

    /// f_eq = w rho (1 + 3 e.u + 4.5 (e.u)^2 - 1.5 u.u)
    #[inline]
    pub fn equilibrium(&self, dir: Direction, rho: f64, u: Vector) -> f64 {
        equilibrium(dir, rho, u, u.length_sq())
    }

    /// Equilibrium populations of every direction at once.
    #[inline]
    pub fn equilibria(&self, rho: f64, u: Vector) -> Populations {
        let u2 = u.length_sq();
        let mut feq = [0.0; Q];
        for dir in Direction::ALL {
            feq[dir.index()] = equilibrium(dir, rho, u, u2);
        }
        feq
    }

    /// Relaxes `f` toward the equilibrium of `(rho, u)` in place.
    #[inline]
    pub fn relax(&self, f: &mut Populations, rho: f64, u: Vector) {
        let u2 = u.length_sq();
        let keep = 1.0 - self.omega;
        for dir in Direction::ALL {
            let slot = &mut f[dir.index()];
            *slot = keep * *slot + self.omega * equilibrium(dir, rho, u, u2);
        }
    }

    /// Collision on a single cell with its cached macroscopic state.
    ///
    /// Works on the raw populations: an inflow boundary relaxes slot by slot
    /// without triggering its non-equilibrium reconstruction.
    #[inline]
    pub fn collide(&self, cell: &mut Cell, rho: f64, u: Vector) {
        self.relax(cell.populations_mut(), rho, u);
    }
}

#[inline(always)]
fn equilibrium(dir: Direction, rho: f64, u: Vector, u2: f64) -> f64 {
    let eu = dir.velocity().dot(u);
    dir.weight() * rho * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * u2)
}
