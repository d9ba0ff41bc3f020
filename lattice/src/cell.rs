//! Per-cell behavior: free fluid, solid wall and fixed-state inflow.

use crate::bgk::Bgk;
use crate::direction::{Direction, Q};
use crate::vector::Vector;

pub type Populations = [f64; Q];

/// Densities below this are treated as vacuum, whose velocity is zero.
pub const DENSITY_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Fluid,
    Barrier,
    Inflow,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fluid {
    f: Populations,
}

/// Solid no-slip wall. Whatever streams in is sent straight back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Barrier {
    f: Populations,
}

/// Open boundary pinned to a fixed density and velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Inflow {
    density: f64,
    velocity: Vector,
    eq: Populations,
    f: Populations,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Fluid(Fluid),
    Barrier(Barrier),
    Inflow(Inflow),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Fluid(Fluid::default())
    }
}

impl Fluid {
    pub fn density(&self) -> f64 {
        self.f.iter().sum()
    }

    pub fn velocity(&self, rho: f64) -> Vector {
        if rho.abs() < DENSITY_EPSILON {
            return Vector::ZERO;
        }
        let f = |d: Direction| self.f[d.index()];

        let x = f(Direction::Right) + f(Direction::RightUp) + f(Direction::RightDown)
            - f(Direction::Left)
            - f(Direction::LeftUp)
            - f(Direction::LeftDown);
        let y = f(Direction::RightUp) + f(Direction::Up) + f(Direction::LeftUp)
            - f(Direction::RightDown)
            - f(Direction::Down)
            - f(Direction::LeftDown);

        let rho_inv = 1.0 / rho;
        Vector::new(x * rho_inv, y * rho_inv)
    }
}

impl Barrier {
    /// Takes the population that streamed into slot `dir`, leaving it empty.
    pub fn bounce_back(&mut self, dir: Direction) -> (Direction, f64) {
        let value = std::mem::take(&mut self.f[dir.index()]);
        (dir.opposite(), value)
    }
}

impl Inflow {
    pub fn new(model: &Bgk, rho: f64, u: Vector) -> Self {
        let eq = model.equilibria(rho, u);
        Self {
            density: rho,
            velocity: u,
            eq,
            f: eq,
        }
    }

    pub fn target(&self) -> (f64, Vector) {
        (self.density, self.velocity)
    }

    /// Stores `value` in `dir` and mirrors its non-equilibrium part into the
    /// opposite slot, which keeps the macroscopic state pinned.
    pub fn set_distribution(&mut self, dir: Direction, value: f64) {
        let back = dir.opposite().index();
        let dir = dir.index();
        self.f[dir] = value;
        self.f[back] = self.eq[back] + (value - self.eq[dir]);
    }
}

impl Cell {
    pub fn fluid() -> Self {
        Cell::Fluid(Fluid::default())
    }

    pub fn barrier() -> Self {
        Cell::Barrier(Barrier::default())
    }

    pub fn inflow(model: &Bgk, rho: f64, u: Vector) -> Self {
        Cell::Inflow(Inflow::new(model, rho, u))
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Fluid(_) => CellKind::Fluid,
            Cell::Barrier(_) => CellKind::Barrier,
            Cell::Inflow(_) => CellKind::Inflow,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Cell::Barrier(_))
    }

    /// Seeds the populations with the equilibrium of `(rho, u)`.
    ///
    /// A barrier holds no fluid and is cleared instead; an inflow boundary
    /// takes `(rho, u)` as its new target.
    pub fn initialize(&mut self, model: &Bgk, rho: f64, u: Vector) {
        match self {
            Cell::Fluid(c) => c.f = model.equilibria(rho, u),
            Cell::Barrier(c) => c.f = [0.0; Q],
            Cell::Inflow(c) => *c = Inflow::new(model, rho, u),
        }
    }

    #[inline]
    pub fn populations(&self) -> &Populations {
        match self {
            Cell::Fluid(c) => &c.f,
            Cell::Barrier(c) => &c.f,
            Cell::Inflow(c) => &c.f,
        }
    }

    /// Raw slot access, bypassing the inflow reconstruction.
    #[inline]
    pub fn populations_mut(&mut self) -> &mut Populations {
        match self {
            Cell::Fluid(c) => &mut c.f,
            Cell::Barrier(c) => &mut c.f,
            Cell::Inflow(c) => &mut c.f,
        }
    }

    #[inline]
    pub fn distribution(&self, dir: Direction) -> f64 {
        self.populations()[dir.index()]
    }

    #[inline]
    pub fn set_distribution(&mut self, dir: Direction, value: f64) {
        match self {
            Cell::Fluid(c) => c.f[dir.index()] = value,
            Cell::Barrier(c) => c.f[dir.index()] = value,
            Cell::Inflow(c) => c.set_distribution(dir, value),
        }
    }

    #[inline]
    pub fn density(&self) -> f64 {
        match self {
            Cell::Fluid(c) => c.density(),
            Cell::Barrier(_) => 0.0,
            Cell::Inflow(c) => c.density,
        }
    }

    #[inline]
    pub fn velocity(&self, rho: f64) -> Vector {
        match self {
            Cell::Fluid(c) => c.velocity(rho),
            Cell::Barrier(_) => Vector::ZERO,
            Cell::Inflow(c) => c.velocity,
        }
    }

    #[inline]
    pub fn bounces(&self) -> bool {
        self.is_solid()
    }

    /// Only barriers reflect; other cells report `(dir, 0.0)` untouched.
    #[inline]
    pub fn bounce_back(&mut self, dir: Direction) -> (Direction, f64) {
        match self {
            Cell::Barrier(c) => c.bounce_back(dir),
            _ => (dir, 0.0),
        }
    }
}
