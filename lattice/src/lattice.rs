use crate::bgk::Bgk;
use crate::cell::Cell;
use crate::direction::Direction;
use crate::error::{LbmError, LbmResult};
use crate::vector::Vector;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// How neighbors are addressed past the domain border. One mode holds for
/// every phase and every direction of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edges {
    /// Opposite borders touch.
    #[default]
    Periodic,
    /// Nothing enters from outside. An incoming slot without a source keeps
    /// the cell's own post-collision population.
    Open,
}

/// D2Q9 world: the current cells, a streaming scratch arena of the same
/// shape, and the density/velocity caches the next collision reads.
#[derive(Debug, Clone)]
pub struct Lattice {
    nx: usize,
    ny: usize,
    edges: Edges,
    model: Bgk,
    grids: Vec<Cell>,
    buffer: Vec<Cell>,
    density: Vec<f64>,
    velocity: Vec<Vector>,
    steps: u64,
}

impl Lattice {
    /// Periodic lattice of `nx * ny` empty fluid cells.
    pub fn new(nx: usize, ny: usize, model: Bgk) -> LbmResult<Self> {
        Self::with_edges(nx, ny, model, Edges::default())
    }

    pub fn with_edges(nx: usize, ny: usize, model: Bgk, edges: Edges) -> LbmResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(LbmError::EmptyLattice {
                width: nx,
                height: ny,
            });
        }
        let size = nx
            .checked_mul(ny)
            .filter(|_| nx <= i64::MAX as usize && ny <= i64::MAX as usize)
            .ok_or(LbmError::LatticeTooLarge {
                width: nx,
                height: ny,
            })?;

        debug!(
            "lattice {}x{} ({:?} edges), nu = {}, omega = {}",
            nx,
            ny,
            edges,
            model.viscosity(),
            model.omega()
        );

        Ok(Self {
            nx,
            ny,
            edges,
            model,
            grids: vec![Cell::fluid(); size],
            buffer: vec![Cell::fluid(); size],
            density: vec![0.0; size],
            velocity: vec![Vector::ZERO; size],
            steps: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.nx
    }

    pub fn height(&self) -> usize {
        self.ny
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn edges(&self) -> Edges {
        self.edges
    }

    pub fn model(&self) -> &Bgk {
        &self.model
    }

    /// Number of completed `advance` calls.
    pub fn time_step(&self) -> u64 {
        self.steps
    }

    /// Replaces the cell at `(x, y)` in both arenas and refreshes its cache
    /// from what the new cell reports.
    #[track_caller]
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        let idx = self.index(x, y);
        let rho = cell.density();
        self.density[idx] = rho;
        self.velocity[idx] = cell.velocity(rho);
        self.buffer[idx] = cell.clone();
        self.grids[idx] = cell;
    }

    /// Seeds `(x, y)` with the equilibrium of `(rho, u)`.
    #[track_caller]
    pub fn initialize(&mut self, x: usize, y: usize, rho: f64, u: Vector) {
        let idx = self.index(x, y);
        self.grids[idx].initialize(&self.model, rho, u);
        self.buffer[idx].initialize(&self.model, rho, u);

        if self.grids[idx].is_solid() {
            self.density[idx] = 0.0;
            self.velocity[idx] = Vector::ZERO;
        } else {
            self.density[idx] = rho;
            self.velocity[idx] = u;
        }
    }

    /// Seeds every cell with the equilibrium of `(rho, u)`.
    pub fn fill(&mut self, rho: f64, u: Vector) {
        for y in 0..self.ny {
            for x in 0..self.nx {
                self.initialize(x, y, rho, u);
            }
        }
    }

    /// One time step: collide, stream, bounce back, swap, recompute.
    pub fn advance(&mut self) {
        self.collide();
        self.stream();
        self.bounce();
        std::mem::swap(&mut self.grids, &mut self.buffer);
        self.recompute();

        self.steps += 1;
        trace!("lattice step {}", self.steps);
    }

    fn collide(&mut self) {
        let model = self.model;
        for ((cell, &rho), &u) in self
            .grids
            .iter_mut()
            .zip(&self.density)
            .zip(&self.velocity)
        {
            model.collide(cell, rho, u);
        }
    }

    // Pull form: slot d of every cell reads slot d of its upstream neighbor,
    // which is the same as pushing each population along its offset.
    fn stream(&mut self) {
        for y in 0..self.ny {
            for x in 0..self.nx {
                let dst = y * self.nx + x;
                for dir in Direction::ALL {
                    let src = self.shift(x, y, dir.opposite().offset()).unwrap_or(dst);
                    let value = self.grids[src].distribution(dir);
                    self.buffer[dst].set_distribution(dir, value);
                }
            }
        }
    }

    // Runs on the fully streamed buffer. Every non-empty moving slot of a
    // solid cell goes back to the cell it came from.
    fn bounce(&mut self) {
        for y in 0..self.ny {
            for x in 0..self.nx {
                let idx = y * self.nx + x;
                if !self.buffer[idx].bounces() {
                    continue;
                }
                for dir in Direction::ALL {
                    if dir == Direction::Rest || self.buffer[idx].distribution(dir) == 0.0 {
                        continue;
                    }
                    let (back, value) = self.buffer[idx].bounce_back(dir);
                    if let Some(origin) = self.shift(x, y, back.offset()) {
                        self.buffer[origin].set_distribution(back, value);
                    }
                }
            }
        }
    }

    fn recompute(&mut self) {
        for ((cell, rho), u) in self
            .grids
            .iter()
            .zip(self.density.iter_mut())
            .zip(self.velocity.iter_mut())
        {
            *rho = cell.density();
            *u = cell.velocity(*rho);
        }
    }

    #[track_caller]
    pub fn cell_at(&self, x: usize, y: usize) -> &Cell {
        &self.grids[self.index(x, y)]
    }

    #[track_caller]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.cell_at(x, y).is_solid()
    }

    #[track_caller]
    pub fn density_at(&self, x: usize, y: usize) -> f64 {
        self.density[self.index(x, y)]
    }

    #[track_caller]
    pub fn velocity_at(&self, x: usize, y: usize) -> Vector {
        self.velocity[self.index(x, y)]
    }

    /// Coordinates one step from `(x, y)` along `dir`, or `None` past an open border.
    #[track_caller]
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        self.index(x, y);
        self.shift(x, y, dir.offset())
            .map(|idx| (idx % self.nx, idx / self.nx))
    }

    /// z-component of the velocity curl from central differences,
    /// `(dv_y/dx - dv_x/dy)`. Zero where a neighbor lies past an open border.
    #[track_caller]
    pub fn vorticity(&self, x: usize, y: usize) -> f64 {
        self.index(x, y);
        let (Some(right), Some(left), Some(up), Some(down)) = (
            self.shift(x, y, Direction::Right.offset()),
            self.shift(x, y, Direction::Left.offset()),
            self.shift(x, y, Direction::Up.offset()),
            self.shift(x, y, Direction::Down.offset()),
        ) else {
            return 0.0;
        };

        let dvy = self.velocity[right].y - self.velocity[left].y;
        let dvx = self.velocity[up].x - self.velocity[down].x;
        0.5 * dvy - 0.5 * dvx
    }

    /// Sum of cached densities; constant over steps on a periodic lattice
    /// without inflow cells.
    pub fn total_mass(&self) -> f64 {
        self.density.iter().sum()
    }

    pub fn max_speed(&self) -> f64 {
        self.velocity
            .iter()
            .map(|u| u.length())
            .fold(0.0, f64::max)
    }

    #[track_caller]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.nx && y < self.ny,
            "cell ({}, {}) is outside the {}x{} lattice",
            x,
            y,
            self.nx,
            self.ny
        );
        y * self.nx + x
    }

    #[inline]
    fn shift(&self, x: usize, y: usize, (dx, dy): (i32, i32)) -> Option<usize> {
        let (nx, ny) = (self.nx as i64, self.ny as i64);
        let mut tx = x as i64 + dx as i64;
        let mut ty = y as i64 + dy as i64;
        match self.edges {
            Edges::Periodic => {
                tx = tx.rem_euclid(nx);
                ty = ty.rem_euclid(ny);
            }
            Edges::Open => {
                if tx < 0 || ty < 0 || tx >= nx || ty >= ny {
                    return None;
                }
            }
        }
        Some(ty as usize * self.nx + tx as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(nx: usize, ny: usize, edges: Edges) -> Lattice {
        Lattice::with_edges(nx, ny, Bgk::new(0.02).unwrap(), edges).unwrap()
    }

    fn buffer_total(lattice: &Lattice) -> f64 {
        lattice
            .buffer
            .iter()
            .map(|c| c.populations().iter().sum::<f64>())
            .sum()
    }

    #[test]
    fn rejects_empty_shape() {
        let model = Bgk::new(0.1).unwrap();
        assert_eq!(
            Lattice::new(0, 4, model).unwrap_err(),
            LbmError::EmptyLattice { width: 0, height: 4 }
        );
        assert!(Lattice::new(4, 0, model).is_err());
        assert!(matches!(
            Lattice::new(usize::MAX, 2, model),
            Err(LbmError::LatticeTooLarge { .. })
        ));
    }

    #[test]
    fn starts_as_empty_fluid() {
        let lattice = empty(3, 2, Edges::Periodic);
        assert_eq!(lattice.dimensions(), (3, 2));
        for y in 0..2 {
            for x in 0..3 {
                assert!(!lattice.is_solid(x, y));
                assert_eq!(lattice.density_at(x, y), 0.0);
                assert_eq!(lattice.velocity_at(x, y), Vector::ZERO);
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside the 4x3 lattice")]
    fn out_of_range_access_panics() {
        empty(4, 3, Edges::Periodic).density_at(4, 0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_setup_panics() {
        empty(4, 3, Edges::Open).set_cell(0, 3, Cell::barrier());
    }

    #[test]
    fn periodic_stream_moves_single_population() {
        for dir in Direction::ALL {
            let mut lattice = empty(5, 4, Edges::Periodic);
            let (x, y) = (4, 3);
            let seed = lattice.index(x, y);
            lattice.grids[seed].set_distribution(dir, 1.0);
            lattice.stream();

            let (dx, dy) = dir.offset();
            let tx = (x as i32 + dx).rem_euclid(5) as usize;
            let ty = (y as i32 + dy).rem_euclid(4) as usize;
            for (i, cell) in lattice.buffer.iter().enumerate() {
                for d in Direction::ALL {
                    let expected = if i == ty * 5 + tx && d == dir { 1.0 } else { 0.0 };
                    assert_eq!(cell.distribution(d), expected, "{:?} at {}", d, i);
                }
            }
        }
    }

    #[test]
    fn open_stream_never_wraps() {
        let mut lattice = empty(4, 4, Edges::Open);
        let corner = lattice.index(3, 3);
        lattice.grids[corner].set_distribution(Direction::RightUp, 1.0);
        lattice.stream();

        // Leaves through the corner instead of reappearing at (0, 0).
        assert_eq!(lattice.buffer[0].distribution(Direction::RightUp), 0.0);
        assert_eq!(buffer_total(&lattice), 0.0);
    }

    #[test]
    fn open_border_keeps_own_incoming_slot() {
        let mut lattice = empty(4, 4, Edges::Open);
        let edge = lattice.index(0, 2);
        lattice.grids[edge].set_distribution(Direction::Right, 0.3);
        lattice.stream();

        assert_eq!(
            lattice.buffer[lattice.index(1, 2)].distribution(Direction::Right),
            0.3
        );
        assert_eq!(lattice.buffer[edge].distribution(Direction::Right), 0.3);
    }

    #[test]
    fn barrier_returns_population_to_origin() {
        for dir in Direction::ALL.into_iter().skip(1) {
            let mut lattice = empty(5, 5, Edges::Periodic);
            lattice.set_cell(2, 2, Cell::barrier());
            let (dx, dy) = dir.offset();
            let (ox, oy) = ((2 - dx) as usize, (2 - dy) as usize);
            let seed = lattice.index(ox, oy);
            lattice.grids[seed].set_distribution(dir, 0.4);

            lattice.stream();
            assert_eq!(lattice.buffer[lattice.index(2, 2)].distribution(dir), 0.4);
            lattice.bounce();

            let wall = &lattice.buffer[lattice.index(2, 2)];
            assert!(wall.populations().iter().all(|&f| f == 0.0));
            let origin = &lattice.buffer[lattice.index(ox, oy)];
            assert_eq!(origin.distribution(dir.opposite()), 0.4);
            assert_eq!(buffer_total(&lattice), 0.4);
        }
    }

    #[test]
    fn bounced_population_leaves_origin_next_step() {
        let mut lattice = empty(6, 3, Edges::Periodic);
        lattice.set_cell(3, 1, Cell::barrier());
        let seed = lattice.index(2, 1);
        lattice.grids[seed].set_distribution(Direction::Right, 0.25);

        lattice.stream();
        lattice.bounce();
        std::mem::swap(&mut lattice.grids, &mut lattice.buffer);
        lattice.recompute();

        assert_eq!(lattice.density_at(2, 1), 0.25);
        assert_eq!(lattice.velocity_at(2, 1), Vector::new(-1.0, 0.0));
        assert_eq!(lattice.density_at(3, 1), 0.0);
    }

    #[test]
    fn barrier_at_open_border_reflects() {
        let mut lattice = empty(3, 3, Edges::Open);
        lattice.set_cell(0, 1, Cell::barrier());
        let seed = lattice.index(1, 1);
        lattice.grids[seed].set_distribution(Direction::Left, 0.5);
        lattice.stream();
        lattice.bounce();
        assert_eq!(
            lattice.buffer[lattice.index(1, 1)].distribution(Direction::Right),
            0.5
        );
    }

    #[test]
    fn set_cell_refreshes_cache() {
        let mut lattice = empty(4, 4, Edges::Periodic);
        lattice.fill(1.0, Vector::new(0.1, 0.0));
        lattice.set_cell(1, 1, Cell::barrier());
        assert_eq!(lattice.density_at(1, 1), 0.0);
        assert_eq!(lattice.velocity_at(1, 1), Vector::ZERO);
        assert_eq!(lattice.buffer[lattice.index(1, 1)].kind(), lattice.cell_at(1, 1).kind());

        let inflow = Cell::inflow(lattice.model(), 0.9, Vector::new(0.0, 0.05));
        lattice.set_cell(2, 2, inflow);
        assert_eq!(lattice.density_at(2, 2), 0.9);
        assert_eq!(lattice.velocity_at(2, 2), Vector::new(0.0, 0.05));
    }

    #[test]
    fn initialize_seeds_cache() {
        let mut lattice = empty(4, 4, Edges::Periodic);
        let u = Vector::new(0.02, -0.01);
        lattice.initialize(3, 0, 1.1, u);
        assert_eq!(lattice.density_at(3, 0), 1.1);
        assert_eq!(lattice.velocity_at(3, 0), u);
        assert!((lattice.cell_at(3, 0).density() - 1.1).abs() < 1e-12);

        lattice.set_cell(0, 0, Cell::barrier());
        lattice.initialize(0, 0, 1.1, u);
        assert_eq!(lattice.density_at(0, 0), 0.0);
    }

    #[test]
    fn neighbor_respects_edges() {
        let periodic = empty(4, 3, Edges::Periodic);
        assert_eq!(periodic.neighbor(0, 0, Direction::LeftDown), Some((3, 2)));
        assert_eq!(periodic.neighbor(3, 2, Direction::RightUp), Some((0, 0)));
        assert_eq!(periodic.neighbor(1, 1, Direction::Rest), Some((1, 1)));

        let open = empty(4, 3, Edges::Open);
        assert_eq!(open.neighbor(0, 0, Direction::LeftDown), None);
        assert_eq!(open.neighbor(3, 1, Direction::Right), None);
        assert_eq!(open.neighbor(2, 1, Direction::RightUp), Some((3, 2)));
    }

    #[test]
    fn vorticity_of_shear_flow() {
        let mut lattice = empty(6, 6, Edges::Open);
        for y in 0..6 {
            for x in 0..6 {
                lattice.initialize(x, y, 1.0, Vector::new(0.01 * y as f64, 0.0));
            }
        }
        assert!((lattice.vorticity(2, 3) + 0.01).abs() < 1e-15);
        assert_eq!(lattice.vorticity(0, 3), 0.0);
        assert_eq!(lattice.vorticity(2, 5), 0.0);
    }

    #[test]
    fn vorticity_of_rotation() {
        let mut lattice = empty(5, 5, Edges::Periodic);
        // u = (-y, x) around the center has curl 2.
        for y in 0..5 {
            for x in 0..5 {
                let (rx, ry) = (x as f64 - 2.0, y as f64 - 2.0);
                lattice.initialize(x, y, 1.0, Vector::new(-0.01 * ry, 0.01 * rx));
            }
        }
        assert!((lattice.vorticity(2, 2) - 0.02).abs() < 1e-15);
    }

    #[test]
    fn advance_counts_steps() {
        let mut lattice = empty(3, 3, Edges::Periodic);
        lattice.fill(1.0, Vector::ZERO);
        lattice.advance();
        lattice.advance();
        assert_eq!(lattice.time_step(), 2);
    }
}
