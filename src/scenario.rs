use crate::config::{ChannelConfig, ConfigError};
use lbm::{Bgk, Cell, CellKind, Lattice};
use log::info;

/// Builds the channel described by `config`, seeded with the free stream.
pub fn build(config: &ChannelConfig) -> Result<Lattice, ConfigError> {
    config.validate()?;
    let model = Bgk::new(config.viscosity)?;
    let mut lattice = Lattice::with_edges(config.width, config.height, model, config.edges)?;
    lattice.fill(config.density, config.velocity);

    if let Some(barrier) = &config.barrier {
        let x = fraction_of(barrier.column, config.width);
        let from = fraction_of(barrier.from, config.height);
        let to = fraction_of(barrier.to, config.height);
        for y in from..to {
            lattice.set_cell(x, y, Cell::barrier());
        }
    }

    if config.inflow_ring {
        let (nx, ny) = (config.width, config.height);
        let inflow = Cell::inflow(&model, config.density, config.velocity);
        for y in 0..ny {
            lattice.set_cell(0, y, inflow.clone());
            lattice.set_cell(nx - 1, y, inflow.clone());
        }
        for x in 0..nx {
            lattice.set_cell(x, 0, inflow.clone());
            lattice.set_cell(x, ny - 1, inflow.clone());
        }
    }

    info!(
        "channel {}x{}, nu = {}, u = ({}, {}), omega = {:.4}",
        config.width,
        config.height,
        config.viscosity,
        config.velocity.x,
        config.velocity.y,
        model.omega()
    );
    Ok(lattice)
}

fn fraction_of(fraction: f64, len: usize) -> usize {
    ((fraction * len as f64) as usize).min(len - 1)
}

/// Turns a fluid cell into a wall. Inflow cells and existing walls are left
/// alone; returns whether anything changed.
pub fn paint(lattice: &mut Lattice, x: usize, y: usize) -> bool {
    if lattice.cell_at(x, y).kind() != CellKind::Fluid {
        return false;
    }
    lattice.set_cell(x, y, Cell::barrier());
    true
}

/// Turns a wall back into fluid at the free-stream state.
pub fn erase(lattice: &mut Lattice, config: &ChannelConfig, x: usize, y: usize) -> bool {
    if !lattice.is_solid(x, y) {
        return false;
    }
    lattice.set_cell(x, y, Cell::fluid());
    lattice.initialize(x, y, config.density, config.velocity);
    true
}
