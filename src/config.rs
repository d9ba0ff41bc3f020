use lbm::{Edges, LbmError, Vector};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lattice(#[from] LbmError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Vertical wall segment, placed in fractions of the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    pub column: f64,
    pub from: f64,
    pub to: f64,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            column: 0.2,
            from: 0.4,
            to: 0.55,
        }
    }
}

/// Wind-tunnel style channel: uniform flow, a wall segment and an inflow
/// ring pinning the borders to the free-stream state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub width: usize,
    pub height: usize,
    pub viscosity: f64,
    pub density: f64,
    pub velocity: Vector,
    pub edges: Edges,
    pub barrier: Option<BarrierConfig>,
    pub inflow_ring: bool,
    pub steps_per_frame: usize,
    /// Screen pixels per lattice cell.
    pub cell_size: f32,
    /// Vorticity mapped to full color saturation.
    pub vorticity_scale: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 80,
            viscosity: 0.02,
            density: 1.0,
            velocity: Vector::new(0.1, 0.0),
            edges: Edges::Periodic,
            barrier: Some(BarrierConfig::default()),
            inflow_ring: true,
            steps_per_frame: 20,
            cell_size: 4.0,
            vorticity_scale: 0.02,
        }
    }
}

pub const MAX_STEPS_PER_FRAME: usize = 200;

impl ChannelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ChannelConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::Invalid(format!(
                "channel must be at least 3x3 cells, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if !(self.velocity.x.is_finite() && self.velocity.y.is_finite()) {
            return Err(ConfigError::Invalid("velocity must be finite".to_string()));
        }
        if !(1..=MAX_STEPS_PER_FRAME).contains(&self.steps_per_frame) {
            return Err(ConfigError::Invalid(format!(
                "steps_per_frame must be within 1..={}, got {}",
                MAX_STEPS_PER_FRAME, self.steps_per_frame
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be at least one pixel, got {}",
                self.cell_size
            )));
        }
        if !(self.vorticity_scale.is_finite() && self.vorticity_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "vorticity_scale must be positive, got {}",
                self.vorticity_scale
            )));
        }
        if let Some(barrier) = &self.barrier {
            let fractions = [barrier.column, barrier.from, barrier.to];
            if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) || barrier.from > barrier.to {
                return Err(ConfigError::Invalid(format!(
                    "barrier fractions must lie in [0, 1] with from <= to, got {:?}",
                    barrier
                )));
            }
        }
        lbm::Bgk::new(self.viscosity)?;
        Ok(())
    }

    pub fn window_size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }
}
