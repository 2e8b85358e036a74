//! Simulation configuration
//!
//! All knobs are fixed once a simulator is built. Configurations can be loaded
//! from JSON; missing keys take their default.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::Simulator;
use crate::error::ConfigError;
use crate::grid::ChargeGrid;
use crate::solver::{DEFAULT_EPSILON, DEFAULT_FRICTION, DEFAULT_MU};

/// Parameters for building a [`Simulator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Field solver permittivity
    pub epsilon: f32,
    /// Transport mobility
    pub mu: f32,
    /// Transport friction coefficient
    pub friction: f32,
    /// Per-tick injection probability
    pub charge_threshold: f32,
    /// Seed for a reproducible run; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Unit charges placed at random before the first tick
    pub initial_charges: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            epsilon: DEFAULT_EPSILON,
            mu: DEFAULT_MU,
            friction: DEFAULT_FRICTION,
            charge_threshold: 0.1,
            seed: None,
            initial_charges: 1,
        }
    }
}

impl SimulationConfig {
    /// Low mobility with strong friction; charge spreads slowly enough to watch
    #[must_use]
    pub fn heavy_friction() -> Self {
        Self {
            mu: 0.001,
            friction: 100.0,
            ..Self::default()
        }
    }

    /// Look up a named preset (`default`, `heavy-friction`)
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "heavy-friction" | "heavy_friction" | "heavy" => Some(Self::heavy_friction()),
            _ => None,
        }
    }

    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it cannot be parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Build a simulator, placing the initial charges before the first field solve
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Grid`] if the grid shape is invalid
    pub fn build(&self) -> Result<Simulator, ConfigError> {
        let mut grid = ChargeGrid::new(self.rows, self.cols)?;
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        for _ in 0..self.initial_charges {
            grid.place_charge(&mut rng);
        }
        Ok(Simulator::with_rng(grid, self.mu, self.friction, rng).with_epsilon(self.epsilon))
    }
}
