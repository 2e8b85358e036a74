//! Run statistics

use serde::{Deserialize, Serialize};

/// Snapshot of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks completed since construction or the last reset
    pub steps: u64,
    /// Charges injected by ticks
    pub injections: u64,
    /// Charges placed manually between ticks
    pub manual_placements: u64,
    /// Sum of all cells
    pub total_charge: f64,
    /// Smallest cell value
    pub min_charge: f32,
    /// Largest cell value
    pub max_charge: f32,
}

impl SimulationStats {
    /// Total charge added by injection, one unit per event
    #[must_use]
    pub fn injected_charge(&self) -> f64 {
        self.injections as f64
    }

    /// Largest absolute cell value, never below `floor`
    #[must_use]
    pub fn peak_magnitude(&self, floor: f32) -> f32 {
        self.min_charge.abs().max(self.max_charge.abs()).max(floor)
    }
}
