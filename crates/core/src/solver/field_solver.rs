//! Local field estimate from pairwise charge differences
//!
//! For every adjacency pair `(i,j) -> (k,l)` the field at `(i,j)` accumulates
//! `((q_kl - q_ij) / (d * epsilon)) / 8`, where `d` is the pair's distance
//! weight and `8` is the maximum neighbour count. This is a single-pass local
//! proxy, not a Poisson solve.

use crate::core_types::{finite_or_zero, FieldData};
use crate::grid::ChargeGrid;

/// Default permittivity; large enough that the field does not vanish between
/// neighbouring charges
pub const DEFAULT_EPSILON: f32 = 2.0;

/// Maximum number of neighbours of a cell, used to normalise contributions
pub(crate) const MAX_NEIGHBORS: f32 = 8.0;

/// Derives the per-cell field from a charge grid
#[derive(Debug, Clone)]
pub struct FieldSolver {
    epsilon: f32,
    field: FieldData,
}

impl FieldSolver {
    /// Create a solver whose field matches the shape of `grid`
    #[must_use]
    pub fn new(grid: &ChargeGrid, epsilon: f32) -> Self {
        Self {
            epsilon,
            field: FieldData::new(grid.rows(), grid.cols()),
        }
    }

    /// Permittivity used by this solver
    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Field from the most recent [`FieldSolver::recompute`]
    #[must_use]
    pub fn field(&self) -> &FieldData {
        &self.field
    }

    /// Recompute the whole field from the current charge distribution
    ///
    /// The field is reset and rebuilt from every adjacency pair; the result is
    /// a pure function of the grid's cells. Non-finite charges read as zero and
    /// entries that overflow are stored as zero.
    ///
    /// # Arguments
    ///
    /// * `grid` - Charge distribution to solve for
    ///
    /// # Returns
    ///
    /// The refreshed field, same shape as `grid`
    pub fn recompute(&mut self, grid: &ChargeGrid) -> &FieldData {
        if !self.field.has_shape(grid.rows(), grid.cols()) {
            self.field = FieldData::new(grid.rows(), grid.cols());
        }
        self.field.fill(0.0);

        let charge = grid.cells();
        let field = self.field.as_mut_slice();
        for pair in grid.neighbor_pairs() {
            let d = pair.distance_weight();
            let idx_ij = grid.index(pair.i, pair.j);
            let idx_kl = grid.index(pair.k, pair.l);
            let diff = finite_or_zero(charge[idx_kl]) - finite_or_zero(charge[idx_ij]);
            field[idx_ij] += (diff / (d * self.epsilon)) / MAX_NEIGHBORS;
        }
        for e in field.iter_mut() {
            *e = finite_or_zero(*e);
        }

        &self.field
    }
}
