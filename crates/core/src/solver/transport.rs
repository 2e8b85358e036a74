//! Field-driven charge transport with friction and boundary drain
//!
//! Every pair update reads the previous tick's charge and writes into a back
//! buffer, which is sanitized and swapped into the grid at the end:
//!
//! 1. For each adjacency pair, move `Q = min(E*mu*q/8, q/8)` from `(i,j)` to
//!    `(k,l)`, minus a friction loss `d*friction*q` that leaves the system.
//! 2. Border cells additionally lose `E*mu*q/8` (once, corners included).
//! 3. Non-finite results become zero.

use crate::core_types::{finite_or_zero, FieldData};
use crate::grid::{ChargeGrid, NeighborPair};

use super::field_solver::MAX_NEIGHBORS;

/// Default mobility
pub const DEFAULT_MU: f32 = 0.5;

/// Default friction coefficient
pub const DEFAULT_FRICTION: f32 = 0.01;

/// Charge moved along a single adjacency pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTransfer {
    /// Charge removed from the source cell
    pub flow: f32,
    /// Portion of the flow dissipated by friction instead of reaching the neighbour
    pub loss: f32,
}

impl PairTransfer {
    /// Charge credited to the neighbour cell
    #[must_use]
    pub fn delivered(&self) -> f32 {
        self.flow - self.loss
    }
}

/// Transfer along `pair` given the source cell's charge and field.
///
/// Inputs are coerced to finite values; returns `None` when the flow or the
/// loss is still non-finite, in which case the pair must not be applied.
#[must_use]
pub fn pair_transfer(
    pair: &NeighborPair,
    q_ij: f32,
    e_ij: f32,
    mu: f32,
    friction: f32,
) -> Option<PairTransfer> {
    let q_ij = finite_or_zero(q_ij);
    let e_ij = finite_or_zero(e_ij);
    let d = pair.distance_weight();

    let flow = ((e_ij * mu * q_ij) / MAX_NEIGHBORS).min(q_ij / MAX_NEIGHBORS);
    let loss = d * friction * q_ij;

    (flow.is_finite() && loss.is_finite()).then_some(PairTransfer { flow, loss })
}

/// Charge leaking out of a border cell in one tick, `None` if non-finite
#[must_use]
pub fn boundary_drain(q_ij: f32, e_ij: f32, mu: f32) -> Option<f32> {
    let drain = (finite_or_zero(e_ij) * mu * finite_or_zero(q_ij)) / MAX_NEIGHBORS;
    drain.is_finite().then_some(drain)
}

/// Advances the charge distribution by one tick
#[derive(Debug, Clone)]
pub struct TransportEngine {
    mu: f32,
    friction: f32,
    // Back buffer; holds the previous tick's cells after a swap
    next: Vec<f32>,
}

impl TransportEngine {
    /// Create an engine with fixed mobility and friction
    #[must_use]
    pub fn new(mu: f32, friction: f32) -> Self {
        Self {
            mu,
            friction,
            next: Vec::new(),
        }
    }

    /// Mobility
    #[must_use]
    pub fn mu(&self) -> f32 {
        self.mu
    }

    /// Friction coefficient
    #[must_use]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Move charge between cells according to `field` and commit the result
    ///
    /// # Arguments
    ///
    /// * `grid` - Charge grid, read as the previous tick and overwritten
    /// * `field` - Field computed from `grid` for this tick
    ///
    /// # Panics
    ///
    /// Panics if `field` does not have the grid's shape
    pub fn advance(&mut self, grid: &mut ChargeGrid, field: &FieldData) {
        assert!(
            field.has_shape(grid.rows(), grid.cols()),
            "Field shape does not match grid"
        );

        self.next.clear();
        self.next.extend_from_slice(grid.cells());

        let charge = grid.cells();
        let e = field.as_slice();

        for pair in grid.neighbor_pairs() {
            let idx_ij = grid.index(pair.i, pair.j);
            let idx_kl = grid.index(pair.k, pair.l);
            let Some(transfer) =
                pair_transfer(pair, charge[idx_ij], e[idx_ij], self.mu, self.friction)
            else {
                continue;
            };
            self.next[idx_kl] += transfer.delivered();
            self.next[idx_ij] -= transfer.flow;
        }

        for i in 0..grid.rows() {
            for j in 0..grid.cols() {
                if !grid.is_border(i, j) {
                    continue;
                }
                let idx = grid.index(i, j);
                if let Some(drain) = boundary_drain(charge[idx], e[idx], self.mu) {
                    self.next[idx] -= drain;
                }
            }
        }

        grid.swap_cells(&mut self.next);
    }
}

impl Default for TransportEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MU, DEFAULT_FRICTION)
    }
}
