//! Charge grid and its 8-connected adjacency

pub mod charge_grid;
pub mod neighbors;

pub use charge_grid::ChargeGrid;
pub use neighbors::{build_neighbor_pairs, neighbor_count, NeighborPair};
