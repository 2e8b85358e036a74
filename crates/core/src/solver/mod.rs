//! Field and transport kernels
//!
//! Both kernels walk the grid's adjacency list. The field solver is a pure
//! function of the charge; the transport engine moves charge along the field
//! through a back buffer and commits it with a single swap.
//!
//! # Example
//!
//! ```rust
//! use charge_sim_core::grid::ChargeGrid;
//! use charge_sim_core::solver::{FieldSolver, TransportEngine, DEFAULT_EPSILON};
//!
//! let mut grid = ChargeGrid::new(3, 3).unwrap();
//! grid.set(1, 1, 1.0);
//! let mut solver = FieldSolver::new(&grid, DEFAULT_EPSILON);
//! let mut transport = TransportEngine::default();
//! let field = solver.recompute(&grid);
//! transport.advance(&mut grid, field);
//! assert!(grid.cells().iter().all(|q| q.is_finite()));
//! ```

mod field_solver;
mod transport;

pub use field_solver::{FieldSolver, DEFAULT_EPSILON};
pub use transport::{
    boundary_drain, pair_transfer, PairTransfer, TransportEngine, DEFAULT_FRICTION, DEFAULT_MU,
};
