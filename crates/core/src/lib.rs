//! Charge Transport Simulation Core Library
//!
//! A discrete-time model of charge moving across a rectangular grid. Each tick
//! derives a local field from charge differences between neighbouring cells,
//! moves charge along that field with mobility and friction, drains charge
//! through the border, and occasionally injects a unit charge at a random cell.
//!
//! ## Layout
//!
//! - [`grid`]: charge storage and the cached 8-neighbour adjacency list
//! - [`solver`]: the field solver and the transport engine
//! - [`simulation`]: tick orchestration, hooks, configuration and statistics
//! - [`render`]: vertex-averaged terminal heatmaps
//!
//! ## Example
//!
//! ```rust
//! use charge_sim_core::{ChargeGrid, HookTarget, Simulator};
//!
//! let mut grid = ChargeGrid::new(10, 10).unwrap();
//! grid.set(5, 5, 1.0);
//! let mut sim = Simulator::seeded(grid, 0.5, 0.01, 42);
//! sim.attach_hook(|view, step| {
//!     let _ = (view.values(), step);
//! }, HookTarget::Charge);
//! sim.run(10, 0.1);
//! assert_eq!(sim.stats().steps, 10);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Grid and kernels
pub mod grid;
pub mod solver;

// Orchestration
pub mod simulation;

// Presentation helpers for the demos
pub mod render;

pub use core_types::{FieldData, RandomSource};
pub use error::{ConfigError, GridError};
pub use grid::{ChargeGrid, NeighborPair};
pub use simulation::{
    HookFn, HookTarget, SimulationConfig, SimulationStats, Simulator, SimulatorState, StepView,
};
pub use solver::{FieldSolver, TransportEngine};
