//! Tick orchestration
//!
//! A [`Simulator`] owns the charge grid, the field solver and the transport
//! engine. Each call to [`Simulator::run_step`] performs one tick:
//!
//! 1. Recompute the field from the current charge
//! 2. Advance transport with that field
//! 3. Inject one unit of charge with probability `charge_threshold`
//! 4. Invoke registered hooks in registration order
//!
//! There is no internal timer or thread; the caller decides the cadence.

pub mod config;
pub mod hooks;
pub mod stats;

pub use config::SimulationConfig;
pub use hooks::{HookFn, HookTarget, StepView};
pub use stats::SimulationStats;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::core_types::{FieldData, RandomSource};
use crate::grid::ChargeGrid;
use crate::solver::{FieldSolver, TransportEngine, DEFAULT_EPSILON};
use hooks::StepHook;

/// Lifecycle of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    /// Constructed or reset, no tick run yet
    Idle,
    /// At least one tick has run
    Running,
}

/// Discrete-time charge transport simulation
pub struct Simulator<R: RandomSource = StdRng> {
    grid: ChargeGrid,
    solver: FieldSolver,
    transport: TransportEngine,
    hooks: Vec<StepHook>,
    rng: R,
    state: SimulatorState,
    steps: u64,
    injections: u64,
    manual_placements: u64,
}

impl Simulator<StdRng> {
    /// Create a simulator seeded from the operating system
    #[must_use]
    pub fn new(grid: ChargeGrid, mu: f32, friction: f32) -> Self {
        Self::with_rng(grid, mu, friction, StdRng::from_os_rng())
    }

    /// Create a simulator with a reproducible random sequence
    #[must_use]
    pub fn seeded(grid: ChargeGrid, mu: f32, friction: f32, seed: u64) -> Self {
        Self::with_rng(grid, mu, friction, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Simulator<R> {
    /// Create a simulator drawing from `rng`
    ///
    /// The field is computed immediately so it is valid before the first tick.
    pub fn with_rng(grid: ChargeGrid, mu: f32, friction: f32, rng: R) -> Self {
        info!(
            "Creating charge simulation: {}x{} grid, mu={}, friction={}",
            grid.rows(),
            grid.cols(),
            mu,
            friction
        );
        let mut solver = FieldSolver::new(&grid, DEFAULT_EPSILON);
        solver.recompute(&grid);
        Self {
            grid,
            solver,
            transport: TransportEngine::new(mu, friction),
            hooks: Vec::new(),
            rng,
            state: SimulatorState::Idle,
            steps: 0,
            injections: 0,
            manual_placements: 0,
        }
    }

    /// Replace the solver permittivity and recompute the field
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.solver = FieldSolver::new(&self.grid, epsilon);
        self.solver.recompute(&self.grid);
        self
    }

    /// Register a hook called after every tick with the selected array
    pub fn attach_hook<F>(&mut self, hook: F, target: HookTarget)
    where
        F: FnMut(StepView<'_>, usize) + 'static,
    {
        self.hooks.push(StepHook {
            target,
            callback: Box::new(hook),
        });
    }

    /// Number of registered hooks
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Run one tick
    ///
    /// A uniform draw below `charge_threshold` injects one unit of charge at a
    /// random cell after transport. Hooks see the grid after injection, or the
    /// field that drove this tick's transport.
    ///
    /// # Arguments
    ///
    /// * `step_index` - Index passed through to the hooks
    /// * `charge_threshold` - Injection probability, 0 never and 1 always
    pub fn run_step(&mut self, step_index: usize, charge_threshold: f32) {
        self.state = SimulatorState::Running;

        let field = self.solver.recompute(&self.grid);
        self.transport.advance(&mut self.grid, field);

        let injected = self.rng.next_unit() < charge_threshold;
        if injected {
            self.grid.place_charge(&mut self.rng);
            self.injections += 1;
        }
        self.steps += 1;

        debug!(
            "Step {}: total charge {:.4}, injected={}",
            step_index,
            self.grid.total_charge(),
            injected
        );

        for hook in &mut self.hooks {
            let view = match hook.target {
                HookTarget::Charge => StepView::Charge(&self.grid),
                HookTarget::Field => StepView::Field(self.solver.field()),
            };
            (hook.callback)(view, step_index);
        }
    }

    /// Run `steps` ticks with indices `0..steps`
    pub fn run(&mut self, steps: usize, charge_threshold: f32) {
        for step_index in 0..steps {
            self.run_step(step_index, charge_threshold);
        }
    }

    /// Place one unit of charge at a random cell between ticks
    ///
    /// The field is not refreshed until the next tick.
    pub fn place_charge(&mut self) -> (usize, usize) {
        self.manual_placements += 1;
        self.grid.place_charge(&mut self.rng)
    }

    /// Zero the grid and counters and return to [`SimulatorState::Idle`]
    pub fn reset(&mut self) {
        info!("Resetting charge simulation");
        self.grid.clear();
        self.solver.recompute(&self.grid);
        self.state = SimulatorState::Idle;
        self.steps = 0;
        self.injections = 0;
        self.manual_placements = 0;
    }

    /// Charge grid
    #[must_use]
    pub fn grid(&self) -> &ChargeGrid {
        &self.grid
    }

    /// Mutable charge grid; the field is refreshed on the next tick
    pub fn grid_mut(&mut self) -> &mut ChargeGrid {
        &mut self.grid
    }

    /// Field from the most recent solve
    #[must_use]
    pub fn field(&self) -> &FieldData {
        self.solver.field()
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SimulatorState {
        self.state
    }

    /// Mobility
    #[must_use]
    pub fn mu(&self) -> f32 {
        self.transport.mu()
    }

    /// Friction coefficient
    #[must_use]
    pub fn friction(&self) -> f32 {
        self.transport.friction()
    }

    /// Solver permittivity
    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.solver.epsilon()
    }

    /// Counters and charge summary
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        let (min_charge, max_charge) = self.grid.field().min_max().unwrap_or((0.0, 0.0));
        SimulationStats {
            steps: self.steps,
            injections: self.injections,
            manual_placements: self.manual_placements,
            total_charge: self.grid.total_charge(),
            min_charge,
            max_charge,
        }
    }
}

impl<R: RandomSource> std::fmt::Debug for Simulator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("state", &self.state)
            .field("steps", &self.steps)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays fixed draws; indices are taken modulo the bound
    struct ScriptedSource {
        units: Vec<f32>,
        indices: Vec<usize>,
        unit_pos: usize,
        index_pos: usize,
    }

    impl ScriptedSource {
        fn new(units: Vec<f32>, indices: Vec<usize>) -> Self {
            Self {
                units,
                indices,
                unit_pos: 0,
                index_pos: 0,
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_unit(&mut self) -> f32 {
            let u = self.units[self.unit_pos % self.units.len()];
            self.unit_pos += 1;
            u
        }

        fn next_index(&mut self, bound: usize) -> usize {
            let i = self.indices[self.index_pos % self.indices.len()];
            self.index_pos += 1;
            i % bound
        }
    }

    fn center_charge_grid() -> ChargeGrid {
        let mut grid = ChargeGrid::new(3, 3).unwrap();
        grid.set(1, 1, 1.0);
        grid
    }

    #[test]
    fn test_field_valid_before_first_tick() {
        let sim = Simulator::seeded(center_charge_grid(), 0.5, 0.01, 1);
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert!(sim.field().get(1, 1) < 0.0);
        assert!(sim.field().get(0, 1) > 0.0);
    }

    #[test]
    fn test_injection_gated_by_threshold() {
        let rng = ScriptedSource::new(vec![0.3, 0.7], vec![2, 0]);
        let mut sim = Simulator::with_rng(ChargeGrid::new(3, 3).unwrap(), 0.5, 0.01, rng);

        // 0.3 < 0.5: injects at (2, 0)
        sim.run_step(0, 0.5);
        assert_eq!(sim.grid().get(2, 0), 1.0);
        assert_eq!(sim.stats().injections, 1);

        // 0.7 >= 0.5: no injection
        let before = sim.grid().total_charge();
        sim.run_step(1, 0.5);
        assert_eq!(sim.stats().injections, 1);
        assert!(sim.grid().total_charge() <= before + 1e-6);
        assert_eq!(sim.state(), SimulatorState::Running);
    }

    #[test]
    fn test_zero_threshold_never_injects() {
        let rng = ScriptedSource::new(vec![0.0], vec![0]);
        let mut sim = Simulator::with_rng(ChargeGrid::new(4, 4).unwrap(), 0.5, 0.01, rng);
        sim.run(20, 0.0);
        assert_eq!(sim.stats().injections, 0);
        assert_eq!(sim.grid().total_charge(), 0.0);
    }

    #[test]
    fn test_hooks_fire_in_order_with_targets() {
        let log: Rc<RefCell<Vec<(HookTarget, usize, usize)>>> = Rc::default();
        let mut sim = Simulator::seeded(center_charge_grid(), 0.5, 0.01, 5);

        let sink = Rc::clone(&log);
        sim.attach_hook(
            move |view, step| sink.borrow_mut().push((view.target(), step, view.values().len())),
            HookTarget::Field,
        );
        let sink = Rc::clone(&log);
        sim.attach_hook(
            move |view, step| sink.borrow_mut().push((view.target(), step, view.values().len())),
            HookTarget::Charge,
        );
        assert_eq!(sim.hook_count(), 2);

        sim.run_step(7, 0.0);
        sim.run_step(8, 0.0);

        assert_eq!(
            *log.borrow(),
            vec![
                (HookTarget::Field, 7, 9),
                (HookTarget::Charge, 7, 9),
                (HookTarget::Field, 8, 9),
                (HookTarget::Charge, 8, 9),
            ]
        );
    }

    #[test]
    fn test_charge_hook_sees_committed_grid() {
        let seen: Rc<RefCell<Vec<f32>>> = Rc::default();
        let mut sim = Simulator::seeded(center_charge_grid(), 0.5, 0.01, 2);
        let sink = Rc::clone(&seen);
        sim.attach_hook(
            move |view, _| *sink.borrow_mut() = view.values().to_vec(),
            HookTarget::Charge,
        );
        sim.run_step(0, 0.0);
        assert_eq!(seen.borrow().as_slice(), sim.grid().cells());
    }

    #[test]
    fn test_field_hook_sees_tick_field() {
        let seen: Rc<RefCell<Vec<f32>>> = Rc::default();
        let grid = center_charge_grid();
        let mut expected = FieldSolver::new(&grid, DEFAULT_EPSILON);
        let expected = expected.recompute(&grid).clone();

        let mut sim = Simulator::seeded(grid, 0.5, 0.01, 2);
        let sink = Rc::clone(&seen);
        sim.attach_hook(
            move |view, _| *sink.borrow_mut() = view.values().to_vec(),
            HookTarget::Field,
        );
        sim.run_step(0, 0.0);
        assert_eq!(seen.borrow().as_slice(), expected.as_slice());
    }

    #[test]
    fn test_manual_placement_counted_separately() {
        let rng = ScriptedSource::new(vec![0.9], vec![1, 2]);
        let mut sim = Simulator::with_rng(ChargeGrid::new(3, 3).unwrap(), 0.5, 0.01, rng);
        assert_eq!(sim.place_charge(), (1, 2));
        let stats = sim.stats();
        assert_eq!(stats.manual_placements, 1);
        assert_eq!(stats.injections, 0);
        assert_eq!(stats.max_charge, 1.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut sim = Simulator::seeded(center_charge_grid(), 0.5, 0.01, 3);
        sim.run(5, 1.0);
        sim.reset();
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert_eq!(sim.stats().steps, 0);
        assert!(sim.grid().cells().iter().all(|&v| v == 0.0));
        assert!(sim.field().as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_grid_edits_take_effect_next_tick() {
        let mut sim = Simulator::seeded(ChargeGrid::new(3, 3).unwrap(), 0.5, 0.01, 4);
        sim.grid_mut().set(1, 1, 1.0);
        assert_eq!(sim.grid().get(1, 1), 1.0);
        assert_eq!(sim.field().get(1, 1), 0.0);

        sim.run_step(0, 0.0);
        assert!(sim.field().get(1, 1) < 0.0);
        assert!(sim.grid().get(1, 1) > 1.0);
    }

    #[test]
    fn test_with_epsilon_rebuilds_field() {
        let sim = Simulator::seeded(center_charge_grid(), 0.5, 0.01, 0).with_epsilon(1.0);
        assert_eq!(sim.epsilon(), 1.0);
        assert_relative_eq!(sim.field().get(0, 1), 1.0 / 8.0, epsilon = 1e-7);
    }
}
