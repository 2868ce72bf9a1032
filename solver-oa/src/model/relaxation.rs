//! Linear relaxation (LP/MILP) solver interface.

use super::{ColumnBounds, WarmStart};
use crate::cuts::LinearCut;
use crate::search::InterruptHandle;
use crate::settings::SearchStrategy;

/// Status of a relaxation solve or branch-and-bound run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationStatus {
    /// Optimal solution found (proven).
    Optimal,

    /// Problem is infeasible, or every solution is above the cutoff (proven).
    Infeasible,

    /// Problem is unbounded.
    Unbounded,

    /// Node limit reached.
    NodeLimit,

    /// Time limit reached.
    TimeLimit,

    /// Stopped through the interrupt handle.
    Interrupted,

    /// Numerical difficulties.
    NumericalError,
}

impl RelaxationStatus {
    /// Returns true if the result is proven (optimal or infeasible).
    pub fn is_proven(self) -> bool {
        matches!(self, RelaxationStatus::Optimal | RelaxationStatus::Infeasible)
    }
}

/// What a relaxation solver can do for a local search.
///
/// Queried once per solver object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverCapability {
    /// Native branch-and-bound with node and time limits.
    BranchAndBound,

    /// Continuous solves only.
    LinearOnly,

    /// Neither; local search is not possible.
    Unsupported,
}

/// Hard limits for a delegated branch-and-bound.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Objective cutoff.
    pub cutoff: f64,

    /// Maximum nodes.
    pub max_nodes: u64,

    /// Maximum seconds.
    pub max_time: f64,

    /// Sub-solver log level.
    pub log_level: u32,

    /// Search strategy.
    pub strategy: SearchStrategy,

    /// Handle the sub-solver polls to honour external interrupts.
    pub interrupt: InterruptHandle,
}

/// Trait for relaxation solvers (LP/MILP).
///
/// The relaxation holds the master problem of the decomposition: the
/// problem's linear rows plus the linearization cuts installed so far.
pub trait RelaxationSolver: ColumnBounds {
    /// What this solver can do for a local search.
    fn capability(&self) -> SolverCapability;

    /// Number of rows.
    fn num_rows(&self) -> usize;

    /// Append rows.
    fn add_rows(&mut self, rows: &[LinearCut]);

    /// Delete rows by index.
    fn delete_rows(&mut self, rows: &[usize]);

    /// Current warm start.
    fn warm_start(&self) -> WarmStart;

    /// Install a warm start. Returns false if the solver rejects it.
    fn set_warm_start(&mut self, warm: &WarmStart) -> bool;

    /// Objective cutoff (dual objective limit).
    fn cutoff(&self) -> f64;

    /// Set the objective cutoff.
    fn set_cutoff(&mut self, cutoff: f64);

    /// Re-solve the continuous relaxation from the current warm start.
    fn resolve(&mut self) -> RelaxationStatus;

    /// Current primal solution (length `num_cols`).
    fn col_solution(&self) -> &[f64];

    /// Objective value of the current solution.
    fn obj_value(&self) -> f64;

    /// Run branch-and-bound under the given limits.
    ///
    /// Only called when `capability()` is `BranchAndBound`.
    fn branch_and_bound(&mut self, limits: &SearchLimits) -> RelaxationStatus;

    /// Best proven dual bound of the last branch-and-bound.
    fn best_bound(&self) -> f64;

    /// Number of integer solutions found by the last branch-and-bound.
    fn solution_count(&self) -> usize;

    /// Best integer solution of the last branch-and-bound.
    fn best_solution(&self) -> Option<&[f64]>;

    /// Nodes explored by the last branch-and-bound.
    fn node_count(&self) -> u64;

    /// Simplex iterations of the last solve.
    fn iteration_count(&self) -> u64;
}
