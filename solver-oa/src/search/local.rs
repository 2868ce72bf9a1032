//! Bounded local search on the relaxation.
//!
//! A local search is a node/time-limited branch-and-bound run on a fresh
//! copy of the current relaxation (cuts included). It looks for an
//! integer-feasible point to linearize at, and returns the best proven
//! bound of the sub-problem even when stopped early.

use std::time::Instant;

use super::InterruptHandle;
use crate::error::{OaError, OaResult};
use crate::model::{
    is_integer_feasible, RelaxationSolver, RelaxationStatus, SearchLimits,
    SolverCapability,
};
use crate::settings::SearchStrategy;

/// Budget of one local search.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearchBudget {
    /// Objective cutoff.
    pub cutoff: f64,

    /// Sub-solver log level.
    pub log_level: u32,

    /// Maximum seconds.
    pub max_time: f64,

    /// Maximum branch-and-bound nodes.
    pub max_nodes: u64,
}

/// Outcome of one local search.
#[derive(Debug, Clone)]
pub struct LocalSearchResult {
    /// Best integer-feasible point found, if any.
    pub point: Option<Vec<f64>>,

    /// Best proven dual bound at termination.
    pub dual_bound: f64,

    /// Nodes explored.
    pub node_count: u64,

    /// Simplex iterations.
    pub iteration_count: u64,

    /// Whether the sub-problem was solved to proven optimality or infeasibility.
    pub proven: bool,
}

impl LocalSearchResult {
    /// A result without point or information.
    pub fn empty() -> Self {
        Self {
            point: None,
            dual_bound: f64::NEG_INFINITY,
            node_count: 0,
            iteration_count: 0,
            proven: false,
        }
    }

    /// Returns true if an integer-feasible point was found.
    pub fn has_point(&self) -> bool {
        self.point.is_some()
    }
}

/// Runs bounded sub-searches with a relaxation solver.
///
/// The solver capability is decided once, at construction.
#[derive(Debug, Clone)]
pub struct BoundedLocalSearch {
    /// What the relaxation solver supports.
    capability: SolverCapability,

    /// Strategy handed to the sub-solver.
    strategy: SearchStrategy,

    /// Integer tolerance for the continuous fallback.
    int_feas_tol: f64,

    /// Number of runs performed.
    runs: usize,
}

impl BoundedLocalSearch {
    /// Create a local search for relaxations like `model`.
    pub fn new<R: RelaxationSolver + ?Sized>(
        model: &R,
        strategy: SearchStrategy,
        int_feas_tol: f64,
    ) -> Self {
        Self {
            capability: model.capability(),
            strategy,
            int_feas_tol,
            runs: 0,
        }
    }

    /// Capability decided at construction.
    pub fn capability(&self) -> SolverCapability {
        self.capability
    }

    /// Number of runs performed.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Run one local search on a copy of `model`.
    ///
    /// The copy is dropped before returning, so `model` is never mutated.
    /// `interrupt` is attached for the duration of the run.
    pub fn run<R: RelaxationSolver + Clone>(
        &mut self,
        model: &R,
        budget: &LocalSearchBudget,
        interrupt: &InterruptHandle,
    ) -> OaResult<LocalSearchResult> {
        if self.capability == SolverCapability::Unsupported {
            return Err(OaError::Configuration(
                "local search needs a relaxation solver with branch-and-bound or LP support"
                    .to_string(),
            ));
        }

        if budget.max_nodes == 0 {
            return Ok(LocalSearchResult::empty());
        }

        self.runs += 1;
        let start = Instant::now();
        let _attached = interrupt.attach();
        let mut sub = model.clone();

        let result = match self.capability {
            SolverCapability::BranchAndBound => self.branch_and_bound(&mut sub, budget, interrupt),
            _ => self.continuous(&mut sub, budget),
        };

        log::debug!(
            "Local search {}: {} nodes, {} iterations, bound {:.6e}, {} ({:.2}s)",
            self.runs,
            result.node_count,
            result.iteration_count,
            result.dual_bound,
            if result.has_point() { "solution found" } else { "no solution" },
            start.elapsed().as_secs_f64(),
        );

        Ok(result)
    }

    fn branch_and_bound<R: RelaxationSolver>(
        &self,
        sub: &mut R,
        budget: &LocalSearchBudget,
        interrupt: &InterruptHandle,
    ) -> LocalSearchResult {
        sub.resolve();

        let limits = SearchLimits {
            cutoff: budget.cutoff,
            max_nodes: budget.max_nodes,
            max_time: budget.max_time,
            log_level: budget.log_level,
            strategy: self.strategy.clone(),
            interrupt: interrupt.clone(),
        };
        let status = sub.branch_and_bound(&limits);

        let point = if sub.solution_count() > 0 {
            sub.best_solution().map(|x| x.to_vec())
        } else {
            None
        };

        LocalSearchResult {
            point,
            dual_bound: sub.best_bound(),
            node_count: sub.node_count(),
            iteration_count: sub.iteration_count(),
            proven: status.is_proven(),
        }
    }

    /// Single continuous solve followed by an integrality check.
    fn continuous<R: RelaxationSolver>(
        &self,
        sub: &mut R,
        budget: &LocalSearchBudget,
    ) -> LocalSearchResult {
        sub.set_cutoff(budget.cutoff);
        let status = sub.resolve();

        let mut result = LocalSearchResult {
            iteration_count: sub.iteration_count(),
            ..LocalSearchResult::empty()
        };

        match status {
            RelaxationStatus::Optimal => {
                let x = sub.col_solution();
                let integer_vars = sub.integer_columns();
                result.dual_bound = sub.obj_value();
                if is_integer_feasible(x, &integer_vars, self.int_feas_tol) {
                    result.point = Some(x.to_vec());
                    result.proven = true;
                }
            }
            RelaxationStatus::Infeasible => {
                result.dual_bound = f64::INFINITY;
                result.proven = true;
            }
            _ => {}
        }

        result
    }
}
