//! Nonlinear relaxation solver interface.

use sprs::CsMat;

use super::ColumnBounds;
use crate::error::OaResult;

/// Status of an NLP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlpStatus {
    /// Locally optimal solution found.
    Optimal,

    /// Problem proven (locally) infeasible.
    Infeasible,

    /// Solver gave up.
    Abandoned,

    /// Iteration limit reached.
    IterationLimit,
}

impl NlpStatus {
    /// Returns true if the solution may serve as a linearization point.
    pub fn is_usable(self) -> bool {
        matches!(self, NlpStatus::Optimal | NlpStatus::Infeasible)
    }
}

/// Trait for NLP solvers.
///
/// The model is `min f(x) s.t. gl <= g(x) <= gu, lb <= x <= ub`. Rows that
/// are linear are already part of the relaxation; only rows reported by
/// `is_nonlinear_row` are linearized.
///
/// Evaluation callbacks return `OaError::ModelEvaluation` when the model
/// cannot be evaluated.
pub trait NlpSolver: ColumnBounds {
    /// Re-solve, warm-started from the previous solution.
    fn resolve(&mut self) -> OaResult<NlpStatus>;

    /// Objective value of the last solve.
    fn obj_value(&self) -> f64;

    /// Iterations of the last solve.
    fn iteration_count(&self) -> u64;

    /// Solution of the last solve (length `num_cols`).
    fn col_solution(&self) -> &[f64];

    /// Number of constraint rows.
    fn num_rows(&self) -> usize;

    /// Row lower bounds `gl`.
    fn row_lower(&self) -> &[f64];

    /// Row upper bounds `gu`.
    fn row_upper(&self) -> &[f64];

    /// Whether row `row` is nonlinear.
    fn is_nonlinear_row(&self, row: usize) -> bool;

    /// Column of the relaxation holding the objective epigraph variable, if
    /// the objective is nonlinear and modeled as `f(x) <= eta`.
    fn objective_column(&self) -> Option<usize> {
        None
    }

    /// Evaluate `g(x)`.
    fn eval_constraints(&self, x: &[f64]) -> OaResult<Vec<f64>>;

    /// Evaluate the constraint Jacobian at `x` (CSR, `num_rows x num_cols`).
    fn eval_jacobian(&self, x: &[f64]) -> OaResult<CsMat<f64>>;

    /// Evaluate `f(x)`.
    fn eval_objective(&self, x: &[f64]) -> OaResult<f64>;

    /// Evaluate `grad f(x)` (dense, length `num_cols`).
    fn eval_gradient(&self, x: &[f64]) -> OaResult<Vec<f64>>;
}
