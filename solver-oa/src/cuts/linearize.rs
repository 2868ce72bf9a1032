//! First-order outer approximation of nonlinear rows and objective.
//!
//! For a function g and a point x0, the Taylor expansion
//!
//!   g(x) ≈ g(x0) + ∇g(x0)^T (x - x0) = ∇g(x0)^T x + c,   c = g(x0) - ∇g(x0)^T x0
//!
//! is an outer approximation of {x : g(x) <= gu} when g is convex, giving
//! the cut ∇g(x0)^T x <= gu - c (and symmetrically for a lower bound).

use sprs::CsVec;

use super::{CutSource, LinearCut};
use crate::error::{OaError, OaResult};
use crate::model::NlpSolver;
use crate::settings::CutScope;

/// First-order expansion of a scalar function at a point.
#[derive(Debug, Clone)]
pub struct TaylorExpansion {
    /// Gradient at the expansion point.
    pub gradient: CsVec<f64>,

    /// Function value at the expansion point.
    pub value: f64,

    /// Constant term g(x0) - ∇g(x0)^T x0.
    pub constant: f64,
}

impl TaylorExpansion {
    /// Build the expansion from a gradient and value at `x0`.
    pub fn new(gradient: CsVec<f64>, value: f64, x0: &[f64]) -> Self {
        let slope: f64 = gradient
            .iter()
            .filter(|(i, _)| *i < x0.len())
            .map(|(i, g)| g * x0[i])
            .sum();
        Self {
            gradient,
            value,
            constant: value - slope,
        }
    }

    /// Cut for `lower <= g(x) <= upper`, or `None` if both bounds are infinite.
    pub fn cut(&self, lower: f64, upper: f64, source: CutSource) -> Option<LinearCut> {
        if !lower.is_finite() && !upper.is_finite() {
            return None;
        }
        let shift = |b: f64| if b.is_finite() { b - self.constant } else { b };
        Some(LinearCut::new(
            self.gradient.clone(),
            shift(lower),
            shift(upper),
            source,
        ))
    }
}

/// Builds outer-approximation cuts from an NLP model.
#[derive(Debug, Clone)]
pub struct Linearizer {
    /// Scope attached to every cut.
    scope: CutScope,

    /// Violation threshold used when filtering against a point.
    violation_tol: f64,
}

impl Linearizer {
    /// Create a linearizer.
    pub fn new(scope: CutScope, violation_tol: f64) -> Self {
        Self {
            scope,
            violation_tol,
        }
    }

    /// Expand every nonlinear row of `nlp` at `x0`.
    ///
    /// Returns (row, expansion) pairs in row order.
    pub fn expand_rows<N: NlpSolver + ?Sized>(
        &self,
        nlp: &N,
        x0: &[f64],
    ) -> OaResult<Vec<(usize, TaylorExpansion)>> {
        let values = nlp.eval_constraints(x0)?;
        let jac = nlp.eval_jacobian(x0)?;
        let jac = if jac.is_csr() { jac } else { jac.to_csr() };

        if values.len() != nlp.num_rows() || jac.rows() != nlp.num_rows() {
            return Err(OaError::ModelEvaluation(format!(
                "expected {} constraint rows, got {} values and {} Jacobian rows",
                nlp.num_rows(),
                values.len(),
                jac.rows()
            )));
        }

        let dim = self.cut_dim(nlp);
        let mut rows = Vec::new();
        for row in (0..nlp.num_rows()).filter(|&r| nlp.is_nonlinear_row(r)) {
            let value = values[row];
            if !value.is_finite() {
                return Err(OaError::ModelEvaluation(format!(
                    "constraint {} is not finite at linearization point",
                    row
                )));
            }
            let gradient = match jac.outer_view(row) {
                Some(view) => CsVec::new(dim, view.indices().to_vec(), view.data().to_vec()),
                None => CsVec::empty(dim),
            };
            rows.push((row, TaylorExpansion::new(gradient, value, x0)));
        }
        Ok(rows)
    }

    /// Expand the objective at `x0` against its epigraph column.
    ///
    /// Returns `None` if the model has no epigraph column.
    pub fn expand_objective<N: NlpSolver + ?Sized>(
        &self,
        nlp: &N,
        x0: &[f64],
    ) -> OaResult<Option<TaylorExpansion>> {
        let Some(eta) = nlp.objective_column() else {
            return Ok(None);
        };

        let value = nlp.eval_objective(x0)?;
        let grad = nlp.eval_gradient(x0)?;
        if !value.is_finite() || grad.iter().any(|g| !g.is_finite()) {
            return Err(OaError::ModelEvaluation(
                "objective or gradient not finite at linearization point".to_string(),
            ));
        }

        // f(x0) + ∇f(x0)^T (x - x0) <= eta
        let mut entries: Vec<(usize, f64)> = grad
            .iter()
            .enumerate()
            .filter(|&(i, g)| i != eta && *g != 0.0)
            .map(|(i, &g)| (i, g))
            .collect();
        entries.push((eta, -1.0));
        entries.sort_by_key(|&(i, _)| i);

        let (indices, data): (Vec<usize>, Vec<f64>) = entries.into_iter().unzip();
        let gradient = CsVec::new(self.cut_dim(nlp), indices, data);

        // The expansion is taken of f(x) - eta, whose value at x0 ignores eta.
        let slope: f64 = grad
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != eta)
            .map(|(i, g)| g * x0[i])
            .sum();
        Ok(Some(TaylorExpansion {
            gradient,
            value,
            constant: value - slope,
        }))
    }

    /// Build outer-approximation cuts at `x0`.
    ///
    /// With `cut_point`, only cuts violated at that point are kept.
    pub fn outer_approximation<N: NlpSolver + ?Sized>(
        &self,
        nlp: &N,
        x0: &[f64],
        cut_point: Option<&[f64]>,
    ) -> OaResult<Vec<LinearCut>> {
        let lower = nlp.row_lower();
        let upper = nlp.row_upper();

        let mut cuts: Vec<LinearCut> = self
            .expand_rows(nlp, x0)?
            .into_iter()
            .filter_map(|(row, exp)| exp.cut(lower[row], upper[row], CutSource::Constraint { row }))
            .collect();

        if let Some(exp) = self.expand_objective(nlp, x0)? {
            cuts.extend(exp.cut(f64::NEG_INFINITY, 0.0, CutSource::Objective));
        }

        let cuts = cuts
            .into_iter()
            .map(|c| c.with_scope(self.scope))
            .filter(|c| c.is_valid())
            .filter(|c| match cut_point {
                Some(p) => c.is_violated(p, self.violation_tol),
                None => true,
            })
            .collect();
        Ok(cuts)
    }

    fn cut_dim<N: NlpSolver + ?Sized>(&self, nlp: &N) -> usize {
        match nlp.objective_column() {
            Some(eta) => nlp.num_cols().max(eta + 1),
            None => nlp.num_cols(),
        }
    }
}
