//! Linear cut representation.

use sprs::CsVec;

use crate::settings::CutScope;

/// Source of a cut (for tracking and debugging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSource {
    /// Linearization of a nonlinear constraint row.
    Constraint {
        /// Row index in the NLP.
        row: usize,
    },

    /// Linearization of the objective against its epigraph column.
    Objective,

    /// Row supplied by the caller.
    User,
}

/// A linear row: lower <= a^T x <= upper.
#[derive(Debug, Clone)]
pub struct LinearCut {
    /// Sparse coefficient vector.
    pub coefs: CsVec<f64>,

    /// Lower bound (may be -inf).
    pub lower: f64,

    /// Upper bound (may be +inf).
    pub upper: f64,

    /// Validity scope.
    pub scope: CutScope,

    /// Source of this cut.
    pub source: CutSource,
}

impl LinearCut {
    /// Create a globally valid cut.
    pub fn new(coefs: CsVec<f64>, lower: f64, upper: f64, source: CutSource) -> Self {
        Self {
            coefs,
            lower,
            upper,
            scope: CutScope::Global,
            source,
        }
    }

    /// Create a cut `a^T x <= rhs` from dense coefficients, dropping zeros.
    pub fn from_dense(coefs: &[f64], rhs: f64, source: CutSource) -> Self {
        let (indices, data): (Vec<usize>, Vec<f64>) = coefs
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0.0)
            .map(|(i, &c)| (i, c))
            .unzip();
        Self::new(
            CsVec::new(coefs.len(), indices, data),
            f64::NEG_INFINITY,
            rhs,
            source,
        )
    }

    /// Set the validity scope.
    pub fn with_scope(mut self, scope: CutScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns true if the cut is valid at every node.
    pub fn is_global(&self) -> bool {
        self.scope.is_global()
    }

    /// Row activity a^T x. Coefficients beyond `x.len()` are ignored.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.coefs
            .iter()
            .filter(|(i, _)| *i < x.len())
            .map(|(i, a)| a * x[i])
            .sum()
    }

    /// Compute violation: positive means `x` lies outside [lower, upper].
    pub fn violation(&self, x: &[f64]) -> f64 {
        let act = self.activity(x);
        (act - self.upper).max(self.lower - act)
    }

    /// Check if cut is violated by more than tolerance.
    pub fn is_violated(&self, x: &[f64], tol: f64) -> bool {
        self.violation(x) > tol
    }

    /// Check if cut has valid coefficients (not all zeros, finite) and at
    /// least one finite bound.
    pub fn is_valid(&self) -> bool {
        let has_nonzero = self.coefs.data().iter().any(|c| c.abs() > 1e-12);
        let all_finite = self.coefs.data().iter().all(|c| c.is_finite());
        let bounded = self.lower.is_finite() || self.upper.is_finite();
        has_nonzero && all_finite && bounded
    }
}
