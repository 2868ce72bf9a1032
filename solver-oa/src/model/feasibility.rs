//! Integer feasibility checks.

/// Checks integrality of a subset of columns.
#[derive(Debug, Clone)]
pub struct FeasibilityChecker {
    /// Indices of integer variables.
    integer_vars: Vec<usize>,

    /// Integer feasibility tolerance.
    tolerance: f64,
}

impl FeasibilityChecker {
    /// Create a checker for the given integer columns.
    pub fn new(integer_vars: Vec<usize>, tolerance: f64) -> Self {
        Self {
            integer_vars,
            tolerance,
        }
    }

    /// Integer columns checked.
    pub fn integer_vars(&self) -> &[usize] {
        &self.integer_vars
    }

    /// Tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Check if a solution is integer-feasible within tolerance.
    pub fn is_integer_feasible(&self, x: &[f64]) -> bool {
        is_integer_feasible(x, &self.integer_vars, self.tolerance)
    }

    /// Get fractional integer variables as (var_index, fractionality).
    pub fn fractional_indices(&self, x: &[f64]) -> Vec<(usize, f64)> {
        self.integer_vars
            .iter()
            .filter_map(|&i| {
                let frac = fractionality(x[i]);
                (frac > self.tolerance).then_some((i, frac))
            })
            .collect()
    }
}

/// Check that every listed column of `x` is within `tol` of an integer.
pub fn is_integer_feasible(x: &[f64], integer_vars: &[usize], tol: f64) -> bool {
    integer_vars.iter().all(|&i| fractionality(x[i]) <= tol)
}

/// Distance of a value to the nearest integer.
pub fn fractionality(val: f64) -> f64 {
    (val - val.round()).abs()
}
