//! Reporting channel towards the enclosing branch-and-bound.

/// Out-of-band slot through which the driver reports incumbents and bounds.
///
/// The driver receives it as `Option<&mut dyn AuxiliaryChannel>`; `None`
/// makes the driver pass fractional points through untouched, since any
/// solution it found could not be reported.
pub trait AuxiliaryChannel {
    /// Report a feasible solution and its objective value.
    fn report_incumbent(&mut self, x: &[f64], obj: f64);

    /// Report a valid dual bound for the current node.
    fn report_dual_bound(&mut self, bound: f64);
}

/// Tracks the best known feasible solution (incumbent) and dual bound.
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best solution (if any).
    pub solution: Option<Vec<f64>>,

    /// Objective value of incumbent (primal bound).
    /// Initialized to +inf for minimization.
    pub obj_val: f64,

    /// Number of times incumbent was updated.
    pub update_count: u64,

    /// Best dual bound reported (-inf if none).
    pub dual_bound: f64,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new() -> Self {
        Self {
            solution: None,
            obj_val: f64::INFINITY,
            update_count: 0,
            dual_bound: f64::NEG_INFINITY,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.solution.is_some()
    }

    /// Try to update incumbent with a new solution.
    ///
    /// Returns true if the incumbent was improved.
    pub fn update(&mut self, x: &[f64], obj: f64) -> bool {
        // For minimization, accept if strictly better
        if obj < self.obj_val - 1e-9 {
            self.solution = Some(x.to_vec());
            self.obj_val = obj;
            self.update_count += 1;
            true
        } else {
            false
        }
    }

    /// Relative gap between incumbent and dual bound.
    pub fn gap(&self) -> f64 {
        if self.obj_val.is_infinite() || self.dual_bound.is_infinite() {
            return f64::INFINITY;
        }
        let denom = self.obj_val.abs().max(1e-10);
        (self.obj_val - self.dual_bound).abs() / denom
    }
}

impl AuxiliaryChannel for IncumbentTracker {
    fn report_incumbent(&mut self, x: &[f64], obj: f64) {
        self.update(x, obj);
    }

    fn report_dual_bound(&mut self, bound: f64) {
        self.dual_bound = self.dual_bound.max(bound);
    }
}
