//! Warm-start data exchanged with solvers.

/// Status of a structural or slack variable in a simplex basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisStatus {
    /// Variable is free and nonbasic.
    Free,

    /// Variable is basic.
    Basic,

    /// Variable is nonbasic at its upper bound.
    AtUpper,

    /// Variable is nonbasic at its lower bound.
    AtLower,
}

/// Simplex basis: one status per column and one per row slack.
#[derive(Debug, Clone, PartialEq)]
pub struct Basis {
    /// Column statuses.
    pub col_status: Vec<BasisStatus>,

    /// Row (artificial) statuses.
    pub row_status: Vec<BasisStatus>,
}

impl Basis {
    /// Create a slack basis: all columns at lower bound, all rows basic.
    pub fn slack(num_rows: usize, num_cols: usize) -> Self {
        Self {
            col_status: vec![BasisStatus::AtLower; num_cols],
            row_status: vec![BasisStatus::Basic; num_rows],
        }
    }

    /// Number of rows covered by the basis.
    pub fn num_rows(&self) -> usize {
        self.row_status.len()
    }

    /// Number of columns covered by the basis.
    pub fn num_cols(&self) -> usize {
        self.col_status.len()
    }

    /// Resize the basis; new entries are basic rows and columns at lower bound.
    pub fn resize(&mut self, num_rows: usize, num_cols: usize) {
        self.row_status.resize(num_rows, BasisStatus::Basic);
        self.col_status.resize(num_cols, BasisStatus::AtLower);
    }

    /// Set the status of row slack `row`.
    pub fn set_row_status(&mut self, row: usize, status: BasisStatus) {
        self.row_status[row] = status;
    }

    /// Drop the statuses of the given rows (indices in the current basis).
    pub fn delete_rows(&mut self, rows: &[usize]) {
        let mut keep = vec![true; self.row_status.len()];
        for &r in rows {
            if r < keep.len() {
                keep[r] = false;
            }
        }
        let mut idx = 0;
        self.row_status.retain(|_| {
            let k = keep[idx];
            idx += 1;
            k
        });
    }
}

/// Number of entries in the fixed status vector of an iterate warm start.
pub const ITERATE_STATUS_LEN: usize = 14;

/// Warm start of an iterative (nonlinear) solver: primal and dual iterate
/// plus an integer workspace and a fixed-size status vector.
#[derive(Debug, Clone, PartialEq)]
pub struct IterateWarmStart {
    /// Primal iterate.
    pub primal: Vec<f64>,

    /// Multipliers.
    pub dual: Vec<f64>,

    /// Solver integer workspace.
    pub workspace: Vec<i64>,

    /// Solver status flags.
    pub status: [i64; ITERATE_STATUS_LEN],
}

/// Solver warm start.
#[derive(Debug, Clone, PartialEq)]
pub enum WarmStart {
    /// Simplex basis (LP/MILP solvers).
    Basis(Basis),

    /// Iterate-based warm start (NLP solvers).
    Iterate(IterateWarmStart),
}

impl WarmStart {
    /// Borrow the basis, if this is a basis warm start.
    pub fn as_basis(&self) -> Option<&Basis> {
        match self {
            WarmStart::Basis(b) => Some(b),
            WarmStart::Iterate(_) => None,
        }
    }

    /// Take the basis, if this is a basis warm start.
    pub fn into_basis(self) -> Option<Basis> {
        match self {
            WarmStart::Basis(b) => Some(b),
            WarmStart::Iterate(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_adds_basic_rows() {
        let mut basis = Basis::slack(2, 3);
        basis.set_row_status(0, BasisStatus::AtUpper);
        basis.resize(4, 3);

        assert_eq!(basis.num_rows(), 4);
        assert_eq!(basis.row_status[0], BasisStatus::AtUpper);
        assert_eq!(basis.row_status[3], BasisStatus::Basic);
    }

    #[test]
    fn test_delete_rows() {
        let mut basis = Basis::slack(4, 1);
        basis.set_row_status(1, BasisStatus::AtLower);
        basis.set_row_status(3, BasisStatus::AtUpper);
        basis.delete_rows(&[0, 2]);

        assert_eq!(basis.row_status, vec![BasisStatus::AtLower, BasisStatus::AtUpper]);
    }

    #[test]
    fn test_iterate_is_not_a_basis() {
        let ws = WarmStart::Iterate(IterateWarmStart {
            primal: vec![1.0],
            dual: vec![],
            workspace: vec![],
            status: [0; ITERATE_STATUS_LEN],
        });
        assert!(ws.as_basis().is_none());
        assert!(ws.into_basis().is_none());
    }
}
