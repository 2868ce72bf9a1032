//! Column access shared by the linear and nonlinear solver interfaces.

/// Column bounds and integrality of a solver model.
pub trait ColumnBounds {
    /// Number of columns.
    fn num_cols(&self) -> usize;

    /// Column lower bounds (length `num_cols`).
    fn col_lower(&self) -> &[f64];

    /// Column upper bounds (length `num_cols`).
    fn col_upper(&self) -> &[f64];

    /// Set the bounds of one column.
    fn set_col_bounds(&mut self, col: usize, lower: f64, upper: f64);

    /// Whether the column is declared integer.
    fn is_integer(&self, col: usize) -> bool;

    /// Set the bounds of every column.
    fn set_all_col_bounds(&mut self, lower: &[f64], upper: &[f64]) {
        for (col, (&lb, &ub)) in lower.iter().zip(upper).enumerate() {
            self.set_col_bounds(col, lb, ub);
        }
    }

    /// Indices of the integer columns.
    fn integer_columns(&self) -> Vec<usize> {
        (0..self.num_cols()).filter(|&c| self.is_integer(c)).collect()
    }
}
