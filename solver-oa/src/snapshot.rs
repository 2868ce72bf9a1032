//! Save and restore of solver state around a mutation.
//!
//! The driver adds cuts, fixes bounds and tightens the cutoff of models it
//! does not own. A snapshot records the pieces it is about to touch and puts
//! them back afterwards.

use crate::cuts::LinearCut;
use crate::error::{OaError, OaResult};
use crate::model::{BasisStatus, ColumnBounds, RelaxationSolver, WarmStart};

/// Which parts of a relaxation to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotFields {
    /// Row count (rows added later are deleted on restore).
    pub rows: bool,

    /// Warm-start basis.
    pub basis: bool,

    /// Column bounds.
    pub bounds: bool,

    /// Objective cutoff.
    pub cutoff: bool,
}

impl SnapshotFields {
    /// Capture everything.
    pub const ALL: Self = Self {
        rows: true,
        basis: true,
        bounds: true,
        cutoff: true,
    };

    /// Capture nothing.
    pub const NONE: Self = Self {
        rows: false,
        basis: false,
        bounds: false,
        cutoff: false,
    };

    /// Add the row count.
    pub fn with_rows(mut self) -> Self {
        self.rows = true;
        self
    }

    /// Add the basis.
    pub fn with_basis(mut self) -> Self {
        self.basis = true;
        self
    }

    /// Add the column bounds.
    pub fn with_bounds(mut self) -> Self {
        self.bounds = true;
        self
    }

    /// Add the cutoff.
    pub fn with_cutoff(mut self) -> Self {
        self.cutoff = true;
        self
    }
}

/// Copy of all column bounds of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsSnapshot {
    /// Lower bounds.
    pub lower: Vec<f64>,

    /// Upper bounds.
    pub upper: Vec<f64>,
}

impl BoundsSnapshot {
    /// Copy the bounds of `model`.
    pub fn capture<M: ColumnBounds + ?Sized>(model: &M) -> Self {
        Self {
            lower: model.col_lower().to_vec(),
            upper: model.col_upper().to_vec(),
        }
    }

    /// Reapply the copied bounds.
    pub fn restore<M: ColumnBounds + ?Sized>(&self, model: &mut M) {
        model.set_all_col_bounds(&self.lower, &self.upper);
    }
}

/// Point-in-time copy of selected relaxation state.
#[derive(Debug, Clone)]
pub struct SolverSnapshot {
    num_rows: Option<usize>,
    bounds: Option<BoundsSnapshot>,
    cutoff: Option<f64>,
    warm_start: Option<WarmStart>,
}

impl SolverSnapshot {
    /// Record the requested fields of `model`.
    pub fn capture<R: RelaxationSolver + ?Sized>(model: &R, fields: SnapshotFields) -> Self {
        Self {
            num_rows: fields.rows.then(|| model.num_rows()),
            bounds: fields.bounds.then(|| BoundsSnapshot::capture(model)),
            cutoff: fields.cutoff.then(|| model.cutoff()),
            warm_start: fields.basis.then(|| model.warm_start()),
        }
    }

    /// Captured row count.
    pub fn num_rows(&self) -> Option<usize> {
        self.num_rows
    }

    /// Captured bounds.
    pub fn bounds(&self) -> Option<&BoundsSnapshot> {
        self.bounds.as_ref()
    }

    /// Captured cutoff.
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Put the captured state back.
    ///
    /// Rows, bounds and cutoff are restored exactly; the warm start is
    /// reinstalled last. A rejected warm start leaves the model unreliable.
    pub fn restore<R: RelaxationSolver + ?Sized>(&self, model: &mut R) -> OaResult<()> {
        if let Some(n) = self.num_rows {
            let current = model.num_rows();
            if current < n {
                return Err(OaError::RestoreFailure(format!(
                    "model has {} rows, fewer than the {} captured",
                    current, n
                )));
            }
            if current > n {
                let added: Vec<usize> = (n..current).collect();
                model.delete_rows(&added);
            }
        }

        if let Some(bounds) = &self.bounds {
            bounds.restore(model);
        }

        if let Some(cutoff) = self.cutoff {
            model.set_cutoff(cutoff);
        }

        if let Some(warm) = &self.warm_start {
            if !model.set_warm_start(warm) {
                return Err(OaError::RestoreFailure(
                    "warm start rejected at the end of the procedure".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Append cuts to a relaxation, extending its basis with basic slacks.
///
/// The extended basis stays primal feasible for the rows already present,
/// so the next resolve starts from the previous optimum.
pub fn install_cuts<R: RelaxationSolver + ?Sized>(model: &mut R, cuts: &[LinearCut]) -> OaResult<()> {
    if cuts.is_empty() {
        return Ok(());
    }

    let mut basis = model.warm_start().into_basis().ok_or_else(|| {
        OaError::RestoreFailure("relaxation warm start is not a simplex basis".to_string())
    })?;

    let num_rows = model.num_rows();
    basis.resize(num_rows + cuts.len(), model.num_cols());
    for row in num_rows..num_rows + cuts.len() {
        basis.set_row_status(row, BasisStatus::Basic);
    }

    model.add_rows(cuts);

    if !model.set_warm_start(&WarmStart::Basis(basis)) {
        return Err(OaError::RestoreFailure(
            "warm start rejected after cut installation".to_string(),
        ));
    }
    Ok(())
}
