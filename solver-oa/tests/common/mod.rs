//! Scripted solver doubles shared by the integration tests.
//!
//! Problem used throughout:
//!
//! min  -x0 - x1
//! s.t. x0^2 + x1^2 <= 4   (row 0, nonlinear)
//!      x0 * x1     <= 3   (row 1, nonlinear)
//!      0 <= x0 <= 2 integer, 0 <= x1 <= 2

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use solver_oa::model::IterateWarmStart;
use solver_oa::{
    AuxiliaryChannel, Basis, ColumnBounds, LinearCut, NlpSolver, NlpStatus, OaError, OaResult,
    RelaxationSolver, RelaxationStatus, SearchLimits, SolverCapability, WarmStart,
};
use sprs::{CsMat, TriMat};

/// Result handed out by one scripted branch-and-bound call.
#[derive(Debug, Clone)]
pub struct BbOutcome {
    pub point: Option<Vec<f64>>,
    pub bound: f64,
}

/// State shared between a relaxation and all its clones.
#[derive(Debug, Default)]
pub struct RelaxationLog {
    /// Outcomes for successive branch-and-bound calls.
    pub script: VecDeque<BbOutcome>,

    /// Cutoff passed to each branch-and-bound call.
    pub cutoffs: Vec<f64>,

    /// Row count seen by each branch-and-bound call.
    pub rows_seen: Vec<usize>,

    /// Interrupt attachment seen by each branch-and-bound call.
    pub attached: Vec<bool>,
}

impl RelaxationLog {
    pub fn bb_calls(&self) -> usize {
        self.cutoffs.len()
    }
}

#[derive(Debug, Clone)]
pub struct MockRelaxation {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub integer: Vec<bool>,
    pub obj: Vec<f64>,
    pub rows: Vec<LinearCut>,
    pub basis: Basis,
    pub cutoff: f64,
    pub solution: Vec<f64>,
    pub obj_value: f64,
    pub capability: SolverCapability,

    /// Refuse every warm start.
    pub reject_warm_start: bool,

    /// Report an iterate warm start instead of a basis.
    pub iterate_warm_start: bool,

    /// Solutions returned by successive `resolve` calls before falling back
    /// to the box solution.
    pub resolve_script: VecDeque<Vec<f64>>,

    best: Option<Vec<f64>>,
    bound: f64,
    nodes: u64,
    pub log: Rc<RefCell<RelaxationLog>>,
}

impl MockRelaxation {
    pub fn new() -> Self {
        Self {
            lower: vec![0.0, 0.0],
            upper: vec![2.0, 2.0],
            integer: vec![true, false],
            obj: vec![-1.0, -1.0],
            rows: Vec::new(),
            basis: Basis::slack(0, 2),
            cutoff: f64::INFINITY,
            solution: vec![0.0, 0.0],
            obj_value: 0.0,
            capability: SolverCapability::BranchAndBound,
            reject_warm_start: false,
            iterate_warm_start: false,
            resolve_script: VecDeque::new(),
            best: None,
            bound: f64::NEG_INFINITY,
            nodes: 0,
            log: Rc::new(RefCell::new(RelaxationLog::default())),
        }
    }

    pub fn with_capability(mut self, capability: SolverCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Pretend the last solve ended at `x`.
    pub fn with_solution(mut self, x: &[f64]) -> Self {
        self.obj_value = self.objective(x);
        self.solution = x.to_vec();
        self
    }

    /// Queue a branch-and-bound outcome.
    pub fn script_bb(&self, point: Option<&[f64]>, bound: f64) {
        self.log.borrow_mut().script.push_back(BbOutcome {
            point: point.map(|p| p.to_vec()),
            bound,
        });
    }

    pub fn objective(&self, x: &[f64]) -> f64 {
        self.obj.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

impl ColumnBounds for MockRelaxation {
    fn num_cols(&self) -> usize {
        self.lower.len()
    }

    fn col_lower(&self) -> &[f64] {
        &self.lower
    }

    fn col_upper(&self) -> &[f64] {
        &self.upper
    }

    fn set_col_bounds(&mut self, col: usize, lower: f64, upper: f64) {
        self.lower[col] = lower;
        self.upper[col] = upper;
    }

    fn is_integer(&self, col: usize) -> bool {
        self.integer[col]
    }
}

impl RelaxationSolver for MockRelaxation {
    fn capability(&self) -> SolverCapability {
        self.capability
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn add_rows(&mut self, rows: &[LinearCut]) {
        self.rows.extend_from_slice(rows);
        self.basis.resize(self.rows.len(), self.lower.len());
    }

    fn delete_rows(&mut self, rows: &[usize]) {
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep = !rows.contains(&idx);
            idx += 1;
            keep
        });
        self.basis.delete_rows(rows);
    }

    fn warm_start(&self) -> WarmStart {
        if self.iterate_warm_start {
            WarmStart::Iterate(IterateWarmStart {
                primal: self.solution.clone(),
                dual: vec![0.0; self.rows.len()],
                workspace: Vec::new(),
                status: [0; solver_oa::model::ITERATE_STATUS_LEN],
            })
        } else {
            WarmStart::Basis(self.basis.clone())
        }
    }

    fn set_warm_start(&mut self, warm: &WarmStart) -> bool {
        if self.reject_warm_start {
            return false;
        }
        match warm.as_basis() {
            Some(basis) => {
                self.basis = basis.clone();
                true
            }
            None => false,
        }
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn set_cutoff(&mut self, cutoff: f64) {
        self.cutoff = cutoff;
    }

    fn resolve(&mut self) -> RelaxationStatus {
        let x = match self.resolve_script.pop_front() {
            Some(x) => x,
            None => (0..self.lower.len())
                .map(|j| if self.obj[j] >= 0.0 { self.lower[j] } else { self.upper[j] })
                .collect(),
        };
        let obj = self.objective(&x);
        if obj > self.cutoff {
            return RelaxationStatus::Infeasible;
        }
        self.solution = x;
        self.obj_value = obj;
        RelaxationStatus::Optimal
    }

    fn col_solution(&self) -> &[f64] {
        &self.solution
    }

    fn obj_value(&self) -> f64 {
        self.obj_value
    }

    fn branch_and_bound(&mut self, limits: &SearchLimits) -> RelaxationStatus {
        let outcome = {
            let mut log = self.log.borrow_mut();
            log.cutoffs.push(limits.cutoff);
            log.rows_seen.push(self.rows.len());
            log.attached.push(limits.interrupt.is_attached());
            log.script.pop_front()
        };
        self.nodes = 5;

        let Some(outcome) = outcome else {
            self.best = None;
            self.bound = f64::NEG_INFINITY;
            return RelaxationStatus::NodeLimit;
        };

        self.bound = outcome.bound;
        self.best = outcome
            .point
            .filter(|p| self.objective(p) < limits.cutoff);
        if self.best.is_some() {
            RelaxationStatus::Optimal
        } else {
            self.bound = self.bound.max(limits.cutoff);
            RelaxationStatus::Infeasible
        }
    }

    fn best_bound(&self) -> f64 {
        self.bound
    }

    fn solution_count(&self) -> usize {
        usize::from(self.best.is_some())
    }

    fn best_solution(&self) -> Option<&[f64]> {
        self.best.as_deref()
    }

    fn node_count(&self) -> u64 {
        self.nodes
    }

    fn iteration_count(&self) -> u64 {
        3
    }
}

/// Scripted response of one NLP solve.
#[derive(Debug, Clone)]
pub struct NlpResponse {
    pub status: NlpStatus,
    pub solution: Vec<f64>,
    pub obj: f64,
}

#[derive(Debug, Clone)]
pub struct MockNlp {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub row_lower: Vec<f64>,
    pub row_upper: Vec<f64>,
    pub script: VecDeque<NlpResponse>,
    pub solution: Vec<f64>,
    pub obj: f64,

    /// Integer-column bounds seen by each solve.
    pub fixed: Vec<Vec<(f64, f64)>>,

    /// Fail every evaluation.
    pub fail_eval: bool,
}

impl MockNlp {
    pub fn new() -> Self {
        Self {
            lower: vec![0.0, 0.0],
            upper: vec![2.0, 2.0],
            row_lower: vec![f64::NEG_INFINITY, f64::NEG_INFINITY],
            row_upper: vec![4.0, 3.0],
            script: VecDeque::new(),
            solution: vec![0.0, 0.0],
            obj: 0.0,
            fixed: Vec::new(),
            fail_eval: false,
        }
    }

    pub fn respond(mut self, status: NlpStatus, solution: &[f64], obj: f64) -> Self {
        self.script.push_back(NlpResponse {
            status,
            solution: solution.to_vec(),
            obj,
        });
        self
    }

    fn check_eval(&self) -> OaResult<()> {
        if self.fail_eval {
            Err(OaError::ModelEvaluation("evaluation failed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ColumnBounds for MockNlp {
    fn num_cols(&self) -> usize {
        self.lower.len()
    }

    fn col_lower(&self) -> &[f64] {
        &self.lower
    }

    fn col_upper(&self) -> &[f64] {
        &self.upper
    }

    fn set_col_bounds(&mut self, col: usize, lower: f64, upper: f64) {
        self.lower[col] = lower;
        self.upper[col] = upper;
    }

    fn is_integer(&self, col: usize) -> bool {
        col == 0
    }
}

impl NlpSolver for MockNlp {
    fn resolve(&mut self) -> OaResult<NlpStatus> {
        self.fixed.push(vec![(self.lower[0], self.upper[0])]);
        match self.script.pop_front() {
            Some(response) => {
                self.solution = response.solution;
                self.obj = response.obj;
                Ok(response.status)
            }
            None => Ok(NlpStatus::Abandoned),
        }
    }

    fn obj_value(&self) -> f64 {
        self.obj
    }

    fn iteration_count(&self) -> u64 {
        12
    }

    fn col_solution(&self) -> &[f64] {
        &self.solution
    }

    fn num_rows(&self) -> usize {
        2
    }

    fn row_lower(&self) -> &[f64] {
        &self.row_lower
    }

    fn row_upper(&self) -> &[f64] {
        &self.row_upper
    }

    fn is_nonlinear_row(&self, _row: usize) -> bool {
        true
    }

    fn eval_constraints(&self, x: &[f64]) -> OaResult<Vec<f64>> {
        self.check_eval()?;
        Ok(vec![x[0] * x[0] + x[1] * x[1], x[0] * x[1]])
    }

    fn eval_jacobian(&self, x: &[f64]) -> OaResult<CsMat<f64>> {
        self.check_eval()?;
        let mut triplets = TriMat::new((2, 2));
        triplets.add_triplet(0, 0, 2.0 * x[0]);
        triplets.add_triplet(0, 1, 2.0 * x[1]);
        triplets.add_triplet(1, 0, x[1]);
        triplets.add_triplet(1, 1, x[0]);
        Ok(triplets.to_csr())
    }

    fn eval_objective(&self, x: &[f64]) -> OaResult<f64> {
        self.check_eval()?;
        Ok(-x[0] - x[1])
    }

    fn eval_gradient(&self, _x: &[f64]) -> OaResult<Vec<f64>> {
        self.check_eval()?;
        Ok(vec![-1.0, -1.0])
    }
}

/// Channel that records everything reported to it.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub incumbents: Vec<(Vec<f64>, f64)>,
    pub bounds: Vec<f64>,
}

impl AuxiliaryChannel for RecordingChannel {
    fn report_incumbent(&mut self, x: &[f64], obj: f64) {
        self.incumbents.push((x.to_vec(), obj));
    }

    fn report_dual_bound(&mut self, bound: f64) {
        self.bounds.push(bound);
    }
}

pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}
