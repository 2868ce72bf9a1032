//! Outer-approximation cut-generation driver.
//!
//! Called by a branch-and-bound node evaluator with the node's relaxation.
//! For a fractional relaxation point the driver alternates bounded local
//! searches on the relaxation with NLP solves at the integer assignments
//! they produce, linearizes around the NLP solutions and installs the cuts,
//! until the searches stop producing new points or the budget runs out.

use std::time::Instant;

use super::AuxiliaryChannel;
use crate::cuts::{LinearCut, Linearizer};
use crate::error::{OaError, OaResult};
use crate::model::{fractionality, FeasibilityChecker, NlpSolver, NlpStatus, RelaxationSolver};
use crate::search::{BoundedLocalSearch, InterruptHandle, LocalSearchBudget};
use crate::settings::OaSettings;
use crate::snapshot::{install_cuts, BoundsSnapshot, SnapshotFields, SolverSnapshot};

/// Largest distance to an integer accepted when fixing a column.
const FIX_TOLERANCE: f64 = 1e-4;

/// Largest magnitude a column may be fixed to.
const MAX_FIX_VALUE: f64 = 1e10;

/// Bounds below this are not reported.
const MIN_REPORTED_BOUND: f64 = -1e100;

/// The error that propagates further; a restore failure wins ties.
fn more_severe(err: OaError, restore_err: OaError) -> OaError {
    if err.severity() > restore_err.severity() {
        log::warn!("Relaxation restore also failed: {}", restore_err);
        err
    } else {
        log::warn!("Discarding error after failed restore: {}", err);
        restore_err
    }
}

/// How a cut-generation call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOutcome {
    /// The relaxation point was integer feasible and forwarded as a candidate.
    CandidateForwarded,

    /// The fractional point was left to the enclosing search.
    PassThrough,

    /// Outer-approximation passes were performed.
    Decomposed {
        /// Number of local searches run.
        passes: usize,
    },
}

/// Result of one cut-generation call.
#[derive(Debug, Clone)]
pub struct CutRound {
    /// Generated cuts, in generation order.
    pub cuts: Vec<LinearCut>,

    /// How the call ended.
    pub outcome: CutOutcome,

    /// Best dual bound observed (-inf if none).
    pub dual_bound: f64,

    /// Objective of the last incumbent reported during the call.
    pub incumbent: Option<f64>,
}

impl CutRound {
    fn new(outcome: CutOutcome) -> Self {
        Self {
            cuts: Vec::new(),
            outcome,
            dual_bound: f64::NEG_INFINITY,
            incumbent: None,
        }
    }
}

/// Counters kept across calls.
#[derive(Debug, Default, Clone)]
pub struct OaStats {
    /// Calls to `generate_cuts`.
    pub calls: u64,

    /// NLP solves.
    pub nlp_solves: u64,

    /// Local searches run.
    pub local_searches: u64,

    /// Cuts generated.
    pub cuts_generated: u64,

    /// NLP-verified incumbents reported.
    pub incumbents: u64,

    /// Candidate points skipped because they could not be fixed.
    pub skipped_points: u64,
}

/// Outer-approximation driver.
///
/// Owns the NLP; the relaxation is borrowed per call.
pub struct OaDriver<N: NlpSolver> {
    /// NLP with integer columns fixed per candidate.
    nlp: N,

    /// Settings.
    settings: OaSettings,

    /// Restore the relaxation at the end of every call.
    leave_unchanged: bool,

    /// Handle attached to running local searches.
    interrupt: InterruptHandle,

    /// Best NLP-verified objective reported so far.
    best_reported: f64,

    /// Statistics.
    stats: OaStats,

    /// Construction time; local-search time budget is measured from here.
    start: Instant,

    /// Time of the last progress line.
    last_log: Instant,
}

impl<N: NlpSolver> OaDriver<N> {
    /// Create a driver around an NLP model.
    pub fn new(nlp: N, settings: OaSettings) -> Self {
        let now = Instant::now();
        Self {
            nlp,
            settings,
            leave_unchanged: true,
            interrupt: InterruptHandle::new(),
            best_reported: f64::INFINITY,
            stats: OaStats::default(),
            start: now,
            last_log: now,
        }
    }

    /// Keep (false) or roll back (true) relaxation changes after each call.
    pub fn with_leave_unchanged(mut self, leave_unchanged: bool) -> Self {
        self.leave_unchanged = leave_unchanged;
        self
    }

    /// Settings in use.
    pub fn settings(&self) -> &OaSettings {
        &self.settings
    }

    /// The NLP model.
    pub fn nlp(&self) -> &N {
        &self.nlp
    }

    /// Give back the NLP model.
    pub fn into_nlp(self) -> N {
        self.nlp
    }

    /// Statistics.
    pub fn stats(&self) -> &OaStats {
        &self.stats
    }

    /// Best NLP-verified objective reported so far (+inf if none).
    pub fn best_objective(&self) -> f64 {
        self.best_reported
    }

    /// Handle for interrupting running local searches from elsewhere.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Generate outer-approximation cuts for the current relaxation solution.
    ///
    /// `channel` receives incumbents and the dual bound; without it,
    /// fractional points are passed through untouched.
    pub fn generate_cuts<R: RelaxationSolver + Clone>(
        &mut self,
        model: &mut R,
        channel: Option<&mut dyn AuxiliaryChannel>,
    ) -> OaResult<CutRound> {
        self.stats.calls += 1;

        if model.num_cols() < self.nlp.num_cols() {
            return Err(OaError::Configuration(format!(
                "relaxation has {} columns but the NLP has {}",
                model.num_cols(),
                self.nlp.num_cols()
            )));
        }

        let x = model.col_solution().to_vec();
        let checker = FeasibilityChecker::new(self.nlp.integer_columns(), self.settings.int_feas_tol);
        let cutoff = self.effective_cutoff(model.cutoff());

        if checker.is_integer_feasible(&x) {
            let obj = model.obj_value();
            return self.forward_candidate(&x, obj, cutoff, channel);
        }

        log::debug!(
            "Relaxation point has {} fractional integer columns",
            checker.fractional_indices(&x).len()
        );

        if !self.local_search_permitted() {
            return Ok(CutRound::new(CutOutcome::PassThrough));
        }
        let Some(channel) = channel else {
            log::debug!("No auxiliary channel, leaving fractional point to the search");
            return Ok(CutRound::new(CutOutcome::PassThrough));
        };

        let snapshot = self
            .leave_unchanged
            .then(|| SolverSnapshot::capture(&*model, SnapshotFields::ALL));
        let nlp_bounds = BoundsSnapshot::capture(&self.nlp);

        let outcome = self.perform_oa(model, &mut *channel, &nlp_bounds, cutoff);

        nlp_bounds.restore(&mut self.nlp);
        let restored = match &snapshot {
            Some(snapshot) => snapshot.restore(model),
            None => Ok(()),
        };
        let round = match (outcome, restored) {
            (Ok(round), Ok(())) => round,
            (Err(err), Ok(())) | (Ok(_), Err(err)) => return Err(err),
            (Err(err), Err(restore_err)) => return Err(more_severe(err, restore_err)),
        };

        if round.dual_bound > MIN_REPORTED_BOUND {
            channel.report_dual_bound(round.dual_bound);
        }

        self.log_progress();
        Ok(round)
    }

    /// Report an integer-feasible relaxation point.
    fn forward_candidate(
        &mut self,
        x: &[f64],
        obj: f64,
        cutoff: f64,
        channel: Option<&mut dyn AuxiliaryChannel>,
    ) -> OaResult<CutRound> {
        let Some(channel) = channel else {
            return Err(OaError::Configuration(
                "integer-feasible point found but no auxiliary channel to report it".to_string(),
            ));
        };

        // Not NLP-verified: the nonlinear rows may still be violated, so
        // the point must not tighten the cutoff of later calls.
        let mut round = CutRound::new(CutOutcome::CandidateForwarded);
        if obj < cutoff {
            channel.report_incumbent(x, obj);
            round.incumbent = Some(obj);
        }
        Ok(round)
    }

    /// Alternate local searches and NLP solves, installing cuts in `model`.
    fn perform_oa<R: RelaxationSolver + Clone>(
        &mut self,
        model: &mut R,
        channel: &mut dyn AuxiliaryChannel,
        bounds: &BoundsSnapshot,
        mut cutoff: f64,
    ) -> OaResult<CutRound> {
        let linearizer = Linearizer::new(self.settings.cut_scope, self.settings.cut_violation_tol);
        let mut search = BoundedLocalSearch::new(
            &*model,
            self.settings.local_search.strategy.clone(),
            self.settings.int_feas_tol,
        );
        let mut round = CutRound::new(CutOutcome::PassThrough);
        let mut passes = 0;

        loop {
            passes += 1;
            self.stats.local_searches += 1;

            let budget = LocalSearchBudget {
                cutoff,
                log_level: self.settings.local_search.log_level,
                max_time: self.remaining_time(),
                max_nodes: self.settings.local_search.node_limit,
            };
            let found = search.run(&*model, &budget, &self.interrupt)?;
            round.dual_bound = round.dual_bound.max(found.dual_bound);

            if found.dual_bound >= cutoff {
                break;
            }
            let Some(point) = found.point else {
                break;
            };

            let cuts_before = round.cuts.len();
            match self.fix_integers(&point, bounds) {
                Ok(()) => {
                    let status = self.solve_nlp()?;
                    let obj = self.nlp.obj_value();
                    let center = self.nlp.col_solution().to_vec();

                    if status == NlpStatus::Optimal && obj < cutoff {
                        channel.report_incumbent(&center, obj);
                        self.record_incumbent(obj);
                        round.incumbent = Some(obj);

                        cutoff = obj - self.settings.cutoff_increment;
                        model.set_cutoff(cutoff);
                    }

                    if status.is_usable() {
                        let cut_point = self.settings.add_only_violated.then_some(point.as_slice());
                        let cuts = linearizer.outer_approximation(&self.nlp, &center, cut_point)?;
                        install_cuts(model, &cuts)?;
                        self.stats.cuts_generated += cuts.len() as u64;
                        round.cuts.extend(cuts);
                    }
                }
                Err(err) if err.is_recoverable() => {
                    log::warn!("Skipping local-search point: {}", err);
                    self.stats.skipped_points += 1;
                }
                Err(err) => return Err(err),
            }

            // Without new cuts the next search would return the same point.
            if round.cuts.len() == cuts_before {
                break;
            }
            if passes >= self.settings.local_search.max_per_node || !self.local_search_permitted() {
                break;
            }
        }

        round.outcome = CutOutcome::Decomposed { passes };
        Ok(round)
    }

    /// Fix the integer columns of the NLP to `point`, rounded and clipped to
    /// the bounds captured at call start.
    ///
    /// Nothing is changed if any column cannot be fixed.
    fn fix_integers(&mut self, point: &[f64], bounds: &BoundsSnapshot) -> OaResult<()> {
        let integer_vars = self.nlp.integer_columns();
        let mut fixed = Vec::with_capacity(integer_vars.len());

        for &var in &integer_vars {
            let value = point[var];
            if fractionality(value) > FIX_TOLERANCE {
                return Err(OaError::NumericInconsistency { var, value });
            }
            let rounded = value.round().max(bounds.lower[var]).min(bounds.upper[var]);
            if rounded.abs() > MAX_FIX_VALUE {
                return Err(OaError::NumericInconsistency { var, value });
            }
            fixed.push((var, rounded));
        }

        for (var, value) in fixed {
            self.nlp.set_col_bounds(var, value, value);
        }
        Ok(())
    }

    fn solve_nlp(&mut self) -> OaResult<NlpStatus> {
        self.stats.nlp_solves += 1;
        let status = self.nlp.resolve()?;

        match status {
            NlpStatus::Optimal => log::debug!(
                "NLP solved in {} iterations, objective {:.6e}",
                self.nlp.iteration_count(),
                self.nlp.obj_value()
            ),
            NlpStatus::Infeasible => log::debug!(
                "NLP infeasible after {} iterations",
                self.nlp.iteration_count()
            ),
            NlpStatus::Abandoned | NlpStatus::IterationLimit => {
                log::warn!("Unsolved NLP ({:?}), no linearization at this point", status)
            }
        }
        Ok(status)
    }

    fn record_incumbent(&mut self, obj: f64) {
        self.best_reported = self.best_reported.min(obj);
        self.stats.incumbents += 1;

        if self.settings.verbose {
            log::info!(
                "New incumbent: obj={:.6e} after {:.1}s",
                obj,
                self.start.elapsed().as_secs_f64()
            );
        }
    }

    /// Model cutoff tightened by the best objective already reported.
    fn effective_cutoff(&self, model_cutoff: f64) -> f64 {
        model_cutoff.min(self.best_reported - self.settings.cutoff_increment)
    }

    fn remaining_time(&self) -> f64 {
        (self.settings.local_search.max_time - self.start.elapsed().as_secs_f64()).max(0.0)
    }

    fn local_search_permitted(&self) -> bool {
        let ls = &self.settings.local_search;
        ls.enabled
            && ls.node_limit > 0
            && self.stats.local_searches < ls.max_total
            && self.remaining_time() > 0.0
    }

    fn log_progress(&mut self) {
        if !self.settings.verbose {
            return;
        }
        if self.last_log.elapsed().as_secs_f64() < self.settings.log_frequency {
            return;
        }
        self.last_log = Instant::now();

        log::info!(
            "OA calls: {} | NLP solves: {} | Local searches: {} | Cuts: {} | Incumbent: {:.6e} | Time: {:.1}s",
            self.stats.calls,
            self.stats.nlp_solves,
            self.stats.local_searches,
            self.stats.cuts_generated,
            self.best_reported,
            self.start.elapsed().as_secs_f64(),
        );
    }
}
