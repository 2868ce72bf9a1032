//! Outer-approximation decomposition for mixed-integer nonlinear programs.
//!
//! Outer approximation (OA) alternates between a continuous NLP with the
//! integer variables fixed and a mixed-integer linear master problem built
//! from linearizations of the nonlinear rows around NLP solutions.
//!
//! This crate provides the cut-generation side of that scheme, to be called
//! from a branch-and-bound node evaluator:
//!
//! - [`OaDriver`]: decides per relaxation point whether to forward it, pass
//!   it through, or run local searches and NLP solves to produce cuts
//! - [`SolverSnapshot`]: non-destructive mutation of the caller's relaxation
//! - [`BoundedLocalSearch`]: node/time-limited sub-searches on the relaxation
//! - [`EcpCutGenerator`]: extended cutting planes at relaxation points
//!
//! Solvers are supplied through the [`NlpSolver`] and [`RelaxationSolver`]
//! traits; results flow back through an [`AuxiliaryChannel`].

#![warn(missing_docs)]

pub mod cuts;
pub mod error;
pub mod model;
pub mod oa;
pub mod search;
pub mod settings;
pub mod snapshot;

pub use cuts::{CutSource, EcpCutGenerator, EcpSettings, LinearCut, Linearizer, TaylorExpansion};
pub use error::{OaError, OaResult, Severity};
pub use model::{
    Basis, BasisStatus, ColumnBounds, FeasibilityChecker, NlpSolver, NlpStatus, RelaxationSolver,
    RelaxationStatus, SearchLimits, SolverCapability, WarmStart,
};
pub use oa::{AuxiliaryChannel, CutOutcome, CutRound, IncumbentTracker, OaDriver, OaStats};
pub use search::{BoundedLocalSearch, InterruptHandle, LocalSearchBudget, LocalSearchResult};
pub use settings::{CutScope, LocalSearchSettings, NodeSelection, OaSettings, SearchStrategy};
pub use snapshot::{install_cuts, BoundsSnapshot, SnapshotFields, SolverSnapshot};
