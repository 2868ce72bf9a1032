//! Solver interfaces and model-level helpers.

mod columns;
mod feasibility;
mod nlp;
mod relaxation;
mod warm_start;

pub use columns::ColumnBounds;
pub use feasibility::{fractionality, is_integer_feasible, FeasibilityChecker};
pub use nlp::{NlpSolver, NlpStatus};
pub use relaxation::{RelaxationSolver, RelaxationStatus, SearchLimits, SolverCapability};
pub use warm_start::{Basis, BasisStatus, IterateWarmStart, WarmStart, ITERATE_STATUS_LEN};
