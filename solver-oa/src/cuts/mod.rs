//! Cut generation for outer approximation.
//!
//! This module provides:
//! - The linear cut type shared with relaxation solvers
//! - First-order linearization of nonlinear rows and objective
//! - Extended cutting plane (ECP) cuts at relaxation points

mod cut;
mod ecp;
mod linearize;

pub use cut::{CutSource, LinearCut};
pub use ecp::{EcpCutGenerator, EcpSettings, EcpStats};
pub use linearize::{Linearizer, TaylorExpansion};
