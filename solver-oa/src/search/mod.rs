//! Bounded sub-searches on the relaxation.

mod interrupt;
mod local;

pub use interrupt::InterruptHandle;
pub use local::{BoundedLocalSearch, LocalSearchBudget, LocalSearchResult};
