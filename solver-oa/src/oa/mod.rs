//! Outer-approximation decomposition driver.

mod channel;
mod driver;

pub use channel::{AuxiliaryChannel, IncumbentTracker};
pub use driver::{CutOutcome, CutRound, OaDriver, OaStats};
