//! Error types for the outer-approximation engine.

use thiserror::Error;

/// How far an error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Skip the offending candidate and keep going.
    Recoverable,

    /// Abort the current cut-generation call; the search may continue elsewhere.
    Call,

    /// Abort the whole optimization run.
    Run,
}

/// Errors that can occur during outer approximation.
#[derive(Error, Debug)]
pub enum OaError {
    /// Unsupported solver kind or missing collaborator.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The nonlinear model could not evaluate objective, gradient,
    /// constraints or Jacobian.
    #[error("Model evaluation failed: {0}")]
    ModelEvaluation(String),

    /// A value that should be integral is too far from an integer to fix.
    #[error("Numeric inconsistency on variable {var}: value {value} cannot be fixed")]
    NumericInconsistency {
        /// Column index.
        var: usize,
        /// Offending value.
        value: f64,
    },

    /// A warm start could not be reinstalled; the model is unreliable.
    #[error("Restore failed: {0}")]
    RestoreFailure(String),
}

impl OaError {
    /// Propagation scope of this error.
    pub fn severity(&self) -> Severity {
        match self {
            OaError::NumericInconsistency { .. } => Severity::Recoverable,
            OaError::Configuration(_) | OaError::RestoreFailure(_) => Severity::Call,
            OaError::ModelEvaluation(_) => Severity::Run,
        }
    }

    /// Returns true if the caller can skip the candidate and continue.
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

/// Result type for outer-approximation operations.
pub type OaResult<T> = Result<T, OaError>;
