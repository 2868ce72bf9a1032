//! Extended cutting plane (ECP) cuts.
//!
//! Instead of solving an NLP, ECP linearizes the nonlinear rows directly at
//! the relaxation solution. A row violated at that point yields a cut that
//! separates it. Cheaper than a full OA pass, and usable at every node.

use super::{LinearCut, Linearizer};
use crate::error::OaResult;
use crate::model::{NlpSolver, RelaxationSolver, RelaxationStatus};
use crate::settings::CutScope;
use crate::snapshot::install_cuts;

/// Settings for ECP cut generation.
#[derive(Debug, Clone)]
pub struct EcpSettings {
    /// Minimum violation at the relaxation point for a row to be cut.
    pub min_violation: f64,

    /// Maximum separate-and-resolve rounds in `separate`.
    pub max_rounds: usize,

    /// Scope of generated cuts.
    pub scope: CutScope,
}

impl Default for EcpSettings {
    fn default() -> Self {
        Self {
            min_violation: 1e-6,
            max_rounds: 5,
            scope: CutScope::Global,
        }
    }
}

/// Statistics for ECP cut generation.
#[derive(Debug, Default, Clone)]
pub struct EcpStats {
    /// Rounds performed.
    pub rounds: usize,

    /// Cuts generated.
    pub cuts_generated: usize,
}

/// ECP cut generator.
pub struct EcpCutGenerator {
    /// Settings.
    settings: EcpSettings,

    /// Linearizer with the ECP violation threshold.
    linearizer: Linearizer,

    /// Statistics.
    stats: EcpStats,
}

impl EcpCutGenerator {
    /// Create a new ECP cut generator.
    pub fn new(settings: EcpSettings) -> Self {
        let linearizer = Linearizer::new(settings.scope, settings.min_violation);
        Self {
            settings,
            linearizer,
            stats: EcpStats::default(),
        }
    }

    /// Statistics.
    pub fn stats(&self) -> &EcpStats {
        &self.stats
    }

    /// Cuts at `x` for every nonlinear row (and objective) violated at `x`.
    pub fn generate<N: NlpSolver + ?Sized>(&mut self, nlp: &N, x: &[f64]) -> OaResult<Vec<LinearCut>> {
        let cuts = self.linearizer.outer_approximation(nlp, x, Some(x))?;
        self.stats.rounds += 1;
        self.stats.cuts_generated += cuts.len();
        Ok(cuts)
    }

    /// Separate-and-resolve on `model` until no violated row remains, the
    /// relaxation stops solving to optimality, or `max_rounds` is reached.
    ///
    /// Cuts stay installed in `model`; all of them are also returned.
    pub fn separate<N, R>(&mut self, nlp: &N, model: &mut R) -> OaResult<Vec<LinearCut>>
    where
        N: NlpSolver + ?Sized,
        R: RelaxationSolver + ?Sized,
    {
        let mut all = Vec::new();

        for _ in 0..self.settings.max_rounds {
            let x = model.col_solution().to_vec();
            let cuts = self.generate(nlp, &x)?;
            if cuts.is_empty() {
                break;
            }

            install_cuts(model, &cuts)?;
            all.extend(cuts);

            if model.resolve() != RelaxationStatus::Optimal {
                break;
            }
        }

        Ok(all)
    }
}
