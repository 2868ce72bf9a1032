//! Configuration settings for the outer-approximation driver.

/// Node selection used by the local-search branch-and-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Always select node with best (lowest) dual bound.
    BestBound,

    /// Depth-first search (helps find feasible solutions quickly).
    #[default]
    DepthFirst,

    /// Two-phase: depth-first until first incumbent, then best-bound.
    TwoPhase,
}

/// Validity scope attached to generated cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutScope {
    /// Cuts are valid at every node of the enclosing search.
    #[default]
    Global,

    /// Cuts are valid only in the subtree of the current node.
    Local,
}

impl CutScope {
    /// Returns true for globally valid cuts.
    pub fn is_global(self) -> bool {
        matches!(self, CutScope::Global)
    }
}

/// Strategy handed to the sub-solver of a local search.
///
/// Owned by value so that cloning the settings copies the strategy too.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStrategy {
    /// Only separate cuts at the root of the sub-search.
    pub cuts_only_at_root: bool,

    /// Number of strong branching candidates (0 disables strong branching).
    pub strong_candidates: usize,

    /// Branchings on a variable before pseudocosts are trusted.
    pub before_trust: usize,

    /// Node selection rule.
    pub node_selection: NodeSelection,
}

impl Default for SearchStrategy {
    fn default() -> Self {
        Self {
            cuts_only_at_root: true,
            strong_candidates: 0,
            before_trust: 0,
            node_selection: NodeSelection::default(),
        }
    }
}

/// Budgets for the bounded local searches run by the driver.
#[derive(Debug, Clone)]
pub struct LocalSearchSettings {
    /// Run local searches at all.
    pub enabled: bool,

    /// Node limit for one local search (0 disables local search).
    pub node_limit: u64,

    /// Maximum local searches within one cut-generation call.
    /// This also bounds the number of OA passes per call.
    pub max_per_node: usize,

    /// Maximum local searches over the driver's lifetime.
    pub max_total: u64,

    /// Time budget in seconds, measured from driver construction.
    pub max_time: f64,

    /// Log level forwarded to the sub-solver.
    pub log_level: u32,

    /// Strategy forwarded to the sub-solver.
    pub strategy: SearchStrategy,
}

impl Default for LocalSearchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            node_limit: 1000,
            max_per_node: 10,
            max_total: u64::MAX,
            max_time: 3600.0,
            log_level: 0,
            strategy: SearchStrategy::default(),
        }
    }
}

/// Outer-approximation settings.
#[derive(Debug, Clone)]
pub struct OaSettings {
    // === Tolerances ===
    /// Integer feasibility tolerance.
    /// A variable is considered integer if |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    /// Amount subtracted from an improved incumbent objective to form the
    /// new cutoff.
    pub cutoff_increment: f64,

    /// Minimum violation for a cut to count as violated.
    pub cut_violation_tol: f64,

    // === Cut settings ===
    /// Validity scope of generated cuts.
    pub cut_scope: CutScope,

    /// Only keep cuts violated by the point being cut off.
    pub add_only_violated: bool,

    // === Local search ===
    /// Local-search budgets.
    pub local_search: LocalSearchSettings,

    // === Output ===
    /// Print progress information.
    pub verbose: bool,

    /// Seconds between periodic progress lines.
    pub log_frequency: f64,
}

impl Default for OaSettings {
    fn default() -> Self {
        Self {
            int_feas_tol: 1e-5,
            cutoff_increment: 1e-6,
            cut_violation_tol: 1e-9,

            cut_scope: CutScope::Global,
            add_only_violated: false,

            local_search: LocalSearchSettings::default(),

            verbose: false,
            log_frequency: 1000.0,
        }
    }
}

impl OaSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_frequency: 1.0,
            ..Self::default()
        }
    }

    /// Enable local search with the given node limit and per-call count.
    pub fn with_local_search(mut self, node_limit: u64, max_per_node: usize) -> Self {
        self.local_search.enabled = true;
        self.local_search.node_limit = node_limit;
        self.local_search.max_per_node = max_per_node;
        self
    }

    /// Set the local-search time budget in seconds.
    pub fn with_local_search_time(mut self, seconds: f64) -> Self {
        self.local_search.max_time = seconds;
        self
    }

    /// Set the cutoff increment.
    pub fn with_cutoff_increment(mut self, increment: f64) -> Self {
        self.cutoff_increment = increment;
        self
    }

    /// Set the integer tolerance.
    pub fn with_int_feas_tol(mut self, tol: f64) -> Self {
        self.int_feas_tol = tol;
        self
    }

    /// Set the cut scope.
    pub fn with_cut_scope(mut self, scope: CutScope) -> Self {
        self.cut_scope = scope;
        self
    }

    /// Keep only cuts violated by the current point.
    pub fn with_only_violated(mut self, only_violated: bool) -> Self {
        self.add_only_violated = only_violated;
        self
    }
}
