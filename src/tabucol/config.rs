//! Tabu-Col configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::{Color, Graph};

/// How the tabu memory is seeded at run start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TabuInit {
    /// Fill the memory with `tabu_tenure` distinct (vertex, color) pairs drawn
    /// uniformly from all `|V|·k` pairs, unrelated to the initial conflicts.
    #[default]
    Random,
    /// Start with an empty memory.
    Empty,
}

/// What the aspiration table is keyed by.
///
/// The two policies are not equivalent: keying by objective level shares the
/// recorded best across every state with the same conflict count, keying by
/// state only across revisits of the same coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AspirationKey {
    /// Objective value of the state before the move.
    #[default]
    Objective,
    /// Hash of the full color-per-vertex assignment before the move.
    State,
}

/// Configuration parameters for a Tabu-Col run.
///
/// The three feature switches and the two breadth parameters are
/// independent; any combination is a valid ablation.
///
/// # Examples
///
/// ```
/// use tabucol::tabucol::TabucolConfig;
///
/// let config = TabucolConfig::default()
///     .with_max_iterations(10_000)
///     .with_rep(25)
///     .with_tabu_tenure(7)
///     .with_aspiration(false)
///     .with_seed(42);
/// assert_eq!(config.rep, Some(25));
/// assert!(config.tabu_enabled);
/// assert!(!config.aspiration_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabucolConfig {
    /// Maximum number of committed moves.
    pub max_iterations: usize,
    /// Number of candidate moves gathered per iteration.
    /// `None` means 30% of the vertex count (at least 1).
    pub rep: Option<usize>,
    /// Tabu memory capacity. `None` means 30% of the vertex count (at least 1).
    pub tabu_tenure: Option<usize>,
    /// Whether reversed moves are recorded and forbidden.
    pub tabu_enabled: bool,
    /// Whether the aspiration criterion may admit moves.
    pub aspiration_enabled: bool,
    /// Pick the candidate with the lowest resulting objective (`true`) or a
    /// uniformly random candidate (`false`).
    pub best_move_selection: bool,
    /// Random seed (None for fresh entropy).
    pub seed: Option<u64>,
    /// Tabu memory seeding.
    pub tabu_init: TabuInit,
    /// Aspiration table keying policy.
    pub aspiration_key: AspirationKey,
}

impl Default for TabucolConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            rep: None,
            tabu_tenure: None,
            tabu_enabled: true,
            aspiration_enabled: true,
            best_move_selection: true,
            seed: None,
            tabu_init: TabuInit::Random,
            aspiration_key: AspirationKey::Objective,
        }
    }
}

/// Parameters after defaults have been resolved against a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedParams {
    /// Number of colors.
    pub k: Color,
    /// Candidate moves per iteration.
    pub rep: usize,
    /// Tabu memory capacity.
    pub tabu_tenure: usize,
}

impl TabucolConfig {
    /// Baseline without tabu memory or aspiration: sample up to ten
    /// candidates and take the best one.
    pub fn control() -> Self {
        Self {
            rep: Some(10),
            tabu_enabled: false,
            aspiration_enabled: false,
            ..Self::default()
        }
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the number of candidate moves per iteration.
    pub fn with_rep(mut self, rep: usize) -> Self {
        self.rep = Some(rep);
        self
    }

    /// Sets the tabu memory capacity.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = Some(tenure);
        self
    }

    /// Enables or disables the tabu memory.
    pub fn with_tabu(mut self, enabled: bool) -> Self {
        self.tabu_enabled = enabled;
        self
    }

    /// Enables or disables the aspiration criterion.
    pub fn with_aspiration(mut self, enabled: bool) -> Self {
        self.aspiration_enabled = enabled;
        self
    }

    /// Chooses between best-move and random-move selection.
    pub fn with_best_move_selection(mut self, enabled: bool) -> Self {
        self.best_move_selection = enabled;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how the tabu memory is seeded.
    pub fn with_tabu_init(mut self, init: TabuInit) -> Self {
        self.tabu_init = init;
        self
    }

    /// Sets the aspiration table keying policy.
    pub fn with_aspiration_key(mut self, key: AspirationKey) -> Self {
        self.aspiration_key = key;
        self
    }

    /// Validates the configuration for a graph and color count, resolving
    /// defaults.
    ///
    /// `rep` is bounded by the vertex count and `tabu_tenure` by the number of
    /// (vertex, color) pairs. An edgeless graph with no vertices still admits
    /// `rep = 1` and `tabu_tenure = 1`; the search finishes before using them.
    pub fn validate(&self, graph: &Graph, k: Color) -> Result<ResolvedParams, ConfigError> {
        if k < 1 {
            return Err(ConfigError::NoColors(k));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }

        let n = graph.vertex_count();
        let default_size = (n * 3 / 10).max(1);

        let rep = self.rep.unwrap_or(default_size);
        let max_rep = n.max(1);
        if rep < 1 || rep > max_rep {
            return Err(ConfigError::Rep { rep, max: max_rep });
        }

        let tabu_tenure = self.tabu_tenure.unwrap_or(default_size);
        let max_tenure = (n * k).max(1);
        if tabu_tenure < 1 || tabu_tenure > max_tenure {
            return Err(ConfigError::TabuTenure {
                tenure: tabu_tenure,
                max: max_tenure,
            });
        }

        Ok(ResolvedParams {
            k,
            rep,
            tabu_tenure,
        })
    }
}
