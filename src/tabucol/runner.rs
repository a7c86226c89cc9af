//! Tabu-Col execution engine.
//!
//! # Algorithm
//!
//! 1. Color every vertex uniformly at random; seed the tabu memory
//! 2. While conflicts remain and the budget allows:
//!    a. Gather up to `rep` admissible moves of conflicting vertices
//!    b. Stop as stuck if there are none
//!    c. Take the move with the lowest resulting objective (or a random one)
//!    d. Apply it and forbid its reverse
//! 3. Report success, stuck, exhausted or cancelled
//!
//! # Reference
//!
//! Hertz, A. & de Werra, D. (1987). "Using tabu search techniques for graph
//! coloring", *Computing* 39(4), 345-351.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ResolvedParams, TabuInit, TabucolConfig};
use super::memory::{AspirationTable, TabuMemory};
use super::neighborhood::Neighborhood;
use super::state::ColoringState;
use super::types::{Candidate, Outcome, SearchStats};
use crate::error::TabucolError;
use crate::graph::{Color, Graph};

/// Result of a Tabu-Col run.
#[derive(Debug, Clone)]
pub struct TabucolResult {
    /// How the run terminated, with the final coloring.
    pub outcome: Outcome,
    /// Instrumentation counters.
    pub stats: SearchStats,
    /// Objective of the initial state followed by the objective after each
    /// committed move.
    pub objective_history: Vec<usize>,
    /// Parameters the run used after resolving defaults.
    pub params: ResolvedParams,
}

/// Tabu-Col runner.
pub struct TabucolRunner;

impl TabucolRunner {
    /// Searches for a proper `k`-coloring of `graph`.
    ///
    /// Returns `Err` only for an invalid configuration, before any iteration
    /// runs. Failing to find a coloring is an [`Outcome`], not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabucol::graph::Graph;
    /// use tabucol::tabucol::{TabucolConfig, TabucolRunner};
    ///
    /// let triangle = Graph::new(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
    /// let config = TabucolConfig::default().with_seed(42);
    /// let result = TabucolRunner::run(&triangle, 3, &config).unwrap();
    /// assert!(result.outcome.is_success());
    /// assert!(triangle.is_valid_coloring(result.outcome.coloring()));
    /// ```
    pub fn run(
        graph: &Graph,
        k: Color,
        config: &TabucolConfig,
    ) -> Result<TabucolResult, TabucolError> {
        Self::run_with_cancel(graph, k, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is checked once per iteration; when it is set the run stops
    /// with [`Outcome::Cancelled`] and the coloring held at that point.
    pub fn run_with_cancel(
        graph: &Graph,
        k: Color,
        config: &TabucolConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabucolResult, TabucolError> {
        let mut search = Search::new(graph, k, config)?;
        let outcome = search.run(cancel.as_deref());
        Ok(TabucolResult {
            outcome,
            stats: search.stats,
            objective_history: search.history,
            params: search.params,
        })
    }
}

/// What one iteration did.
#[derive(Debug)]
enum Step {
    /// `chosen` was committed out of `candidates`.
    Moved {
        chosen: Candidate,
        candidates: Vec<Candidate>,
    },
    /// No admissible move.
    Stuck,
}

/// Working state of one run. Nothing here is shared between runs.
struct Search<'g> {
    graph: &'g Graph,
    params: ResolvedParams,
    max_iterations: usize,
    best_move_selection: bool,
    neighborhood: Neighborhood,
    rng: StdRng,
    state: ColoringState,
    tabu: Option<TabuMemory>,
    aspiration: Option<AspirationTable>,
    stats: SearchStats,
    iterations: usize,
    history: Vec<usize>,
}

impl<'g> Search<'g> {
    fn new(graph: &'g Graph, k: Color, config: &TabucolConfig) -> Result<Self, TabucolError> {
        let params = config.validate(graph, k)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let state = ColoringState::random(graph, k, &mut rng);

        let mut stats = SearchStats::default();
        let tabu = config.tabu_enabled.then(|| {
            let memory = match config.tabu_init {
                TabuInit::Random => {
                    TabuMemory::random(params.tabu_tenure, graph.vertex_count(), k, &mut rng)
                }
                TabuInit::Empty => TabuMemory::new(params.tabu_tenure),
            };
            stats.tabu_insertions += memory.len();
            memory
        });
        let aspiration = config.aspiration_enabled.then(AspirationTable::new);

        debug!(
            "tabucol start: n={} m={} k={} rep={} tenure={} tabu={} aspiration={} best_move={} initial_objective={}",
            graph.vertex_count(),
            graph.edge_count(),
            k,
            params.rep,
            params.tabu_tenure,
            config.tabu_enabled,
            config.aspiration_enabled,
            config.best_move_selection,
            state.objective()
        );

        let history = vec![state.objective()];
        Ok(Self {
            graph,
            params,
            max_iterations: config.max_iterations,
            best_move_selection: config.best_move_selection,
            neighborhood: Neighborhood::new(params.rep, config.aspiration_key),
            rng,
            state,
            tabu,
            aspiration,
            stats,
            iterations: 0,
            history,
        })
    }

    fn run(&mut self, cancel: Option<&AtomicBool>) -> Outcome {
        loop {
            if self.state.objective() == 0 {
                info!("tabucol found a proper coloring in {} iterations", self.iterations);
                return Outcome::Success {
                    iterations: self.iterations,
                    coloring: self.state.colors().to_vec(),
                };
            }

            if self.iterations >= self.max_iterations {
                warn!(
                    "tabucol exhausted {} iterations with {} conflicting vertices",
                    self.max_iterations,
                    self.state.objective()
                );
                return Outcome::Exhausted {
                    coloring: self.state.colors().to_vec(),
                };
            }

            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                warn!("tabucol cancelled after {} iterations", self.iterations);
                return Outcome::Cancelled {
                    iterations: self.iterations,
                    coloring: self.state.colors().to_vec(),
                };
            }

            match self.step() {
                Step::Stuck => {
                    warn!(
                        "tabucol stuck after {} iterations: no admissible move",
                        self.iterations
                    );
                    return Outcome::Stuck {
                        iterations: self.iterations,
                        coloring: self.state.colors().to_vec(),
                    };
                }
                Step::Moved { chosen, candidates } => trace!(
                    "iteration {}: {} candidates, recolored {} to {}, objective {}",
                    self.iterations,
                    candidates.len(),
                    chosen.mv.vertex,
                    chosen.mv.color,
                    self.state.objective()
                ),
            }
        }
    }

    /// One iteration: generate, select, commit.
    fn step(&mut self) -> Step {
        let candidates = self.neighborhood.generate(
            self.graph,
            &self.state,
            self.tabu.as_mut(),
            self.aspiration.as_mut(),
            &mut self.stats,
            &mut self.rng,
        );

        let chosen = if self.best_move_selection {
            // first minimum in shuffled order
            candidates.iter().min_by_key(|c| c.objective).copied()
        } else if candidates.is_empty() {
            None
        } else {
            Some(candidates[self.rng.random_range(0..candidates.len())])
        };
        let Some(chosen) = chosen else {
            return Step::Stuck;
        };

        let reverse = self.state.apply(self.graph, chosen.mv);
        debug_assert_eq!(self.state.objective(), chosen.objective);
        if let Some(memory) = self.tabu.as_mut() {
            memory.push(reverse);
            self.stats.tabu_insertions += 1;
        }

        self.iterations += 1;
        self.history.push(self.state.objective());
        Step::Moved { chosen, candidates }
    }
}
