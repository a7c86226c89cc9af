//! Moves, outcomes and run statistics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{Color, Vertex};

/// Recolor `vertex` to `color`.
///
/// Also used for tabu entries, where it names a forbidden assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    /// Vertex to recolor.
    pub vertex: Vertex,
    /// Target color.
    pub color: Color,
}

impl Move {
    /// Creates a move.
    pub fn new(vertex: Vertex, color: Color) -> Self {
        Self { vertex, color }
    }
}

/// A move admitted into the candidate set, with its evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The move.
    pub mv: Move,
    /// Objective of the state the move leads to.
    pub objective: usize,
    /// Admitted despite being tabu, through the aspiration criterion.
    pub aspirated: bool,
}

/// How a run terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    /// A proper coloring was reached after `iterations` committed moves.
    Success {
        /// Moves committed before the coloring became proper.
        iterations: usize,
        /// The proper coloring, one color per vertex.
        coloring: Vec<Color>,
    },
    /// No legal candidate move existed after `iterations` committed moves.
    Stuck {
        /// Moves committed before no move was admissible.
        iterations: usize,
        /// The coloring the search could not leave.
        coloring: Vec<Color>,
    },
    /// The iteration budget ran out with conflicts remaining.
    Exhausted {
        /// The coloring after the last committed move.
        coloring: Vec<Color>,
    },
    /// The cancellation flag was raised after `iterations` committed moves.
    Cancelled {
        /// Moves committed before the flag was seen.
        iterations: usize,
        /// The coloring when the run stopped.
        coloring: Vec<Color>,
    },
}

impl Outcome {
    /// Whether a proper coloring was found.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Committed moves, or `None` for an exhausted run (which always used the
    /// full budget).
    pub fn iterations(&self) -> Option<usize> {
        match self {
            Outcome::Success { iterations, .. }
            | Outcome::Stuck { iterations, .. }
            | Outcome::Cancelled { iterations, .. } => Some(*iterations),
            Outcome::Exhausted { .. } => None,
        }
    }

    /// The coloring held when the run stopped.
    pub fn coloring(&self) -> &[Color] {
        match self {
            Outcome::Success { coloring, .. }
            | Outcome::Stuck { coloring, .. }
            | Outcome::Exhausted { coloring }
            | Outcome::Cancelled { coloring, .. } => coloring,
        }
    }
}

/// Instrumentation counters for one run.
///
/// The tabu and aspiration counters stay at zero when the corresponding
/// feature is switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Candidate moves scored.
    pub candidates_evaluated: usize,
    /// Tabu memory membership checks.
    pub tabu_lookups: usize,
    /// Entries pushed into tabu memory, including the cold start.
    pub tabu_insertions: usize,
    /// Aspiration table threshold checks.
    pub aspiration_lookups: usize,
    /// Moves admitted through the aspiration criterion.
    pub aspiration_overrides: usize,
}
