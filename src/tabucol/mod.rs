//! Tabu-Col.
//!
//! Local search for graph k-coloring. The state is a color per vertex; a move
//! recolors one conflicting vertex; the objective counts conflicting
//! vertices. Recently reversed moves are forbidden for a bounded number of
//! iterations unless they satisfy the aspiration criterion.
//!
//! The tabu memory, the aspiration criterion and greedy move selection are
//! switched independently through [`TabucolConfig`].
//!
//! # References
//!
//! - Hertz, A. & de Werra, D. (1987). "Using tabu search techniques for graph
//!   coloring", *Computing* 39(4), 345-351.
//! - Galinier, P. & Hertz, A. (2006). "A survey of local search methods for
//!   graph coloring", *Computers & Operations Research* 33(9), 2547-2562.

mod config;
mod memory;
mod neighborhood;
mod runner;
mod state;
mod types;

pub use config::{AspirationKey, ResolvedParams, TabuInit, TabucolConfig};
pub use memory::{AspirationTable, TabuMemory};
pub use neighborhood::Neighborhood;
pub use runner::{TabucolResult, TabucolRunner};
pub use state::ColoringState;
pub use types::{Candidate, Move, Outcome, SearchStats};
