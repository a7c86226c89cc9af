//! Tabu-Col graph k-coloring.
//!
//! Searches for an assignment of `k` colors to the vertices of an undirected
//! graph such that no edge joins two vertices of the same color, using the
//! Tabu-Col local search. The tabu memory, the aspiration criterion and
//! greedy move selection can each be switched off, so their contribution to
//! the search can be measured in isolation.
//!
//! - [`graph`]: immutable graph and conflict evaluation.
//! - [`tabucol`]: the search engine, its configuration and outcomes.
//! - [`batch`]: independent runs over a worker pool.
//! - [`error`]: graph and configuration errors.
//!
//! # Example
//!
//! ```
//! use tabucol::graph::Graph;
//! use tabucol::tabucol::{Outcome, TabucolConfig, TabucolRunner};
//!
//! let square = Graph::new(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
//! let config = TabucolConfig::default().with_max_iterations(500).with_seed(7);
//! match TabucolRunner::run(&square, 2, &config).unwrap().outcome {
//!     Outcome::Success { coloring, .. } => assert!(square.is_valid_coloring(&coloring)),
//!     other => println!("no coloring found: {other:?}"),
//! }
//! ```

pub mod batch;
pub mod error;
pub mod graph;
pub mod tabucol;

pub use error::{ConfigError, GraphError, TabucolError};
