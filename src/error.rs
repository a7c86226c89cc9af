//! Error types.
//!
//! Only construction-time problems are errors. A search that fails to find a
//! proper coloring is reported through [`Outcome`](crate::tabucol::Outcome),
//! never through these types.

use thiserror::Error;

use crate::graph::{Color, Vertex};

/// Rejected graph construction input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge names a vertex outside `0..vertex_count`.
    #[error("edge ({u}, {v}) references a vertex outside 0..{vertex_count}")]
    VertexOutOfRange {
        u: Vertex,
        v: Vertex,
        vertex_count: usize,
    },

    /// An edge joins a vertex to itself.
    #[error("self loop on vertex {0}")]
    SelfLoop(Vertex),

    /// The same unordered pair appears twice.
    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(Vertex, Vertex),
}

/// Rejected search configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `k` must be at least 1.
    #[error("color count must be at least 1, got {0}")]
    NoColors(Color),

    /// `max_iterations` must be at least 1.
    #[error("max_iterations must be at least 1")]
    NoIterations,

    /// `rep` must lie in `1..=max`.
    #[error("rep must be in 1..={max}, got {rep}")]
    Rep { rep: usize, max: usize },

    /// `tabu_tenure` must lie in `1..=max`.
    #[error("tabu_tenure must be in 1..={max}, got {tenure}")]
    TabuTenure { tenure: usize, max: usize },
}

/// Unified error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabucolError {
    /// Graph construction failed.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Configuration validation failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
