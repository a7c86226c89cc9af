//! Coloring state and the move model.
//!
//! The state keeps one color per vertex plus, for each vertex, how many of
//! its neighbors carry each color. A vertex is conflicting exactly when it
//! has a neighbor of its own color, so the objective and the effect of any
//! single recoloring follow from the counts without copying the partition.

use std::hash::{Hash, Hasher};

use rand::Rng;
use rustc_hash::FxHasher;

use super::types::Move;
use crate::graph::{Color, Graph, Vertex};

/// A partition of the vertex set into `k` color groups.
///
/// Invariant: every vertex is in exactly one group, the group of its color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoringState {
    k: Color,
    /// colors[v]: color of v
    colors: Vec<Color>,
    /// groups[c]: vertices colored c
    groups: Vec<Vec<Vertex>>,
    /// position[v]: index of v inside groups[colors[v]]
    position: Vec<usize>,
    /// neighbor_colors[v * k + c]: neighbors of v colored c
    neighbor_colors: Vec<usize>,
    /// number of conflicting vertices
    conflicting: usize,
}

impl ColoringState {
    /// Assigns every vertex a uniformly random color, in vertex order.
    pub fn random<R: Rng>(graph: &Graph, k: Color, rng: &mut R) -> Self {
        assert!(k >= 1, "cannot color with zero colors");
        let colors = (0..graph.vertex_count())
            .map(|_| rng.random_range(0..k))
            .collect();
        Self::from_coloring(graph, k, colors)
    }

    /// Builds the state for an explicit coloring.
    ///
    /// # Panics
    ///
    /// Panics if the coloring does not cover every vertex or uses a color
    /// outside `0..k`.
    pub fn from_coloring(graph: &Graph, k: Color, colors: Vec<Color>) -> Self {
        let n = graph.vertex_count();
        assert_eq!(
            colors.len(),
            n,
            "coloring covers {} vertices, graph has {}",
            colors.len(),
            n
        );

        let mut groups = vec![Vec::new(); k];
        let mut position = vec![0; n];
        for (v, &c) in colors.iter().enumerate() {
            assert!(c < k, "vertex {v} has color {c}, expected < {k}");
            position[v] = groups[c].len();
            groups[c].push(v);
        }

        let mut neighbor_colors = vec![0; n * k];
        for &(u, v) in graph.edges() {
            neighbor_colors[u * k + colors[v]] += 1;
            neighbor_colors[v * k + colors[u]] += 1;
        }

        let mut state = Self {
            k,
            colors,
            groups,
            position,
            neighbor_colors,
            conflicting: 0,
        };
        state.conflicting = (0..n).filter(|&v| state.is_conflicting(v)).count();
        state
    }

    /// Number of colors.
    pub fn k(&self) -> Color {
        self.k
    }

    /// Color of `v`.
    pub fn color(&self, v: Vertex) -> Color {
        self.colors[v]
    }

    /// Color per vertex.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Vertices per color.
    pub fn groups(&self) -> &[Vec<Vertex>] {
        &self.groups
    }

    /// Number of conflicting vertices.
    pub fn objective(&self) -> usize {
        self.conflicting
    }

    /// Whether `v` shares its color with a neighbor.
    pub fn is_conflicting(&self, v: Vertex) -> bool {
        self.neighbor_colors[v * self.k + self.colors[v]] > 0
    }

    /// Conflicting vertices, ascending.
    pub fn conflicting_vertices(&self) -> Vec<Vertex> {
        (0..self.colors.len())
            .filter(|&v| self.is_conflicting(v))
            .collect()
    }

    /// Objective of the state `mv` would lead to. Does not modify `self`.
    ///
    /// # Panics
    ///
    /// Panics if `mv` keeps the vertex's color or targets a color outside
    /// `0..k`.
    pub fn objective_after(&self, graph: &Graph, mv: Move) -> usize {
        let Move { vertex: v, color: to } = mv;
        let from = self.colors[v];
        self.assert_move(mv);

        let k = self.k;
        let mut objective = self.conflicting as isize;
        let v_after = self.neighbor_colors[v * k + to] > 0;
        objective += v_after as isize - self.is_conflicting(v) as isize;

        for &u in graph.neighbors(v) {
            let cu = self.colors[u];
            let count = self.neighbor_colors[u * k + cu];
            if cu == from {
                // u loses its same-colored neighbor v
                if count == 1 {
                    objective -= 1;
                }
            } else if cu == to && count == 0 {
                objective += 1;
            }
        }
        objective as usize
    }

    /// Applies `mv` in place and returns its reverse move.
    ///
    /// The vertex leaves its group and is appended to the target group.
    pub fn apply(&mut self, graph: &Graph, mv: Move) -> Move {
        let objective = self.objective_after(graph, mv);
        let Move { vertex: v, color: to } = mv;
        let from = self.colors[v];

        let pos = self.position[v];
        self.groups[from].swap_remove(pos);
        if let Some(&moved) = self.groups[from].get(pos) {
            self.position[moved] = pos;
        }
        self.position[v] = self.groups[to].len();
        self.groups[to].push(v);
        self.colors[v] = to;

        let k = self.k;
        for &u in graph.neighbors(v) {
            self.neighbor_colors[u * k + from] -= 1;
            self.neighbor_colors[u * k + to] += 1;
        }
        self.conflicting = objective;

        Move::new(v, from)
    }

    /// Copy of this state with `mv` applied.
    pub fn with_move(&self, graph: &Graph, mv: Move) -> Self {
        let mut next = self.clone();
        next.apply(graph, mv);
        next
    }

    /// Hash of the color assignment. Equal assignments give equal keys.
    pub fn state_key(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.colors.hash(&mut hasher);
        hasher.finish()
    }

    /// Full consistency check against the graph: partition, positions,
    /// neighbor counts and objective.
    pub fn is_consistent(&self, graph: &Graph) -> bool {
        let n = graph.vertex_count();
        if self.colors.len() != n || self.groups.len() != self.k {
            return false;
        }

        let mut seen = vec![false; n];
        for (c, group) in self.groups.iter().enumerate() {
            for (i, &v) in group.iter().enumerate() {
                if v >= n || seen[v] || self.colors[v] != c || self.position[v] != i {
                    return false;
                }
                seen[v] = true;
            }
        }
        if seen.iter().any(|&s| !s) {
            return false;
        }

        *self == Self::from_coloring(graph, self.k, self.colors.clone()).with_layout(self)
            && self.conflicting == graph.objective(&self.colors)
    }

    /// Takes the group layout of `other`, keeping this state's counts.
    fn with_layout(mut self, other: &Self) -> Self {
        self.groups = other.groups.clone();
        self.position = other.position.clone();
        self
    }

    fn assert_move(&self, mv: Move) {
        assert!(
            mv.color < self.k,
            "move targets color {}, expected < {}",
            mv.color,
            self.k
        );
        assert_ne!(
            mv.color, self.colors[mv.vertex],
            "move keeps vertex {} on its color",
            mv.vertex
        );
    }
}
