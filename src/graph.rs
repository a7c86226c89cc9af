//! Immutable undirected graph and conflict evaluation.
//!
//! A coloring is passed around as a slice indexed by vertex: `coloring[v]` is
//! the color of `v`. Every query that takes a coloring requires it to be total
//! over the vertex set and panics otherwise, since a short coloring can only
//! come from a broken caller.

use rustc_hash::FxHashSet;

use crate::error::GraphError;

/// Vertex identifier in `0..vertex_count`.
pub type Vertex = usize;

/// Color identifier in `0..k`.
pub type Color = usize;

/// An undirected simple graph.
///
/// Built once, then only read. Share it across runs behind an `Arc`.
///
/// # Examples
///
/// ```
/// use tabucol::graph::Graph;
///
/// let triangle = Graph::new(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
/// assert_eq!(triangle.objective(&[0, 1, 2]), 0);
/// assert_eq!(triangle.objective(&[0, 0, 1]), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    /// Normalized so that `u < v`, in insertion order.
    edges: Vec<(Vertex, Vertex)>,
    adjacency: Vec<Vec<Vertex>>,
}

impl Graph {
    /// Builds a graph over vertices `0..vertex_count`.
    ///
    /// Edges are unordered pairs; `(u, v)` and `(v, u)` name the same edge and
    /// may appear only once between them.
    pub fn new<I>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        let mut seen = FxHashSet::default();
        let mut normalized = Vec::new();
        let mut adjacency = vec![Vec::new(); vertex_count];

        for (u, v) in edges {
            if u >= vertex_count || v >= vertex_count {
                return Err(GraphError::VertexOutOfRange { u, v, vertex_count });
            }
            if u == v {
                return Err(GraphError::SelfLoop(u));
            }
            let key = (u.min(v), u.max(v));
            if !seen.insert(key) {
                return Err(GraphError::DuplicateEdge(key.0, key.1));
            }
            normalized.push(key);
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        Ok(Self {
            vertex_count,
            edges: normalized,
            adjacency,
        })
    }

    /// A graph with `vertex_count` vertices and no edges.
    pub fn edgeless(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge list, each pair with `u < v`.
    pub fn edges(&self) -> &[(Vertex, Vertex)] {
        &self.edges
    }

    /// Vertices adjacent to `v`.
    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        &self.adjacency[v]
    }

    /// Number of vertices adjacent to `v`.
    pub fn degree(&self, v: Vertex) -> usize {
        self.adjacency[v].len()
    }

    /// Whether `u` and `v` are joined by an edge. O(min degree).
    pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
        let (a, b) = if self.degree(u) <= self.degree(v) {
            (u, v)
        } else {
            (v, u)
        };
        self.adjacency[a].contains(&b)
    }

    /// Edges whose endpoints share a color.
    pub fn conflicting_edges(&self, coloring: &[Color]) -> Vec<(Vertex, Vertex)> {
        self.assert_total(coloring);
        self.edges
            .iter()
            .filter(|&&(u, v)| coloring[u] == coloring[v])
            .copied()
            .collect()
    }

    /// Vertices incident to at least one monochromatic edge, ascending.
    pub fn conflicting_vertices(&self, coloring: &[Color]) -> Vec<Vertex> {
        let mut marked = vec![false; self.vertex_count];
        for (u, v) in self.conflicting_edges(coloring) {
            marked[u] = true;
            marked[v] = true;
        }
        marked
            .iter()
            .enumerate()
            .filter_map(|(v, &m)| m.then_some(v))
            .collect()
    }

    /// Number of conflicting vertices. Zero iff the coloring is proper.
    pub fn objective(&self, coloring: &[Color]) -> usize {
        self.conflicting_vertices(coloring).len()
    }

    /// Whether no edge is monochromatic under `coloring`.
    pub fn is_valid_coloring(&self, coloring: &[Color]) -> bool {
        self.objective(coloring) == 0
    }

    fn assert_total(&self, coloring: &[Color]) {
        assert_eq!(
            coloring.len(),
            self.vertex_count,
            "coloring covers {} vertices, graph has {}",
            coloring.len(),
            self.vertex_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Graph {
        Graph::new(3, [(0, 1), (1, 2), (2, 0)]).unwrap()
    }

    #[test]
    fn test_new_normalizes_edges() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges(), &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.degree(2), 2);
        assert!(g.has_edge(2, 0));
    }

    #[test]
    fn test_new_rejects_bad_edges() {
        assert_eq!(
            Graph::new(3, [(0, 3)]),
            Err(GraphError::VertexOutOfRange {
                u: 0,
                v: 3,
                vertex_count: 3
            })
        );
        assert_eq!(Graph::new(3, [(1, 1)]), Err(GraphError::SelfLoop(1)));
        assert_eq!(
            Graph::new(3, [(0, 1), (1, 0)]),
            Err(GraphError::DuplicateEdge(0, 1))
        );
    }

    #[test]
    fn test_conflicts_on_triangle() {
        let g = triangle();
        assert_eq!(g.conflicting_edges(&[0, 0, 1]), vec![(0, 1)]);
        assert_eq!(g.conflicting_vertices(&[0, 0, 1]), vec![0, 1]);
        assert_eq!(g.conflicting_vertices(&[0, 0, 0]), vec![0, 1, 2]);
        assert_eq!(g.objective(&[1, 0, 2]), 0);
        assert!(g.is_valid_coloring(&[1, 0, 2]));
        assert!(!g.is_valid_coloring(&[1, 1, 2]));
    }

    #[test]
    fn test_vertex_objective_counts_shared_endpoint_once() {
        // star centered on 0, all leaves share its color: 3 edges, 4 vertices
        let g = Graph::new(4, [(0, 1), (0, 2), (0, 3)]).unwrap();
        assert_eq!(g.conflicting_edges(&[0, 0, 0, 0]).len(), 3);
        assert_eq!(g.objective(&[0, 0, 0, 0]), 4);
    }

    #[test]
    fn test_edgeless_is_always_valid() {
        let g = Graph::edgeless(5);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_valid_coloring(&[0, 0, 0, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "coloring covers 2 vertices, graph has 3")]
    fn test_partial_coloring_panics() {
        triangle().objective(&[0, 1]);
    }

    fn graph_and_coloring() -> impl Strategy<Value = (Graph, Vec<Color>)> {
        (1usize..12, 1usize..5).prop_flat_map(|(n, k)| {
            let pairs: Vec<(Vertex, Vertex)> = (0..n)
                .flat_map(|u| ((u + 1)..n).map(move |v| (u, v)))
                .collect();
            let m = pairs.len();
            (
                proptest::collection::vec(any::<bool>(), m),
                proptest::collection::vec(0..k, n),
            )
                .prop_map(move |(keep, coloring)| {
                    let edges = pairs
                        .iter()
                        .zip(keep)
                        .filter_map(|(&e, keep)| keep.then_some(e));
                    (Graph::new(n, edges).unwrap(), coloring)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_objective_zero_iff_valid((g, coloring) in graph_and_coloring()) {
            prop_assert_eq!(g.objective(&coloring) == 0, g.is_valid_coloring(&coloring));
            prop_assert_eq!(
                g.conflicting_edges(&coloring).is_empty(),
                g.is_valid_coloring(&coloring)
            );
        }
    }
}
